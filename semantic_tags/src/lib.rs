//! # Semantic Tags
//!
//! The vocabulary crate - tags, tag sets and their relations for every dimension of
//! the context space. This crate is the single source of truth for tag identity and
//! does not know anything about context points or knowledge bases.
//!
//! ## Core Components
//!
//! - **tag**: `SemanticTag`, its kind payloads and the `identical` predicate
//! - **tag_set**: `TagSet`, one container type for the topic, peer, spatial and temporal dimensions
//! - **views**: typed taxonomy / semantic net views over a structured tag set

pub mod error;
pub mod tag;
pub mod tag_set;
pub mod views;

pub use error::*;
pub use tag::*;
pub use tag_set::*;
pub use views::*;
