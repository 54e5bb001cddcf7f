//! # Context KB
//!
//! A semantic knowledge base for peer-to-peer knowledge exchange. Knowledge is
//! stored as context points: information placed at coordinates in a
//! seven-dimensional context space (topic, originator, peer, remote peer, time,
//! location, direction). This crate consumes the tag sets of `semantic_tags`
//! and provides the store plus the algebra used to query and project it.
//!
//! ## Core Components
//!
//! - **knowledge_base**: Coordinates, context spaces, context points and the knowledge base
//! - **algebra**: Exact and wildcard matching, coordinate expansion, projection
//! - **events**: Listener traits and the ordered, failure-isolating event bus
//! - **persistence**: Property stores for owner and fragmentation snapshots
//! - **config**: Knowledge base settings, loadable from TOML
//!
//! ## Design Philosophy
//!
//! - **ANY is absence**: An unconstrained dimension is `None`, never a special tag
//! - **Single writer**: No internal locking; share a knowledge base behind a mutex
//! - **No back-references**: The owner is found by id, listeners of points are weak

pub mod algebra;
pub mod config;
pub mod error;
pub mod events;
pub mod knowledge_base;
pub mod persistence;

pub use algebra::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use knowledge_base::*;
pub use persistence::*;
