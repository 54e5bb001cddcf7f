//! Knowledge Base module - context points indexed by position in context space.
//!
//! The knowledge base consists of:
//! - **Coordinates**: Seven-dimensional addresses; `None` in a tag dimension is ANY
//! - **Context spaces**: Compound descriptors used as queries and interests
//! - **Context points**: Information stored at one coordinate
//! - **Knowledge**: The store enforcing unique coordinates
//! - **KnowledgeBase**: Tag sets, owner, knowledge and listeners put together

mod context_point;
mod context_space;
mod coordinates;
mod information;
mod kb;
mod knowledge;

pub use context_point::*;
pub use context_space::*;
pub use coordinates::*;
pub use information::*;
pub use kb::*;
pub use knowledge::*;
