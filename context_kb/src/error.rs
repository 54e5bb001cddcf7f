//! Errors raised by knowledge base operations.

use semantic_tags::{SetShape, TagDimension, TagError};

use crate::knowledge_base::ContextPointId;
use crate::persistence::StoreError;

/// A knowledge base operation failed.
#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("tag set operation failed: {0}")]
    Tags(#[from] TagError),

    #[error("{dimension} dimension is not a {expected:?}")]
    ShapeMismatch {
        dimension: TagDimension,
        expected: SetShape,
    },

    #[error("expected a {expected} tag set, got a {found} tag set")]
    DimensionMismatch {
        expected: TagDimension,
        found: TagDimension,
    },

    #[error("a context point with these coordinates already exists: {0}")]
    DuplicateCoordinates(ContextPointId),

    #[error("no context point with id {0}")]
    UnknownContextPoint(ContextPointId),

    #[error("no tag carries subject identifier {0}")]
    UnknownSubjectIdentifier(String),

    #[error("property store failed: {0}")]
    Store(#[from] StoreError),

    #[error("snapshot could not be decoded: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("configuration could not be parsed: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type KbResult<T> = Result<T, KbError>;
