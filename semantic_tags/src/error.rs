//! Errors raised by tag sets.

use crate::{TagDimension, TagId};

/// A structural change a tag set refused to perform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("tag '{name}' has no subject identifier")]
    NoSubjectIdentifier { name: String },

    #[error("a {dimension} tag set cannot hold a {kind} tag")]
    KindMismatch {
        dimension: TagDimension,
        kind: &'static str,
    },

    #[error("unknown tag {0}")]
    UnknownTag(TagId),

    #[error("subject identifier '{0}' already names another tag")]
    DuplicateSubjectIdentifier(String),

    #[error("the {0} tag set is flat and holds no relations")]
    Unstructured(TagDimension),

    #[error("a taxonomy only holds 'superTag' relations, got '{0}'")]
    NotATaxonomyRelation(String),

    #[error("tag {0} already has a super tag")]
    MultipleSuperTags(TagId),

    #[error("relating {subject} to {object} would create a cycle")]
    Cycle { subject: TagId, object: TagId },
}
