//! Knowledge base configuration.
//!
//! ```toml
//! empty_dimension_policy = "match_nothing"
//!
//! [fragmentation.topic]
//! include_full_knowledge = true
//! hierarchical = true
//! max_depth = 3
//! ```
//!
//! Missing keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::algebra::{EmptyDimensionPolicy, FragmentationParameters};
use crate::error::KbResult;

/// Settings fixed when a knowledge base is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Default fragmentation used by projection.
    pub fragmentation: FragmentationParameters,

    /// How empty, non-ANY query dimensions are treated.
    pub empty_dimension_policy: EmptyDimensionPolicy,
}

impl KnowledgeBaseConfig {
    pub fn from_toml_str(source: &str) -> KbResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> KbResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
