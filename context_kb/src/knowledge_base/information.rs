//! Information items - the content stored at a context point.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use uuid::Uuid;

/// Content type given to textual content.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Content type given to raw bytes.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Unique identifier for information items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InformationId(pub Uuid);

impl InformationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InformationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InformationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// BLAKE3 hash of an item's content bytes. Used for deduplication, not identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of(content: &[u8]) -> Self {
        Self(*blake3::hash(content).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// An opaque content item with a MIME type, an optional name and free-form properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Information {
    pub id: InformationId,

    pub name: Option<String>,

    /// MIME type of the content.
    pub content_type: String,

    content: Vec<u8>,

    content_hash: ContentHash,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Information {
    /// Wrap raw bytes.
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            id: InformationId::new(),
            name: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_hash: ContentHash::of(&content),
            content,
            properties: BTreeMap::new(),
        }
    }

    /// Wrap text; the content type defaults to `text/plain`.
    pub fn text(content: impl Into<String>) -> Self {
        let content: String = content.into();
        Self::new(content.into_bytes()).with_content_type(TEXT_CONTENT_TYPE)
    }

    /// Read at most `limit` bytes from a reader.
    pub fn from_reader(reader: impl Read, limit: u64) -> std::io::Result<Self> {
        let mut content = Vec::new();
        reader.take(limit).read_to_end(&mut content)?;
        Ok(Self::new(content))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as UTF-8 text, if it is valid UTF-8.
    pub fn content_as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Replace the content, keeping the hash in step.
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
        self.content_hash = ContentHash::of(&self.content);
    }

    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Case-insensitive name match. `None` only matches unnamed items.
    pub fn has_name(&self, name: Option<&str>) -> bool {
        match (name, self.name.as_deref()) {
            (None, None) => true,
            (Some(wanted), Some(own)) => wanted.to_lowercase() == own.to_lowercase(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_information() {
        let info = Information::text("hello");
        assert_eq!(info.content_type, TEXT_CONTENT_TYPE);
        assert_eq!(info.content_as_str(), Some("hello"));
        assert_eq!(info.len(), 5);
        assert!(info.name.is_none());
    }

    #[test]
    fn test_bytes_information() {
        let info = Information::new(vec![0xff, 0x00]);
        assert_eq!(info.content_type, DEFAULT_CONTENT_TYPE);
        assert!(info.content_as_str().is_none());
    }

    #[test]
    fn test_hash_follows_content() {
        let a = Information::text("same");
        let b = Information::new(b"same".to_vec()).with_name("other");
        let mut c = Information::text("different");

        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
        assert_ne!(a.id, b.id);

        c.set_content("same");
        assert_eq!(a.content_hash(), c.content_hash());
        assert_eq!(a.content_hash().to_hex().len(), 64);
    }

    #[test]
    fn test_from_reader_respects_limit() {
        let data: &[u8] = b"0123456789";
        let info = Information::from_reader(data, 4).unwrap();
        assert_eq!(info.content(), b"0123");
    }

    #[test]
    fn test_has_name() {
        let named = Information::text("x").with_name("Report");
        let unnamed = Information::text("y");

        assert!(named.has_name(Some("report")));
        assert!(named.has_name(Some("REPORT")));
        assert!(!named.has_name(None));
        assert!(unnamed.has_name(None));
        assert!(!unnamed.has_name(Some("report")));
    }
}
