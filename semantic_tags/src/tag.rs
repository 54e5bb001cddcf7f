//! Tag definitions - the concrete values a context coordinate can take.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Unique identifier for tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub Uuid);

impl TagId {
    /// Create a new random tag ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil tag ID (useful for fixtures).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque spatial payload. Compared as a value, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    /// Well-known-text representation.
    pub wkt: String,
}

impl Geometry {
    pub fn new(wkt: impl Into<String>) -> Self {
        Self { wkt: wkt.into() }
    }

    /// A single point, longitude first as WKT expects.
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self::new(format!("POINT ({} {})", longitude, latitude))
    }
}

/// Opaque temporal payload: a start instant and a duration, both in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub from: i64,
    pub duration: i64,
}

impl TimeSpan {
    pub fn new(from: i64, duration: i64) -> Self {
        Self { from, duration }
    }

    pub fn until(&self) -> i64 {
        self.from.saturating_add(self.duration)
    }

    /// Check whether two spans share at least one instant.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.from <= other.until() && other.from <= self.until()
    }
}

/// What kind of tag this is, with the payload that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagKind {
    /// A plain concept (topics).
    Plain,

    /// A peer, reachable at zero or more addresses.
    Peer { addresses: Vec<String> },

    /// A location.
    Spatial(Geometry),

    /// A time span.
    Temporal(TimeSpan),
}

impl TagKind {
    /// Short name of the kind, used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Plain => "plain",
            TagKind::Peer { .. } => "peer",
            TagKind::Spatial(_) => "spatial",
            TagKind::Temporal(_) => "temporal",
        }
    }
}

/// A semantic tag names a real-world entity through one or more subject identifiers.
///
/// Equality and hashing go by [`TagId`]: two clones of the same stored tag are
/// equal, two independently created tags are not, even when they denote the same
/// entity. Use [`identical`] to ask the latter question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticTag {
    pub id: TagId,

    /// Human-readable name.
    pub name: String,

    /// Subject identifiers, without duplicates.
    pub sis: Vec<String>,

    pub kind: TagKind,

    /// Hidden tags are skipped by default enumeration.
    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl SemanticTag {
    /// Create a plain tag.
    pub fn new<S: Into<String>>(name: impl Into<String>, sis: impl IntoIterator<Item = S>) -> Self {
        let mut tag = Self {
            id: TagId::new(),
            name: name.into(),
            sis: Vec::new(),
            kind: TagKind::Plain,
            hidden: false,
            properties: BTreeMap::new(),
        };
        for si in sis {
            tag.add_si(si);
        }
        tag
    }

    /// Create a peer tag.
    pub fn peer<S: Into<String>, A: Into<String>>(
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
        addresses: impl IntoIterator<Item = A>,
    ) -> Self {
        Self::new(name, sis).with_kind(TagKind::Peer {
            addresses: addresses.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a spatial tag.
    pub fn spatial<S: Into<String>>(
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
        geometry: Geometry,
    ) -> Self {
        Self::new(name, sis).with_kind(TagKind::Spatial(geometry))
    }

    /// Create a temporal tag. Name and SI are derived from the span.
    pub fn temporal(from: i64, duration: i64) -> Self {
        let span = TimeSpan::new(from, duration);
        Self::new(
            format!("{}+{}", from, duration),
            [format!("urn:time:{}:{}", from, duration)],
        )
        .with_kind(TagKind::Temporal(span))
    }

    /// Replace the kind payload.
    pub fn with_kind(mut self, kind: TagKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Mark the tag as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Add a subject identifier. Returns false if it was already present.
    pub fn add_si(&mut self, si: impl Into<String>) -> bool {
        let si = si.into();
        if self.has_si(&si) {
            return false;
        }
        self.sis.push(si);
        true
    }

    /// Check whether this tag carries the given subject identifier.
    pub fn has_si(&self, si: &str) -> bool {
        self.sis.iter().any(|own| own == si)
    }

    pub fn is_peer(&self) -> bool {
        matches!(self.kind, TagKind::Peer { .. })
    }

    /// Peer addresses, empty for non-peer tags.
    pub fn addresses(&self) -> &[String] {
        match &self.kind {
            TagKind::Peer { addresses } => addresses,
            _ => &[],
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            TagKind::Spatial(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn time_span(&self) -> Option<&TimeSpan> {
        match &self.kind {
            TagKind::Temporal(span) => Some(span),
            _ => None,
        }
    }

    /// A copy reduced to identity: id, name, SIs and kind. Properties and peer
    /// addresses are dropped.
    pub fn identity(&self) -> SemanticTag {
        let kind = match &self.kind {
            TagKind::Peer { .. } => TagKind::Peer {
                addresses: Vec::new(),
            },
            other => other.clone(),
        };
        SemanticTag {
            id: self.id,
            name: self.name.clone(),
            sis: self.sis.clone(),
            kind,
            hidden: self.hidden,
            properties: BTreeMap::new(),
        }
    }
}

impl PartialEq for SemanticTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SemanticTag {}

impl Hash for SemanticTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.label(), self.name)
    }
}

/// Two concrete tags are identical when they are the same stored tag or share at
/// least one subject identifier. SIs compare byte-exact.
pub fn identical(a: &SemanticTag, b: &SemanticTag) -> bool {
    a.id == b.id || a.sis.iter().any(|si| b.has_si(si))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_creation() {
        let tag = SemanticTag::new("News", ["http://example.org/news"]);
        assert_eq!(tag.name, "News");
        assert_eq!(tag.sis, vec!["http://example.org/news".to_string()]);
        assert_eq!(tag.kind, TagKind::Plain);
        assert!(!tag.hidden);
    }

    #[test]
    fn test_duplicate_sis_collapse() {
        let tag = SemanticTag::new("News", ["si:news", "si:news", "si:headlines"]);
        assert_eq!(tag.sis.len(), 2);
    }

    #[test]
    fn test_identical_by_si_overlap() {
        let a = SemanticTag::new("A", ["si:1", "si:2"]);
        let b = SemanticTag::new("B", ["si:2", "si:3"]);
        let c = SemanticTag::new("C", ["si:4"]);

        assert!(identical(&a, &b));
        assert!(identical(&b, &a));
        assert!(!identical(&a, &c));
    }

    #[test]
    fn test_identical_is_case_sensitive() {
        let a = SemanticTag::new("A", ["si:News"]);
        let b = SemanticTag::new("B", ["si:news"]);
        assert!(!identical(&a, &b));
    }

    #[test]
    fn test_equality_goes_by_id() {
        let a = SemanticTag::new("A", ["si:1"]);
        let twin = SemanticTag::new("A", ["si:1"]);

        assert_eq!(a, a.clone());
        assert_ne!(a, twin);
        assert!(identical(&a, &twin));
    }

    #[test]
    fn test_identity_strips_payload() {
        let peer = SemanticTag::peer("Alice", ["si:alice"], ["tcp://alice:7070"])
            .with_property("role", "editor");
        let identity = peer.identity();

        assert_eq!(identity, peer);
        assert!(identity.addresses().is_empty());
        assert!(identity.properties.is_empty());
        assert!(identity.is_peer());
    }

    #[test]
    fn test_temporal_tag() {
        let tag = SemanticTag::temporal(1_000, 500);
        assert_eq!(tag.time_span(), Some(&TimeSpan::new(1_000, 500)));
        assert!(tag.has_si("urn:time:1000:500"));
    }

    #[test]
    fn test_time_span_overlap() {
        let a = TimeSpan::new(0, 10);
        let b = TimeSpan::new(10, 5);
        let c = TimeSpan::new(20, 5);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_tag_display() {
        let tag = SemanticTag::spatial("Berlin", ["si:berlin"], Geometry::point(52.52, 13.40));
        assert_eq!(tag.to_string(), "spatial:Berlin");
        assert_eq!(tag.geometry().map(|g| g.wkt.as_str()), Some("POINT (13.4 52.52)"));
    }
}
