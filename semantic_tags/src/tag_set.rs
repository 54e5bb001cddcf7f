//! Tag sets - the per-dimension containers of semantic tags.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{identical, SemanticNetView, SemanticTag, TagError, TagId, TagKind, TaxonomyView};

/// Name of the only relation a taxonomy holds: subject's super tag is object.
pub const SUPER_TAG: &str = "superTag";

/// The physical dimensions a knowledge base keeps tag sets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagDimension {
    Topic,
    Peer,
    Spatial,
    Temporal,
}

impl TagDimension {
    /// All dimensions, in lookup order.
    pub const ALL: [TagDimension; 4] = [
        TagDimension::Topic,
        TagDimension::Peer,
        TagDimension::Spatial,
        TagDimension::Temporal,
    ];

    /// Check whether a tag of the given kind may live in this dimension.
    pub fn accepts(&self, kind: &TagKind) -> bool {
        match self {
            TagDimension::Topic => true,
            TagDimension::Peer => matches!(kind, TagKind::Peer { .. }),
            TagDimension::Spatial => matches!(kind, TagKind::Spatial(_)),
            TagDimension::Temporal => matches!(kind, TagKind::Temporal(_)),
        }
    }
}

impl std::fmt::Display for TagDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TagDimension::Topic => "topic",
            TagDimension::Peer => "peer",
            TagDimension::Spatial => "spatial",
            TagDimension::Temporal => "temporal",
        };
        write!(f, "{}", name)
    }
}

/// How the tags of a set are related to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SetShape {
    /// No relations.
    #[default]
    Flat,
    /// Single-parent hierarchy built from `superTag` relations.
    Taxonomy,
    /// Arbitrary named relations.
    SemanticNet,
}

/// A directed, named relation between two tags of the same set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    pub subject: TagId,
    pub name: String,
    pub object: TagId,
}

impl Predicate {
    pub fn new(subject: TagId, name: impl Into<String>, object: TagId) -> Self {
        Self {
            subject,
            name: name.into(),
            object,
        }
    }

    /// Check whether the relation touches the given tag.
    pub fn involves(&self, id: TagId) -> bool {
        self.subject == id || self.object == id
    }
}

/// Outcome of merging a tag into a set.
#[derive(Debug, Clone)]
pub struct Merge {
    /// The tag as stored in the set.
    pub tag: SemanticTag,
    /// False when an identical tag was already present.
    pub created: bool,
}

/// A tag taken out of a set, together with the relations that went with it.
#[derive(Debug, Clone)]
pub struct Removal {
    pub tag: SemanticTag,
    pub predicates: Vec<Predicate>,
}

/// A set of semantic tags for one dimension.
///
/// The set keeps insertion order and guarantees that no two stored tags are
/// [`identical`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSet {
    dimension: TagDimension,
    shape: SetShape,
    tags: Vec<SemanticTag>,
    predicates: Vec<Predicate>,
    #[serde(default)]
    enumerate_hidden: bool,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new(dimension: TagDimension, shape: SetShape) -> Self {
        Self {
            dimension,
            shape,
            tags: Vec::new(),
            predicates: Vec::new(),
            enumerate_hidden: false,
        }
    }

    /// Create a flat set from the given tags without kind validation.
    ///
    /// Used for query dimensions; tags identical to an earlier one are skipped.
    pub fn from_tags(dimension: TagDimension, tags: impl IntoIterator<Item = SemanticTag>) -> Self {
        let mut set = Self::new(dimension, SetShape::Flat);
        for tag in tags {
            if !set.tags.iter().any(|t| identical(t, &tag)) {
                set.tags.push(tag);
            }
        }
        set
    }

    pub fn dimension(&self) -> TagDimension {
        self.dimension
    }

    pub fn shape(&self) -> SetShape {
        self.shape
    }

    /// Merge a tag into the set.
    ///
    /// If an identical tag is already stored, the new SIs are added to it and the
    /// stored tag is returned; otherwise the tag is inserted as given.
    pub fn merge(&mut self, tag: SemanticTag) -> Result<Merge, TagError> {
        if tag.sis.is_empty() {
            return Err(TagError::NoSubjectIdentifier { name: tag.name });
        }
        if !self.dimension.accepts(&tag.kind) {
            return Err(TagError::KindMismatch {
                dimension: self.dimension,
                kind: tag.kind.label(),
            });
        }

        let matches: Vec<usize> = self
            .tags
            .iter()
            .enumerate()
            .filter(|(_, t)| identical(t, &tag))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => {
                self.tags.push(tag.clone());
                Ok(Merge { tag, created: true })
            }
            [index] => {
                let stored = &mut self.tags[*index];
                for si in &tag.sis {
                    stored.add_si(si.clone());
                }
                Ok(Merge {
                    tag: stored.clone(),
                    created: false,
                })
            }
            // Absorbing the SIs would make two stored tags identical.
            [first, ..] => Ok(Merge {
                tag: self.tags[*first].clone(),
                created: false,
            }),
        }
    }

    /// Create a plain tag, or return the identical one already stored.
    pub fn create_tag<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
    ) -> Result<Merge, TagError> {
        self.merge(SemanticTag::new(name, sis))
    }

    /// Create a peer tag, or return the identical one already stored.
    pub fn create_peer_tag<S: Into<String>, A: Into<String>>(
        &mut self,
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
        addresses: impl IntoIterator<Item = A>,
    ) -> Result<Merge, TagError> {
        self.merge(SemanticTag::peer(name, sis, addresses))
    }

    /// Look up the first tag carrying any of the given SIs.
    pub fn get<S: AsRef<str>>(&self, sis: &[S]) -> Option<&SemanticTag> {
        self.tags
            .iter()
            .find(|tag| sis.iter().any(|si| tag.has_si(si.as_ref())))
    }

    /// Look up a tag by a single SI.
    pub fn get_by_si(&self, si: &str) -> Option<&SemanticTag> {
        self.get(&[si])
    }

    pub fn get_by_id(&self, id: TagId) -> Option<&SemanticTag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.get_by_id(id).is_some()
    }

    /// Remove the tag carrying any of the given SIs, with its relations.
    pub fn remove<S: AsRef<str>>(&mut self, sis: &[S]) -> Option<Removal> {
        let index = self
            .tags
            .iter()
            .position(|tag| sis.iter().any(|si| tag.has_si(si.as_ref())))?;
        let tag = self.tags.remove(index);

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.predicates)
            .into_iter()
            .partition(|p| p.involves(tag.id));
        self.predicates = kept;

        Some(Removal {
            tag,
            predicates: removed,
        })
    }

    /// Add an SI to a stored tag. The SI must not name a different tag.
    ///
    /// Returns false if the tag already carried it.
    pub fn add_si(&mut self, id: TagId, si: impl Into<String>) -> Result<bool, TagError> {
        let si = si.into();
        if let Some(other) = self.get_by_si(&si) {
            if other.id != id {
                return Err(TagError::DuplicateSubjectIdentifier(si));
            }
        }
        let tag = self
            .tags
            .iter_mut()
            .find(|tag| tag.id == id)
            .ok_or(TagError::UnknownTag(id))?;
        Ok(tag.add_si(si))
    }

    /// Enumerate tags, skipping hidden ones unless hidden enumeration is on.
    pub fn tags(&self) -> impl Iterator<Item = &SemanticTag> {
        let enumerate_hidden = self.enumerate_hidden;
        self.tags
            .iter()
            .filter(move |tag| enumerate_hidden || !tag.hidden)
    }

    /// Enumerate all tags, hidden ones included.
    pub fn all_tags(&self) -> impl Iterator<Item = &SemanticTag> {
        self.tags.iter()
    }

    pub fn set_enumerate_hidden(&mut self, enumerate_hidden: bool) {
        self.enumerate_hidden = enumerate_hidden;
    }

    pub fn enumerates_hidden(&self) -> bool {
        self.enumerate_hidden
    }

    /// Number of stored tags, hidden ones included.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Relate two stored tags.
    ///
    /// Returns false if the relation already existed.
    pub fn set_predicate(
        &mut self,
        subject: TagId,
        name: impl Into<String>,
        object: TagId,
    ) -> Result<bool, TagError> {
        let name = name.into();
        for id in [subject, object] {
            if !self.contains(id) {
                return Err(TagError::UnknownTag(id));
            }
        }

        let predicate = Predicate::new(subject, name, object);
        if self.predicates.contains(&predicate) {
            return Ok(false);
        }

        match self.shape {
            SetShape::Flat => return Err(TagError::Unstructured(self.dimension)),
            SetShape::Taxonomy => {
                if predicate.name != SUPER_TAG {
                    return Err(TagError::NotATaxonomyRelation(predicate.name));
                }
                if self.super_of(subject).is_some() {
                    return Err(TagError::MultipleSuperTags(subject));
                }
                if subject == object || self.ancestors(object).contains(&subject) {
                    return Err(TagError::Cycle { subject, object });
                }
            }
            SetShape::SemanticNet => {}
        }

        self.predicates.push(predicate);
        Ok(true)
    }

    /// Remove a relation. Returns false if it did not exist.
    pub fn remove_predicate(&mut self, subject: TagId, name: &str, object: TagId) -> bool {
        let before = self.predicates.len();
        self.predicates
            .retain(|p| !(p.subject == subject && p.name == name && p.object == object));
        self.predicates.len() != before
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Tags directly related to the given one, in either direction.
    pub fn neighbours(&self, id: TagId) -> Vec<TagId> {
        let mut seen = HashSet::new();
        self.predicates
            .iter()
            .filter_map(|p| {
                if p.subject == id {
                    Some(p.object)
                } else if p.object == id {
                    Some(p.subject)
                } else {
                    None
                }
            })
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Copy the given tags into a new set of the same dimension.
    ///
    /// `map` decides what of each tag is copied. Relations between copied tags
    /// survive only when `keep_relations` is set; the copy is flat otherwise.
    pub fn subset<F>(&self, ids: &[TagId], map: F, keep_relations: bool) -> TagSet
    where
        F: Fn(&SemanticTag) -> SemanticTag,
    {
        let shape = if keep_relations { self.shape } else { SetShape::Flat };
        let mut out = TagSet::new(self.dimension, shape);
        out.enumerate_hidden = self.enumerate_hidden;

        for id in ids {
            if out.contains(*id) {
                continue;
            }
            if let Some(tag) = self.get_by_id(*id) {
                out.tags.push(map(tag));
            }
        }

        if keep_relations {
            out.predicates = self
                .predicates
                .iter()
                .filter(|p| out.contains(p.subject) && out.contains(p.object))
                .cloned()
                .collect();
        }
        out
    }

    /// View the set as a taxonomy, if it is one.
    pub fn as_taxonomy(&self) -> Option<TaxonomyView<'_>> {
        match self.shape {
            SetShape::Taxonomy => Some(TaxonomyView::new(self)),
            _ => None,
        }
    }

    /// View the set as a semantic net, if it is one.
    pub fn as_semantic_net(&self) -> Option<SemanticNetView<'_>> {
        match self.shape {
            SetShape::SemanticNet => Some(SemanticNetView::new(self)),
            _ => None,
        }
    }

    pub(crate) fn super_of(&self, id: TagId) -> Option<TagId> {
        self.predicates
            .iter()
            .find(|p| p.subject == id && p.name == SUPER_TAG)
            .map(|p| p.object)
    }

    pub(crate) fn ancestors(&self, id: TagId) -> Vec<TagId> {
        let mut chain = Vec::new();
        let mut current = self.super_of(id);
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.super_of(parent);
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Geometry;

    fn no_addresses() -> std::iter::Empty<String> {
        std::iter::empty()
    }

    #[test]
    fn test_create_and_lookup() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        let merge = topics.create_tag("News", ["si:news"]).unwrap();

        assert!(merge.created);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics.get_by_si("si:news").unwrap().name, "News");
        assert!(topics.get(&["si:unknown", "si:news"]).is_some());
        assert!(topics.get_by_si("si:sports").is_none());
    }

    #[test]
    fn test_merge_absorbs_identical() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Flat);
        let first = topics.create_tag("News", ["si:news"]).unwrap();
        let second = topics.create_tag("Headlines", ["si:news", "si:headlines"]).unwrap();

        assert!(!second.created);
        assert_eq!(second.tag.id, first.tag.id);
        assert_eq!(topics.len(), 1);
        assert!(topics.get_by_si("si:headlines").is_some());
    }

    #[test]
    fn test_merge_rejects_missing_si() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Flat);
        let err = topics.create_tag("Nameless", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, TagError::NoSubjectIdentifier { .. }));
    }

    #[test]
    fn test_peer_set_rejects_plain_tag() {
        let mut peers = TagSet::new(TagDimension::Peer, SetShape::Taxonomy);
        let err = peers.merge(SemanticTag::new("Alice", ["si:alice"])).unwrap_err();
        assert_eq!(
            err,
            TagError::KindMismatch {
                dimension: TagDimension::Peer,
                kind: "plain"
            }
        );

        assert!(peers.create_peer_tag("Alice", ["si:alice"], no_addresses()).is_ok());
    }

    #[test]
    fn test_spatial_set_accepts_spatial() {
        let mut locations = TagSet::new(TagDimension::Spatial, SetShape::Flat);
        let tag = SemanticTag::spatial("Berlin", ["si:berlin"], Geometry::point(52.5, 13.4));
        assert!(locations.merge(tag).unwrap().created);
    }

    #[test]
    fn test_hidden_enumeration() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Flat);
        topics.create_tag("Visible", ["si:visible"]).unwrap();
        topics.merge(SemanticTag::new("Hidden", ["si:hidden"]).hidden()).unwrap();

        assert_eq!(topics.tags().count(), 1);
        assert_eq!(topics.all_tags().count(), 2);

        topics.set_enumerate_hidden(true);
        assert_eq!(topics.tags().count(), 2);
    }

    #[test]
    fn test_remove_takes_relations() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        let news = topics.create_tag("News", ["si:news"]).unwrap().tag;
        let sports = topics.create_tag("Sports", ["si:sports"]).unwrap().tag;
        topics.set_predicate(sports.id, "partOf", news.id).unwrap();

        let removal = topics.remove(&["si:news"]).unwrap();
        assert_eq!(removal.tag.id, news.id);
        assert_eq!(removal.predicates.len(), 1);
        assert!(topics.predicates().is_empty());
        assert!(topics.get_by_si("si:news").is_none());
        assert!(topics.remove(&["si:news"]).is_none());
    }

    #[test]
    fn test_add_si_conflict() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Flat);
        let news = topics.create_tag("News", ["si:news"]).unwrap().tag;
        topics.create_tag("Sports", ["si:sports"]).unwrap();

        assert_eq!(topics.add_si(news.id, "si:headlines"), Ok(true));
        assert_eq!(topics.add_si(news.id, "si:headlines"), Ok(false));
        assert_eq!(
            topics.add_si(news.id, "si:sports"),
            Err(TagError::DuplicateSubjectIdentifier("si:sports".to_string()))
        );
    }

    #[test]
    fn test_flat_set_has_no_relations() {
        let mut locations = TagSet::new(TagDimension::Topic, SetShape::Flat);
        let a = locations.create_tag("A", ["si:a"]).unwrap().tag;
        let b = locations.create_tag("B", ["si:b"]).unwrap().tag;

        assert_eq!(
            locations.set_predicate(a.id, "near", b.id),
            Err(TagError::Unstructured(TagDimension::Topic))
        );
    }

    #[test]
    fn test_taxonomy_rules() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Taxonomy);
        let root = topics.create_tag("Root", ["si:root"]).unwrap().tag;
        let child = topics.create_tag("Child", ["si:child"]).unwrap().tag;
        let other = topics.create_tag("Other", ["si:other"]).unwrap().tag;

        assert_eq!(topics.set_predicate(child.id, SUPER_TAG, root.id), Ok(true));
        assert_eq!(topics.set_predicate(child.id, SUPER_TAG, root.id), Ok(false));
        assert_eq!(
            topics.set_predicate(child.id, SUPER_TAG, other.id),
            Err(TagError::MultipleSuperTags(child.id))
        );
        assert_eq!(
            topics.set_predicate(root.id, SUPER_TAG, child.id),
            Err(TagError::Cycle {
                subject: root.id,
                object: child.id
            })
        );
        assert_eq!(
            topics.set_predicate(other.id, "relatedTo", root.id),
            Err(TagError::NotATaxonomyRelation("relatedTo".to_string()))
        );
    }

    #[test]
    fn test_neighbours_both_directions() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        let a = topics.create_tag("A", ["si:a"]).unwrap().tag;
        let b = topics.create_tag("B", ["si:b"]).unwrap().tag;
        let c = topics.create_tag("C", ["si:c"]).unwrap().tag;
        topics.set_predicate(a.id, "likes", b.id).unwrap();
        topics.set_predicate(c.id, "likes", a.id).unwrap();
        topics.set_predicate(c.id, "knows", a.id).unwrap();

        let neighbours = topics.neighbours(a.id);
        assert_eq!(neighbours, vec![b.id, c.id]);
    }

    #[test]
    fn test_subset_keeps_inner_relations() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        let a = topics.create_tag("A", ["si:a"]).unwrap().tag;
        let b = topics.create_tag("B", ["si:b"]).unwrap().tag;
        let c = topics.create_tag("C", ["si:c"]).unwrap().tag;
        topics.set_predicate(a.id, "likes", b.id).unwrap();
        topics.set_predicate(b.id, "likes", c.id).unwrap();

        let with_relations = topics.subset(&[a.id, b.id], SemanticTag::clone, true);
        assert_eq!(with_relations.len(), 2);
        assert_eq!(with_relations.predicates().len(), 1);
        assert_eq!(with_relations.shape(), SetShape::SemanticNet);

        let flat = topics.subset(&[a.id, b.id], SemanticTag::identity, false);
        assert!(flat.predicates().is_empty());
        assert_eq!(flat.shape(), SetShape::Flat);
    }

    #[test]
    fn test_from_tags_skips_identical() {
        let a = SemanticTag::new("A", ["si:a"]);
        let twin = SemanticTag::new("A again", ["si:a"]);
        let b = SemanticTag::new("B", ["si:b"]);

        let set = TagSet::from_tags(TagDimension::Topic, [a, twin, b]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_tag_set_serde() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Taxonomy);
        let root = topics.create_tag("Root", ["si:root"]).unwrap().tag;
        let child = topics.create_tag("Child", ["si:child"]).unwrap().tag;
        topics.set_predicate(child.id, SUPER_TAG, root.id).unwrap();

        let json = serde_json::to_string(&topics).unwrap();
        let restored: TagSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.predicates(), topics.predicates());
    }
}
