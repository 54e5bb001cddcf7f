//! Typed read views over structured tag sets.
//!
//! A view is only handed out when the set actually has the requested shape, so
//! callers branch on `Option` instead of hitting a shape error later.

use crate::{SemanticTag, TagId, TagSet, SUPER_TAG};

/// Hierarchy view of a taxonomy-shaped set.
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyView<'a> {
    set: &'a TagSet,
}

impl<'a> TaxonomyView<'a> {
    pub(crate) fn new(set: &'a TagSet) -> Self {
        Self { set }
    }

    /// The direct super tag of a tag.
    pub fn super_tag(&self, id: TagId) -> Option<&'a SemanticTag> {
        self.set.super_of(id).and_then(|parent| self.set.get_by_id(parent))
    }

    /// Direct sub tags, in set order.
    pub fn sub_tags(&self, id: TagId) -> Vec<&'a SemanticTag> {
        let children: Vec<TagId> = self
            .set
            .predicates()
            .iter()
            .filter(|p| p.name == SUPER_TAG && p.object == id)
            .map(|p| p.subject)
            .collect();
        self.set
            .all_tags()
            .filter(|tag| children.contains(&tag.id))
            .collect()
    }

    /// Super tags from the direct parent up to the root.
    pub fn ancestors(&self, id: TagId) -> Vec<&'a SemanticTag> {
        self.set
            .ancestors(id)
            .into_iter()
            .filter_map(|ancestor| self.set.get_by_id(ancestor))
            .collect()
    }

    /// Tags without a super tag.
    pub fn roots(&self) -> Vec<&'a SemanticTag> {
        self.set
            .all_tags()
            .filter(|tag| self.set.super_of(tag.id).is_none())
            .collect()
    }
}

/// Graph view of a semantic-net-shaped set.
#[derive(Debug, Clone, Copy)]
pub struct SemanticNetView<'a> {
    set: &'a TagSet,
}

impl<'a> SemanticNetView<'a> {
    pub(crate) fn new(set: &'a TagSet) -> Self {
        Self { set }
    }

    /// Objects the tag points to via the named relation.
    pub fn targets(&self, id: TagId, predicate: &str) -> Vec<&'a SemanticTag> {
        self.set
            .predicates()
            .iter()
            .filter(|p| p.subject == id && p.name == predicate)
            .filter_map(|p| self.set.get_by_id(p.object))
            .collect()
    }

    /// Subjects pointing to the tag via the named relation.
    pub fn sources(&self, id: TagId, predicate: &str) -> Vec<&'a SemanticTag> {
        self.set
            .predicates()
            .iter()
            .filter(|p| p.object == id && p.name == predicate)
            .filter_map(|p| self.set.get_by_id(p.subject))
            .collect()
    }

    /// Names of the relations leaving the tag, without duplicates.
    pub fn predicate_names(&self, id: TagId) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for p in self.set.predicates().iter().filter(|p| p.subject == id) {
            if !names.contains(&p.name.as_str()) {
                names.push(p.name.as_str());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use crate::{SetShape, TagDimension, TagSet, SUPER_TAG};

    #[test]
    fn test_views_follow_shape() {
        let net = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        assert!(net.as_semantic_net().is_some());
        assert!(net.as_taxonomy().is_none());

        let taxonomy = TagSet::new(TagDimension::Peer, SetShape::Taxonomy);
        assert!(taxonomy.as_taxonomy().is_some());
        assert!(taxonomy.as_semantic_net().is_none());

        let flat = TagSet::new(TagDimension::Spatial, SetShape::Flat);
        assert!(flat.as_taxonomy().is_none());
        assert!(flat.as_semantic_net().is_none());
    }

    #[test]
    fn test_taxonomy_view() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::Taxonomy);
        let science = topics.create_tag("Science", ["si:science"]).unwrap().tag;
        let physics = topics.create_tag("Physics", ["si:physics"]).unwrap().tag;
        let optics = topics.create_tag("Optics", ["si:optics"]).unwrap().tag;
        topics.set_predicate(physics.id, SUPER_TAG, science.id).unwrap();
        topics.set_predicate(optics.id, SUPER_TAG, physics.id).unwrap();

        let view = topics.as_taxonomy().unwrap();
        assert_eq!(view.super_tag(optics.id).unwrap().id, physics.id);
        assert!(view.super_tag(science.id).is_none());
        assert_eq!(view.sub_tags(science.id).len(), 1);
        assert_eq!(view.ancestors(optics.id).len(), 2);
        assert_eq!(view.roots().len(), 1);
    }

    #[test]
    fn test_semantic_net_view() {
        let mut topics = TagSet::new(TagDimension::Topic, SetShape::SemanticNet);
        let rust = topics.create_tag("Rust", ["si:rust"]).unwrap().tag;
        let llvm = topics.create_tag("LLVM", ["si:llvm"]).unwrap().tag;
        let cargo = topics.create_tag("Cargo", ["si:cargo"]).unwrap().tag;
        topics.set_predicate(rust.id, "uses", llvm.id).unwrap();
        topics.set_predicate(rust.id, "uses", cargo.id).unwrap();
        topics.set_predicate(cargo.id, "buildsFor", rust.id).unwrap();

        let view = topics.as_semantic_net().unwrap();
        assert_eq!(view.targets(rust.id, "uses").len(), 2);
        assert_eq!(view.sources(rust.id, "buildsFor").len(), 1);
        assert_eq!(view.predicate_names(rust.id), vec!["uses"]);
    }
}
