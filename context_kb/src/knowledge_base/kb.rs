//! The knowledge base - tag sets, owner, knowledge and listeners in one place.

use semantic_tags::{
    Geometry, Removal, SemanticNetView, SemanticTag, SetShape, TagDimension, TagError, TagId,
    TagSet, TaxonomyView, SUPER_TAG,
};
use std::collections::HashSet;
use std::sync::Arc;

use super::{
    ContextCoordinates, ContextPoint, ContextPointId, ContextSpace, Dimension, Direction,
    Information, InformationId, Knowledge,
};
use crate::algebra::{self, FragmentationParameters};
use crate::config::KnowledgeBaseConfig;
use crate::error::{KbError, KbResult};
use crate::events::{EventBus, KnowledgeBaseListener, ListenerId};
use crate::persistence::{
    MemoryPropertyStore, OwnerSnapshot, PropertyStore, DEFAULT_FP_KEY, OWNER_KEY,
};

/// How a knowledge base refers to its owner.
///
/// The owner is looked up by id in the peer set rather than held as a shared
/// reference, so the owner tag never points back at the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// A tag stored in the peer set.
    Resolved(TagId),
    /// A tag the peer set could not take. It lives outside every tag set.
    Detached(SemanticTag),
}

/// A knowledge base: four tag sets, an owner, the stored context points, and
/// the subscribers told about changes to any of them.
///
/// Not thread-safe by itself; wrap it in a mutex or give it a single owning
/// task to share it. Listener callbacks run synchronously inside mutating
/// calls and must not call back into the same knowledge base.
pub struct KnowledgeBase {
    topics: TagSet,
    peers: TagSet,
    locations: TagSet,
    times: TagSet,
    owner: Option<Owner>,
    knowledge: Knowledge,
    config: KnowledgeBaseConfig,
    listeners: EventBus<dyn KnowledgeBaseListener>,
    store: Box<dyn PropertyStore>,
}

impl KnowledgeBase {
    /// Create a knowledge base from its four tag sets.
    pub fn new(topics: TagSet, peers: TagSet, locations: TagSet, times: TagSet) -> KbResult<Self> {
        expect_dimension(&topics, TagDimension::Topic)?;
        expect_dimension(&peers, TagDimension::Peer)?;
        expect_dimension(&locations, TagDimension::Spatial)?;
        expect_dimension(&times, TagDimension::Temporal)?;
        Ok(Self::from_parts(topics, peers, locations, times))
    }

    /// An empty knowledge base: taxonomy topics, semantic-net peers, flat
    /// locations and times, volatile property store.
    pub fn in_memory() -> Self {
        Self::from_parts(
            TagSet::new(TagDimension::Topic, SetShape::Taxonomy),
            TagSet::new(TagDimension::Peer, SetShape::SemanticNet),
            TagSet::new(TagDimension::Spatial, SetShape::Flat),
            TagSet::new(TagDimension::Temporal, SetShape::Flat),
        )
    }

    fn from_parts(topics: TagSet, peers: TagSet, locations: TagSet, times: TagSet) -> Self {
        Self {
            topics,
            peers,
            locations,
            times,
            owner: None,
            knowledge: Knowledge::new(),
            config: KnowledgeBaseConfig::default(),
            listeners: EventBus::new(),
            store: Box::new(MemoryPropertyStore::new()),
        }
    }

    pub fn with_config(mut self, config: KnowledgeBaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from existing knowledge instead of an empty store.
    pub fn with_knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn with_property_store(mut self, store: Box<dyn PropertyStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &KnowledgeBaseConfig {
        &self.config
    }

    /// Hand the property store back, e.g. to reopen it in a new knowledge base.
    pub fn into_property_store(self) -> Box<dyn PropertyStore> {
        self.store
    }

    pub fn topics(&self) -> &TagSet {
        &self.topics
    }

    pub fn peers(&self) -> &TagSet {
        &self.peers
    }

    pub fn locations(&self) -> &TagSet {
        &self.locations
    }

    pub fn times(&self) -> &TagSet {
        &self.times
    }

    pub fn tag_set(&self, dimension: TagDimension) -> &TagSet {
        match dimension {
            TagDimension::Topic => &self.topics,
            TagDimension::Peer => &self.peers,
            TagDimension::Spatial => &self.locations,
            TagDimension::Temporal => &self.times,
        }
    }

    fn tag_set_mut(&mut self, dimension: TagDimension) -> &mut TagSet {
        match dimension {
            TagDimension::Topic => &mut self.topics,
            TagDimension::Peer => &mut self.peers,
            TagDimension::Spatial => &mut self.locations,
            TagDimension::Temporal => &mut self.times,
        }
    }

    pub fn topics_as_taxonomy(&self) -> KbResult<TaxonomyView<'_>> {
        self.topics
            .as_taxonomy()
            .ok_or_else(|| shape_mismatch(TagDimension::Topic, SetShape::Taxonomy))
    }

    pub fn topics_as_semantic_net(&self) -> KbResult<SemanticNetView<'_>> {
        self.topics
            .as_semantic_net()
            .ok_or_else(|| shape_mismatch(TagDimension::Topic, SetShape::SemanticNet))
    }

    pub fn peers_as_taxonomy(&self) -> KbResult<TaxonomyView<'_>> {
        self.peers
            .as_taxonomy()
            .ok_or_else(|| shape_mismatch(TagDimension::Peer, SetShape::Taxonomy))
    }

    pub fn peers_as_semantic_net(&self) -> KbResult<SemanticNetView<'_>> {
        self.peers
            .as_semantic_net()
            .ok_or_else(|| shape_mismatch(TagDimension::Peer, SetShape::SemanticNet))
    }

    /// Merge a tag into the set of a dimension, announcing it if it is new.
    ///
    /// Returns the tag as stored, which is the existing one when an identical
    /// tag was already there.
    pub fn merge_tag(&mut self, dimension: TagDimension, tag: SemanticTag) -> KbResult<SemanticTag> {
        let merge = self.tag_set_mut(dimension).merge(tag)?;
        if merge.created {
            tracing::debug!(
                target: "context_kb::knowledge",
                dimension = %dimension,
                tag = %merge.tag,
                "tag created"
            );
            self.announce_tag(dimension, &merge.tag, true);
        } else {
            // The stored tag may have absorbed new SIs.
            self.knowledge.refresh_tag(&merge.tag);
        }
        Ok(merge.tag)
    }

    pub fn create_topic<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
    ) -> KbResult<SemanticTag> {
        self.merge_tag(TagDimension::Topic, SemanticTag::new(name, sis))
    }

    pub fn create_peer<S: Into<String>, A: Into<String>>(
        &mut self,
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
        addresses: impl IntoIterator<Item = A>,
    ) -> KbResult<SemanticTag> {
        self.merge_tag(TagDimension::Peer, SemanticTag::peer(name, sis, addresses))
    }

    pub fn create_location<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        sis: impl IntoIterator<Item = S>,
        geometry: Geometry,
    ) -> KbResult<SemanticTag> {
        self.merge_tag(TagDimension::Spatial, SemanticTag::spatial(name, sis, geometry))
    }

    pub fn create_time(&mut self, from: i64, duration: i64) -> KbResult<SemanticTag> {
        self.merge_tag(TagDimension::Temporal, SemanticTag::temporal(from, duration))
    }

    /// Look a tag up by SI in every dimension: topics, peers, locations, times.
    pub fn get_semantic_tag<S: AsRef<str>>(&self, sis: &[S]) -> Option<&SemanticTag> {
        TagDimension::ALL
            .iter()
            .find_map(|d| self.tag_set(*d).get(sis))
    }

    pub fn get_peer<S: AsRef<str>>(&self, sis: &[S]) -> Option<&SemanticTag> {
        self.peers.get(sis)
    }

    /// Visible tags of every dimension, in lookup order.
    pub fn tags(&self) -> impl Iterator<Item = &SemanticTag> {
        self.topics
            .tags()
            .chain(self.peers.tags())
            .chain(self.locations.tags())
            .chain(self.times.tags())
    }

    /// Remove the tag carrying any of the SIs from every dimension it is in.
    ///
    /// Context points keep their coordinates. An owner that is removed from the
    /// peer set is kept as a detached owner.
    pub fn remove_semantic_tag<S: AsRef<str>>(&mut self, sis: &[S]) -> Vec<SemanticTag> {
        let mut removed = Vec::new();
        for dimension in TagDimension::ALL {
            let Some(Removal { tag, predicates }) = self.tag_set_mut(dimension).remove(sis) else {
                continue;
            };

            for predicate in &predicates {
                let other_id = if predicate.subject == tag.id {
                    predicate.object
                } else {
                    predicate.subject
                };
                let other = self
                    .tag_set(dimension)
                    .get_by_id(other_id)
                    .cloned()
                    .unwrap_or_else(|| tag.clone());
                let (subject, object) = if predicate.subject == tag.id {
                    (&tag, &other)
                } else {
                    (&other, &tag)
                };
                self.listeners.publish("predicate_removed", |l| {
                    l.predicate_removed(subject, &predicate.name, object)
                });
            }

            if self.owner == Some(Owner::Resolved(tag.id)) {
                tracing::warn!(
                    target: "context_kb::knowledge",
                    owner = %tag,
                    "owner removed from the peer set, keeping it detached"
                );
                self.owner = Some(Owner::Detached(tag.clone()));
            }

            tracing::debug!(
                target: "context_kb::knowledge",
                dimension = %dimension,
                tag = %tag,
                "tag removed"
            );
            self.announce_tag(dimension, &tag, false);
            removed.push(tag);
        }
        removed
    }

    /// Add an SI to a stored tag. Persists when the tag is the owner.
    ///
    /// Context points referencing the tag see the new SI right away.
    pub fn add_si(&mut self, id: TagId, si: impl Into<String>) -> KbResult<bool> {
        let dimension = TagDimension::ALL
            .into_iter()
            .find(|d| self.tag_set(*d).contains(id))
            .ok_or(TagError::UnknownTag(id))?;

        let added = self.tag_set_mut(dimension).add_si(id, si)?;
        if !added {
            return Ok(false);
        }
        if let Some(stored) = self.tag_set(dimension).get_by_id(id).cloned() {
            self.knowledge.refresh_tag(&stored);
        }
        if self.owner == Some(Owner::Resolved(id)) {
            self.persist();
        }
        Ok(true)
    }

    /// Add an SI to the stored tag already carrying `known`.
    pub fn add_si_to(&mut self, known: &str, si: impl Into<String>) -> KbResult<bool> {
        let id = self
            .get_semantic_tag(&[known])
            .map(|tag| tag.id)
            .ok_or_else(|| KbError::UnknownSubjectIdentifier(known.to_string()))?;
        self.add_si(id, si)
    }

    /// Relate two tags of a dimension. Returns false if the relation existed.
    pub fn set_predicate(
        &mut self,
        dimension: TagDimension,
        subject: TagId,
        predicate: &str,
        object: TagId,
    ) -> KbResult<bool> {
        let created = self
            .tag_set_mut(dimension)
            .set_predicate(subject, predicate, object)?;
        if created {
            let set = self.tag_set(dimension);
            if let (Some(s), Some(o)) = (set.get_by_id(subject), set.get_by_id(object)) {
                self.listeners
                    .publish("predicate_created", |l| l.predicate_created(s, predicate, o));
            }
        }
        Ok(created)
    }

    /// Make `super_tag` the parent of `sub_tag` in a taxonomy dimension.
    pub fn set_super_tag(
        &mut self,
        dimension: TagDimension,
        sub_tag: TagId,
        super_tag: TagId,
    ) -> KbResult<bool> {
        if self.tag_set(dimension).shape() != SetShape::Taxonomy {
            return Err(shape_mismatch(dimension, SetShape::Taxonomy));
        }
        self.set_predicate(dimension, sub_tag, SUPER_TAG, super_tag)
    }

    /// Remove a relation. Returns false if it did not exist.
    pub fn remove_predicate(
        &mut self,
        dimension: TagDimension,
        subject: TagId,
        predicate: &str,
        object: TagId,
    ) -> bool {
        if !self
            .tag_set_mut(dimension)
            .remove_predicate(subject, predicate, object)
        {
            return false;
        }
        let set = self.tag_set(dimension);
        if let (Some(s), Some(o)) = (set.get_by_id(subject), set.get_by_id(object)) {
            self.listeners
                .publish("predicate_removed", |l| l.predicate_removed(s, predicate, o));
        }
        true
    }

    fn announce_tag(&self, dimension: TagDimension, tag: &SemanticTag, added: bool) {
        let bus = &self.listeners;
        match (dimension, added) {
            (TagDimension::Topic, true) => bus.publish("topic_added", |l| l.topic_added(tag)),
            (TagDimension::Topic, false) => bus.publish("topic_removed", |l| l.topic_removed(tag)),
            (TagDimension::Peer, true) => bus.publish("peer_added", |l| l.peer_added(tag)),
            (TagDimension::Peer, false) => bus.publish("peer_removed", |l| l.peer_removed(tag)),
            (TagDimension::Spatial, true) => {
                bus.publish("location_added", |l| l.location_added(tag))
            }
            (TagDimension::Spatial, false) => {
                bus.publish("location_removed", |l| l.location_removed(tag))
            }
            (TagDimension::Temporal, true) => {
                bus.publish("timespan_added", |l| l.timespan_added(tag))
            }
            (TagDimension::Temporal, false) => {
                bus.publish("timespan_removed", |l| l.timespan_removed(tag))
            }
        };
    }

    /// The owner tag, looked up in the peer set when resolved.
    pub fn owner(&self) -> Option<&SemanticTag> {
        match self.owner.as_ref()? {
            Owner::Resolved(id) => self.peers.get_by_id(*id),
            Owner::Detached(tag) => Some(tag),
        }
    }

    pub fn owner_binding(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    /// Set the owner, merging it into the peer set.
    ///
    /// If the peer set refuses the tag, the given tag is kept as a detached
    /// owner and a warning is logged. Never fails.
    pub fn set_owner(&mut self, owner: SemanticTag) {
        let fallback = owner.clone();
        let binding = match self.merge_tag(TagDimension::Peer, owner) {
            Ok(stored) => Owner::Resolved(stored.id),
            Err(err) => {
                tracing::warn!(
                    target: "context_kb::knowledge",
                    owner = %fallback,
                    error = %err,
                    "cannot store owner in the peer set, keeping it detached"
                );
                Owner::Detached(fallback)
            }
        };
        self.owner = Some(binding);
        self.persist();
    }

    pub fn default_fragmentation(&self) -> &FragmentationParameters {
        &self.config.fragmentation
    }

    pub fn set_default_fragmentation(&mut self, fps: FragmentationParameters) {
        self.config.fragmentation = fps;
        self.persist();
    }

    /// Write the owner and default fragmentation snapshots.
    ///
    /// Best effort: a failing store is logged and the in-memory state is kept.
    pub fn persist(&mut self) {
        if let Err(err) = self.write_snapshots() {
            tracing::warn!(
                target: "context_kb::persistence",
                error = %err,
                "cannot write knowledge base snapshot"
            );
        }
    }

    fn write_snapshots(&mut self) -> KbResult<()> {
        match self.owner().map(OwnerSnapshot::from) {
            Some(snapshot) => {
                let raw = serde_json::to_string(&snapshot)?;
                self.store.set(OWNER_KEY, &raw)?;
            }
            None => self.store.remove(OWNER_KEY)?,
        }

        let raw = serde_json::to_string(&self.config.fragmentation)?;
        self.store.set(DEFAULT_FP_KEY, &raw)?;

        tracing::trace!(target: "context_kb::persistence", "snapshot written");
        Ok(())
    }

    /// Read the owner and default fragmentation back from the property store.
    ///
    /// An owner whose SIs are not in the peer set comes back detached.
    pub fn restore(&mut self) -> KbResult<()> {
        if let Some(raw) = self.store.get(DEFAULT_FP_KEY)? {
            self.config.fragmentation = serde_json::from_str(&raw)?;
        }

        if let Some(raw) = self.store.get(OWNER_KEY)? {
            let snapshot: OwnerSnapshot = serde_json::from_str(&raw)?;
            let binding = match self.peers.get(snapshot.sis.as_slice()) {
                Some(tag) => Owner::Resolved(tag.id),
                None => {
                    tracing::info!(
                        target: "context_kb::persistence",
                        owner = %snapshot.name,
                        "restored owner is not in the peer set"
                    );
                    Owner::Detached(SemanticTag::peer(
                        snapshot.name,
                        snapshot.sis,
                        std::iter::empty::<String>(),
                    ))
                }
            };
            self.owner = Some(binding);
        }
        Ok(())
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    /// Create a point at the coordinates, or return the one already there.
    ///
    /// Coordinate tags are merged into their dimensions first and replaced by
    /// the stored tags.
    pub fn create_context_point(&mut self, coordinates: ContextCoordinates) -> KbResult<ContextPointId> {
        let coordinates = self.absorb_coordinates(coordinates)?;
        if let Some(existing) = self.knowledge.find(&coordinates) {
            return Ok(existing.id());
        }
        let id = self.knowledge.add_context_point(ContextPoint::new(coordinates))?;
        self.knowledge_changed();
        Ok(id)
    }

    /// Store a point as it is. Fails on exactly matching coordinates.
    pub fn add_context_point(&mut self, cp: ContextPoint) -> KbResult<ContextPointId> {
        let id = self.knowledge.add_context_point(cp)?;
        self.knowledge_changed();
        Ok(id)
    }

    /// Remove the point stored at exactly these coordinates.
    pub fn remove_context_point(&mut self, coordinates: &ContextCoordinates) -> Option<ContextPoint> {
        let id = self.knowledge.find(coordinates)?.id();
        let removed = self.knowledge.remove_context_point(id);
        self.knowledge_changed();
        removed
    }

    pub fn context_point(&self, id: ContextPointId) -> Option<&ContextPoint> {
        self.knowledge.get(id)
    }

    /// Mutate a stored point. Coordinate changes that collide with another
    /// point are rolled back and reported.
    ///
    /// Tags of new coordinates are merged into their dimensions, as in
    /// [`create_context_point`](Self::create_context_point).
    pub fn update_context_point<F, R>(&mut self, id: ContextPointId, f: F) -> KbResult<R>
    where
        F: FnOnce(&mut ContextPoint) -> R,
    {
        let before = self.knowledge.get(id).map(|cp| cp.coordinates().clone());
        let result = self.knowledge.update(id, f);

        let moved = match (before, self.knowledge.get(id)) {
            (Some(before), Some(cp)) if result.is_ok() && cp.coordinates() != &before => {
                Some((before, cp.coordinates().clone()))
            }
            _ => None,
        };
        let result = match moved {
            Some((before, after)) => self.settle_coordinates(id, before, after).and(result),
            None => result,
        };

        self.knowledge_changed();
        result
    }

    pub fn add_information(&mut self, id: ContextPointId, info: Information) -> KbResult<InformationId> {
        self.update_context_point(id, |cp| cp.add_information(info))
    }

    fn absorb_coordinates(&mut self, mut coordinates: ContextCoordinates) -> KbResult<ContextCoordinates> {
        for dimension in Dimension::TAGGED {
            let Some(tag) = coordinates.tag(dimension).cloned() else {
                continue;
            };
            let Some(set) = tag_dimension(dimension) else {
                continue;
            };
            let stored = self.merge_tag(set, tag)?;
            coordinates.set_tag(dimension, Some(stored));
        }
        Ok(coordinates)
    }

    // Absorb the tags of a point's new coordinates. On failure the point goes
    // back to where it was.
    fn settle_coordinates(
        &mut self,
        id: ContextPointId,
        before: ContextCoordinates,
        after: ContextCoordinates,
    ) -> KbResult<()> {
        match self.absorb_coordinates(after.clone()) {
            Ok(absorbed) if absorbed == after => Ok(()),
            Ok(absorbed) => self
                .knowledge
                .update(id, |cp| cp.set_context_coordinates(absorbed)),
            Err(err) => {
                self.knowledge
                    .update(id, |cp| cp.set_context_coordinates(before))?;
                Err(err)
            }
        }
    }

    fn knowledge_changed(&mut self) {
        if self.knowledge.dispatch(&self.listeners) > 0 {
            self.persist();
        }
    }

    /// The point stored at exactly these coordinates.
    pub fn get_context_point(&self, coordinates: &ContextCoordinates) -> Option<&ContextPoint> {
        self.knowledge.find(coordinates)
    }

    /// Points matching a context space, in storage order.
    ///
    /// With `match_any` every stored point that algebra-matches one of the
    /// space's possible coordinates is returned; otherwise only points stored
    /// at exactly one of them. `None` for no space, and `None` rather than an
    /// empty list when nothing matches.
    pub fn get_context_points(
        &self,
        space: Option<&ContextSpace>,
        match_any: bool,
    ) -> Option<Vec<&ContextPoint>> {
        let space = space?;
        let candidates = self.possible_coordinates(space);

        let mut hits: HashSet<ContextPointId> = HashSet::new();
        for candidate in &candidates {
            if match_any {
                hits.extend(
                    self.knowledge
                        .context_points()
                        .iter()
                        .filter(|cp| algebra::identical_coordinates(cp.coordinates(), candidate))
                        .map(ContextPoint::id),
                );
            } else if let Some(cp) = self.knowledge.find(candidate) {
                hits.insert(cp.id());
            }
        }

        if hits.is_empty() {
            return None;
        }
        Some(
            self.knowledge
                .context_points()
                .iter()
                .filter(|cp| hits.contains(&cp.id()))
                .collect(),
        )
    }

    /// Every stored point, or `None` for an empty store.
    pub fn get_all_context_points(&self) -> Option<Vec<&ContextPoint>> {
        self.get_context_points(Some(&ContextSpace::any()), true)
    }

    /// Coordinates a point matching the space could occupy.
    pub fn possible_coordinates(&self, space: &ContextSpace) -> HashSet<ContextCoordinates> {
        algebra::possible_coordinates(space, self.config.empty_dimension_policy)
    }

    /// What this knowledge base exposes: every tag (hidden ones included), the
    /// owner as originator, the peer set in both peer roles, direction INOUT.
    pub fn as_context_space(&self) -> ContextSpace {
        let exposed = |set: &TagSet| {
            let mut set = set.clone();
            set.set_enumerate_hidden(true);
            Some(set)
        };
        ContextSpace {
            topics: exposed(&self.topics),
            originator: self.owner().cloned(),
            peers: exposed(&self.peers),
            remote_peers: exposed(&self.peers),
            times: exposed(&self.times),
            locations: exposed(&self.locations),
            direction: Direction::InOut,
        }
    }

    /// Project this knowledge base onto a context with the default fragmentation.
    pub fn contextualize(&self, context: &ContextSpace) -> Option<ContextSpace> {
        self.contextualize_with(context, &self.config.fragmentation)
    }

    pub fn contextualize_with(
        &self,
        context: &ContextSpace,
        fps: &FragmentationParameters,
    ) -> Option<ContextSpace> {
        let mut result = algebra::contextualize(
            &self.as_context_space(),
            context,
            fps,
            self.config.empty_dimension_policy,
        )?;
        // One peer set plays both peer roles here, so the generic step only
        // inverts the direction. Put the requested one back.
        result.direction = context.direction;
        Some(result)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn KnowledgeBaseListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("topics", &self.topics.len())
            .field("peers", &self.peers.len())
            .field("locations", &self.locations.len())
            .field("times", &self.times.len())
            .field("owner", &self.owner)
            .field("context_points", &self.knowledge.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn expect_dimension(set: &TagSet, expected: TagDimension) -> KbResult<()> {
    if set.dimension() == expected {
        Ok(())
    } else {
        Err(KbError::DimensionMismatch {
            expected,
            found: set.dimension(),
        })
    }
}

fn shape_mismatch(dimension: TagDimension, expected: SetShape) -> KbError {
    KbError::ShapeMismatch {
        dimension,
        expected,
    }
}

/// The tag set backing a coordinate dimension.
fn tag_dimension(dimension: Dimension) -> Option<TagDimension> {
    match dimension {
        Dimension::Topic => Some(TagDimension::Topic),
        Dimension::Originator | Dimension::Peer | Dimension::RemotePeer => Some(TagDimension::Peer),
        Dimension::Time => Some(TagDimension::Temporal),
        Dimension::Location => Some(TagDimension::Spatial),
        Dimension::Direction => None,
    }
}
