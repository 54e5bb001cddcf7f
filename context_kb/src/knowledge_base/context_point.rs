//! Context points - coordinates plus the information stored there.

use semantic_tags::SemanticTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use uuid::Uuid;

use super::{ContextCoordinates, Dimension, Information, InformationId};
use crate::events::ContextPointListener;

/// Unique identifier for context points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextPointId(pub Uuid);

impl ContextPointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextPointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextPointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored unit of knowledge: a coordinate and an ordered list of information.
///
/// Information is deduplicated by content hash. The optional listener is held
/// weakly; a dropped listener silently stops receiving notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPoint {
    id: ContextPointId,

    coordinates: ContextCoordinates,

    information: Vec<Information>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    #[serde(skip)]
    listener: Option<Weak<dyn ContextPointListener>>,
}

impl ContextPoint {
    /// Create an empty point at the given coordinates.
    pub fn new(coordinates: ContextCoordinates) -> Self {
        Self {
            id: ContextPointId::new(),
            coordinates,
            information: Vec::new(),
            properties: BTreeMap::new(),
            listener: None,
        }
    }

    pub fn id(&self) -> ContextPointId {
        self.id
    }

    pub fn coordinates(&self) -> &ContextCoordinates {
        &self.coordinates
    }

    /// Replace the coordinates wholesale.
    ///
    /// Uniqueness against other points is checked by the owning store.
    pub fn set_context_coordinates(&mut self, coordinates: ContextCoordinates) {
        self.coordinates = coordinates;
        self.notify(|l| l.coordinates_changed(self));
    }

    /// Swap in a newer copy of a tag the coordinates already reference.
    ///
    /// The tag keeps its identity, so this is not a move and the listener is
    /// not told. Returns whether any dimension referenced the tag.
    pub(crate) fn refresh_tag(&mut self, tag: &SemanticTag) -> bool {
        let mut refreshed = false;
        for dimension in Dimension::TAGGED {
            if self.coordinates.tag(dimension).map(|t| t.id) == Some(tag.id) {
                self.coordinates.set_tag(dimension, Some(tag.clone()));
                refreshed = true;
            }
        }
        refreshed
    }

    /// Append an item unless one with the same content hash is already stored.
    ///
    /// Returns the id of the stored item, which is the existing one for a duplicate.
    pub fn add_information(&mut self, info: Information) -> InformationId {
        if let Some(existing) = self
            .information
            .iter()
            .find(|i| i.content_hash() == info.content_hash())
        {
            return existing.id;
        }

        let id = info.id;
        self.information.push(info);
        if let Some(added) = self.information.last() {
            self.notify(|l| l.information_added(added, self));
        }
        id
    }

    /// Add text content (`text/plain`).
    pub fn add_text(&mut self, content: impl Into<String>) -> InformationId {
        self.add_information(Information::text(content))
    }

    /// Add raw bytes.
    pub fn add_bytes(&mut self, content: impl Into<Vec<u8>>) -> InformationId {
        self.add_information(Information::new(content))
    }

    pub fn remove_information(&mut self, id: InformationId) -> Option<Information> {
        let index = self.information.iter().position(|i| i.id == id)?;
        let removed = self.information.remove(index);
        self.notify(|l| l.information_removed(&removed, self));
        Some(removed)
    }

    /// Items in insertion order.
    pub fn information(&self) -> &[Information] {
        &self.information
    }

    pub fn information_count(&self) -> usize {
        self.information.len()
    }

    pub fn information_by_id(&self, id: InformationId) -> Option<&Information> {
        self.information.iter().find(|i| i.id == id)
    }

    /// Items whose name matches case-insensitively; `None` matches unnamed items.
    ///
    /// The result is a copy: later changes to the point do not show up in it.
    pub fn get_information(&self, name: Option<&str>) -> Vec<Information> {
        self.information
            .iter()
            .filter(|i| i.has_name(name))
            .cloned()
            .collect()
    }

    /// Register the point's single listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: &Arc<dyn ContextPointListener>) {
        self.listener = Some(Arc::downgrade(listener));
    }

    pub fn remove_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener
            .as_ref()
            .map(|l| l.strong_count() > 0)
            .unwrap_or(false)
    }

    fn notify<F>(&self, f: F)
    where
        F: FnOnce(&dyn ContextPointListener),
    {
        if let Some(listener) = self.listener.as_ref().and_then(Weak::upgrade) {
            f(listener.as_ref());
        }
    }
}
