//! Knowledge - the store of context points.
//!
//! No two stored points have exactly matching coordinates. Every mutation is
//! recorded as a [`KnowledgeEvent`] and handed to a [`KnowledgeListener`] by
//! [`Knowledge::dispatch`].

use semantic_tags::SemanticTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ContextCoordinates, ContextPoint, ContextPointId, InformationId};
use crate::algebra::exact_match;
use crate::error::{KbError, KbResult};
use crate::events::{KnowledgeEvent, KnowledgeListener};

/// The set of context points of a knowledge base, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Knowledge {
    points: Vec<ContextPoint>,

    #[serde(skip)]
    events: Vec<KnowledgeEvent>,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a point. Fails if a stored point has exactly matching coordinates.
    pub fn add_context_point(&mut self, cp: ContextPoint) -> KbResult<ContextPointId> {
        if let Some(existing) = self.find(cp.coordinates()) {
            return Err(KbError::DuplicateCoordinates(existing.id()));
        }

        let id = cp.id();
        tracing::debug!(target: "context_kb::knowledge", point = %id, "context point added");
        self.points.push(cp);
        self.events.push(KnowledgeEvent::Added(id));
        Ok(id)
    }

    pub fn remove_context_point(&mut self, id: ContextPointId) -> Option<ContextPoint> {
        let index = self.points.iter().position(|cp| cp.id() == id)?;
        let cp = self.points.remove(index);
        tracing::debug!(target: "context_kb::knowledge", point = %id, "context point removed");
        self.events.push(KnowledgeEvent::Removed(cp.clone()));
        Some(cp)
    }

    /// The point stored at exactly these coordinates.
    pub fn find(&self, coordinates: &ContextCoordinates) -> Option<&ContextPoint> {
        self.points
            .iter()
            .find(|cp| exact_match(cp.coordinates(), coordinates))
    }

    pub fn get(&self, id: ContextPointId) -> Option<&ContextPoint> {
        self.points.iter().find(|cp| cp.id() == id)
    }

    /// Mutate a stored point in place.
    ///
    /// If the closure moves the point onto coordinates another point already
    /// occupies, the coordinates are put back and the call fails. Any other
    /// change made by the closure is kept. A `Changed` event is recorded only
    /// when the point ends up different.
    pub fn update<F, R>(&mut self, id: ContextPointId, f: F) -> KbResult<R>
    where
        F: FnOnce(&mut ContextPoint) -> R,
    {
        let index = self
            .points
            .iter()
            .position(|cp| cp.id() == id)
            .ok_or(KbError::UnknownContextPoint(id))?;

        let before = self.points[index].coordinates().clone();
        let content = content_of(&self.points[index]);
        let result = f(&mut self.points[index]);

        if self.points[index].coordinates() != &before {
            let collision = self
                .points
                .iter()
                .enumerate()
                .find(|(i, cp)| *i != index && exact_match(cp.coordinates(), self.points[index].coordinates()))
                .map(|(_, cp)| cp.id());
            if let Some(other) = collision {
                self.points[index].set_context_coordinates(before);
                tracing::debug!(
                    target: "context_kb::knowledge",
                    point = %id,
                    collides_with = %other,
                    "coordinate change rolled back"
                );
                if content_of(&self.points[index]) != content {
                    self.record_changed(id);
                }
                return Err(KbError::DuplicateCoordinates(other));
            }
            self.record_changed(id);
        } else if content_of(&self.points[index]) != content {
            self.record_changed(id);
        }

        Ok(result)
    }

    /// Replace every stored copy of a tag with this one, without events.
    ///
    /// Coordinates hold tag values, so SIs added to a stored tag reach the
    /// points only through this.
    pub(crate) fn refresh_tag(&mut self, tag: &SemanticTag) -> usize {
        let refreshed = self
            .points
            .iter_mut()
            .map(|cp| cp.refresh_tag(tag))
            .filter(|refreshed| *refreshed)
            .count();
        if refreshed > 0 {
            tracing::trace!(target: "context_kb::knowledge", tag = %tag, refreshed, "tag refreshed in coordinates");
        }
        refreshed
    }

    // Back-to-back changes of one point are reported once.
    fn record_changed(&mut self, id: ContextPointId) {
        if !matches!(self.events.last(), Some(KnowledgeEvent::Changed(last)) if *last == id) {
            self.events.push(KnowledgeEvent::Changed(id));
        }
    }

    /// All points in insertion order.
    pub fn context_points(&self) -> &[ContextPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Take the recorded events without delivering them.
    pub fn drain_events(&mut self) -> Vec<KnowledgeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Deliver recorded events in order. Events for points that are gone by now
    /// are dropped. Returns how many events were delivered.
    pub fn dispatch(&mut self, listener: &dyn KnowledgeListener) -> usize {
        let mut delivered = 0;
        for event in std::mem::take(&mut self.events) {
            match event {
                KnowledgeEvent::Added(id) => {
                    if let Some(cp) = self.get(id) {
                        listener.context_point_added(cp);
                        delivered += 1;
                    }
                }
                KnowledgeEvent::Changed(id) => {
                    if let Some(cp) = self.get(id) {
                        listener.cp_changed(cp);
                        delivered += 1;
                    }
                }
                KnowledgeEvent::Removed(cp) => {
                    listener.context_point_removed(&cp);
                    delivered += 1;
                }
            }
        }
        delivered
    }
}

fn content_of(cp: &ContextPoint) -> (Vec<InformationId>, BTreeMap<String, String>) {
    (
        cp.information().iter().map(|i| i.id).collect(),
        cp.properties.clone(),
    )
}
