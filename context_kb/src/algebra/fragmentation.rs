//! Fragmentation and projection of context spaces.

use semantic_tags::{identical, SemanticTag, TagId, TagSet};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use super::EmptyDimensionPolicy;
use crate::knowledge_base::{ContextSpace, Dimension, Direction};

/// How much of a dimension's structure goes into a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentationParameter {
    /// Keep properties and peer addresses; otherwise tags are reduced to identity.
    pub include_full_knowledge: bool,

    /// Follow relations from the matched tags.
    pub hierarchical: bool,

    /// How many relation steps to follow.
    pub max_depth: u32,
}

impl FragmentationParameter {
    pub const fn new(include_full_knowledge: bool, hierarchical: bool, max_depth: u32) -> Self {
        Self {
            include_full_knowledge,
            hierarchical,
            max_depth,
        }
    }
}

const TOPIC_FP: FragmentationParameter = FragmentationParameter::new(false, true, 2);
const PEER_FP: FragmentationParameter = FragmentationParameter::new(true, false, 2);
const REST_FP: FragmentationParameter = FragmentationParameter::new(false, false, 0);

/// One fragmentation parameter per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentationParameters {
    pub topic: FragmentationParameter,
    pub originator: FragmentationParameter,
    pub peer: FragmentationParameter,
    pub remote_peer: FragmentationParameter,
    pub time: FragmentationParameter,
    pub location: FragmentationParameter,
    pub direction: FragmentationParameter,
}

impl Default for FragmentationParameters {
    fn default() -> Self {
        Self {
            topic: TOPIC_FP,
            originator: PEER_FP,
            peer: PEER_FP,
            remote_peer: PEER_FP,
            time: REST_FP,
            location: REST_FP,
            direction: REST_FP,
        }
    }
}

impl FragmentationParameters {
    pub fn get(&self, dimension: Dimension) -> FragmentationParameter {
        match dimension {
            Dimension::Topic => self.topic,
            Dimension::Originator => self.originator,
            Dimension::Peer => self.peer,
            Dimension::RemotePeer => self.remote_peer,
            Dimension::Time => self.time,
            Dimension::Location => self.location,
            Dimension::Direction => self.direction,
        }
    }

    pub fn set(&mut self, dimension: Dimension, fp: FragmentationParameter) {
        match dimension {
            Dimension::Topic => self.topic = fp,
            Dimension::Originator => self.originator = fp,
            Dimension::Peer => self.peer = fp,
            Dimension::RemotePeer => self.remote_peer = fp,
            Dimension::Time => self.time = fp,
            Dimension::Location => self.location = fp,
            Dimension::Direction => self.direction = fp,
        }
    }

    pub fn with(mut self, dimension: Dimension, fp: FragmentationParameter) -> Self {
        self.set(dimension, fp);
        self
    }
}

/// Copy the anchors out of a set, and with `hierarchical` everything within
/// `max_depth` relation steps of them.
pub fn fragment(set: &TagSet, anchors: &[TagId], fp: FragmentationParameter) -> TagSet {
    let ids = if fp.hierarchical {
        reachable(set, anchors, fp.max_depth)
    } else {
        anchors.to_vec()
    };

    if fp.include_full_knowledge {
        set.subset(&ids, SemanticTag::clone, fp.hierarchical)
    } else {
        set.subset(&ids, SemanticTag::identity, fp.hierarchical)
    }
}

/// Breadth-first walk over relations, both directions.
fn reachable(set: &TagSet, anchors: &[TagId], max_depth: u32) -> Vec<TagId> {
    let mut seen: HashSet<TagId> = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();

    for id in anchors {
        if seen.insert(*id) {
            order.push(*id);
            queue.push_back((*id, 0));
        }
    }

    while let Some((id, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for next in set.neighbours(id) {
            if seen.insert(next) {
                order.push(next);
                queue.push_back((next, depth + 1));
            }
        }
    }
    order
}

/// Project `source` onto `context`.
///
/// Returns `None` when the two spaces do not intersect. Peer and remote peer
/// swap roles: what the context calls its remote peer is our peer. The
/// direction is intersected with the inverted context direction.
pub fn contextualize(
    source: &ContextSpace,
    context: &ContextSpace,
    fps: &FragmentationParameters,
    policy: EmptyDimensionPolicy,
) -> Option<ContextSpace> {
    let originator = match (&source.originator, &context.originator) {
        (None, wanted) => wanted.clone(),
        (Some(own), None) => Some(strip(own, fps.originator)),
        (Some(own), Some(wanted)) if identical(own, wanted) => Some(strip(own, fps.originator)),
        (Some(_), Some(_)) => return None,
    };

    Some(ContextSpace {
        topics: project(&source.topics, &context.topics, fps.topic, policy)?,
        originator,
        peers: project(&source.peers, &context.remote_peers, fps.peer, policy)?,
        remote_peers: project(&source.remote_peers, &context.peers, fps.remote_peer, policy)?,
        times: project(&source.times, &context.times, fps.time, policy)?,
        locations: project(&source.locations, &context.locations, fps.location, policy)?,
        direction: contextualize_direction(source.direction, context.direction)?,
    })
}

/// Intersect a source direction with what the context asks for.
///
/// The context speaks from the remote side, so its direction is inverted first.
pub fn contextualize_direction(source: Direction, context: Direction) -> Option<Direction> {
    let wanted = context.inverted();
    if source == Direction::InOut {
        Some(wanted)
    } else if wanted == Direction::InOut || wanted == source {
        Some(source)
    } else {
        None
    }
}

fn strip(tag: &SemanticTag, fp: FragmentationParameter) -> SemanticTag {
    if fp.include_full_knowledge {
        tag.clone()
    } else {
        tag.identity()
    }
}

/// Resolve an empty set to ANY or to "nothing", per policy.
///
/// Outer `None`: nothing can match. Inner `None`: ANY.
fn normalize(set: &Option<TagSet>, policy: EmptyDimensionPolicy) -> Option<Option<&TagSet>> {
    match set {
        Some(set) if set.is_empty() => match policy {
            EmptyDimensionPolicy::Unconstrained => Some(None),
            EmptyDimensionPolicy::MatchNothing => None,
        },
        Some(set) => Some(Some(set)),
        None => Some(None),
    }
}

/// Project one set-valued dimension. Outer `None`: no intersection.
fn project(
    source: &Option<TagSet>,
    context: &Option<TagSet>,
    fp: FragmentationParameter,
    policy: EmptyDimensionPolicy,
) -> Option<Option<TagSet>> {
    match (normalize(source, policy)?, normalize(context, policy)?) {
        (None, None) => Some(None),
        (None, Some(wanted)) => Some(Some(wanted.clone())),
        (Some(own), None) => {
            let all: Vec<TagId> = own.all_tags().map(|t| t.id).collect();
            Some(Some(fragment(own, &all, fp)))
        }
        (Some(own), Some(wanted)) => {
            let anchors: Vec<TagId> = own
                .all_tags()
                .filter(|t| wanted.all_tags().any(|w| identical(t, w)))
                .map(|t| t.id)
                .collect();
            if anchors.is_empty() {
                None
            } else {
                Some(Some(fragment(own, &anchors, fp)))
            }
        }
    }
}
