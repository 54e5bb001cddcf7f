//! Context spaces - compound descriptors covering many coordinates at once.

use semantic_tags::{SemanticTag, TagDimension, TagSet};
use serde::{Deserialize, Serialize};

use super::{ContextCoordinates, Dimension, Direction};

/// A context space (interest): every dimension is ANY (`None`) or a finite tag set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSpace {
    pub topics: Option<TagSet>,
    pub originator: Option<SemanticTag>,
    pub peers: Option<TagSet>,
    pub remote_peers: Option<TagSet>,
    pub times: Option<TagSet>,
    pub locations: Option<TagSet>,
    pub direction: Direction,
}

impl ContextSpace {
    /// The space covering everything: all ANY, direction INOUT.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_topics(mut self, topics: impl IntoIterator<Item = SemanticTag>) -> Self {
        self.topics = Some(TagSet::from_tags(TagDimension::Topic, topics));
        self
    }

    pub fn with_topic_set(mut self, topics: TagSet) -> Self {
        self.topics = Some(topics);
        self
    }

    pub fn with_originator(mut self, originator: SemanticTag) -> Self {
        self.originator = Some(originator);
        self
    }

    pub fn with_peers(mut self, peers: impl IntoIterator<Item = SemanticTag>) -> Self {
        self.peers = Some(TagSet::from_tags(TagDimension::Peer, peers));
        self
    }

    pub fn with_remote_peers(mut self, remote_peers: impl IntoIterator<Item = SemanticTag>) -> Self {
        self.remote_peers = Some(TagSet::from_tags(TagDimension::Peer, remote_peers));
        self
    }

    pub fn with_times(mut self, times: impl IntoIterator<Item = SemanticTag>) -> Self {
        self.times = Some(TagSet::from_tags(TagDimension::Temporal, times));
        self
    }

    pub fn with_locations(mut self, locations: impl IntoIterator<Item = SemanticTag>) -> Self {
        self.locations = Some(TagSet::from_tags(TagDimension::Spatial, locations));
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// The tag set of a set-valued dimension.
    ///
    /// Originator and direction are scalar and always yield `None` here.
    pub fn tag_set(&self, dimension: Dimension) -> Option<&TagSet> {
        match dimension {
            Dimension::Topic => self.topics.as_ref(),
            Dimension::Peer => self.peers.as_ref(),
            Dimension::RemotePeer => self.remote_peers.as_ref(),
            Dimension::Time => self.times.as_ref(),
            Dimension::Location => self.locations.as_ref(),
            Dimension::Originator | Dimension::Direction => None,
        }
    }

    /// Check whether the space places no constraint at all.
    pub fn is_any(&self) -> bool {
        self.direction == Direction::InOut
            && self.originator.is_none()
            && [
                &self.topics,
                &self.peers,
                &self.remote_peers,
                &self.times,
                &self.locations,
            ]
            .iter()
            .all(|set| set.is_none())
    }
}

impl From<&ContextCoordinates> for ContextSpace {
    fn from(cc: &ContextCoordinates) -> Self {
        let single = |dimension: TagDimension, tag: &Option<SemanticTag>| {
            tag.clone().map(|t| TagSet::from_tags(dimension, [t]))
        };
        Self {
            topics: single(TagDimension::Topic, &cc.topic),
            originator: cc.originator.clone(),
            peers: single(TagDimension::Peer, &cc.peer),
            remote_peers: single(TagDimension::Peer, &cc.remote_peer),
            times: single(TagDimension::Temporal, &cc.time),
            locations: single(TagDimension::Spatial, &cc.location),
            direction: cc.direction,
        }
    }
}
