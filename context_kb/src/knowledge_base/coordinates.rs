//! Context coordinates - the address of a point in context space.

use semantic_tags::SemanticTag;
use serde::{Deserialize, Serialize};

/// Direction of a knowledge flow, seen from the local peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    /// Knowledge flowing in.
    In,
    /// Knowledge flowing out.
    Out,
    /// Both ways; the direction wildcard.
    #[default]
    InOut,
}

impl Direction {
    /// The same flow seen from the other side.
    pub fn inverted(self) -> Self {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
            Direction::InOut => Direction::InOut,
        }
    }
}

/// The seven dimensions of context space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Topic,
    Originator,
    Peer,
    RemotePeer,
    Time,
    Location,
    Direction,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Topic,
        Dimension::Originator,
        Dimension::Peer,
        Dimension::RemotePeer,
        Dimension::Time,
        Dimension::Location,
        Dimension::Direction,
    ];

    /// The six dimensions holding a tag.
    pub const TAGGED: [Dimension; 6] = [
        Dimension::Topic,
        Dimension::Originator,
        Dimension::Peer,
        Dimension::RemotePeer,
        Dimension::Time,
        Dimension::Location,
    ];
}

/// A point in context space. `None` in any tag dimension means ANY.
///
/// Coordinates are replaced as a whole, never edited inside a stored point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ContextCoordinates {
    pub topic: Option<SemanticTag>,
    pub originator: Option<SemanticTag>,
    pub peer: Option<SemanticTag>,
    pub remote_peer: Option<SemanticTag>,
    pub time: Option<SemanticTag>,
    pub location: Option<SemanticTag>,
    pub direction: Direction,
}

impl ContextCoordinates {
    /// All dimensions ANY, direction INOUT.
    pub fn any() -> Self {
        Self::default()
    }

    /// All dimensions ANY except originator and direction.
    pub fn prototype(originator: Option<SemanticTag>, direction: Direction) -> Self {
        Self {
            originator,
            direction,
            ..Self::default()
        }
    }

    pub fn with_topic(mut self, topic: SemanticTag) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn with_originator(mut self, originator: SemanticTag) -> Self {
        self.originator = Some(originator);
        self
    }

    pub fn with_peer(mut self, peer: SemanticTag) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn with_remote_peer(mut self, remote_peer: SemanticTag) -> Self {
        self.remote_peer = Some(remote_peer);
        self
    }

    pub fn with_time(mut self, time: SemanticTag) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_location(mut self, location: SemanticTag) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// The tag held in a dimension. Always `None` for [`Dimension::Direction`].
    pub fn tag(&self, dimension: Dimension) -> Option<&SemanticTag> {
        match dimension {
            Dimension::Topic => self.topic.as_ref(),
            Dimension::Originator => self.originator.as_ref(),
            Dimension::Peer => self.peer.as_ref(),
            Dimension::RemotePeer => self.remote_peer.as_ref(),
            Dimension::Time => self.time.as_ref(),
            Dimension::Location => self.location.as_ref(),
            Dimension::Direction => None,
        }
    }

    /// Replace the tag of a dimension. Ignored for [`Dimension::Direction`].
    pub fn set_tag(&mut self, dimension: Dimension, tag: Option<SemanticTag>) {
        match dimension {
            Dimension::Topic => self.topic = tag,
            Dimension::Originator => self.originator = tag,
            Dimension::Peer => self.peer = tag,
            Dimension::RemotePeer => self.remote_peer = tag,
            Dimension::Time => self.time = tag,
            Dimension::Location => self.location = tag,
            Dimension::Direction => {}
        }
    }

    /// Check whether every tag dimension is ANY and the direction is INOUT.
    pub fn is_any(&self) -> bool {
        self.direction == Direction::InOut
            && Dimension::TAGGED.iter().all(|d| self.tag(*d).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_coordinates() {
        let any = ContextCoordinates::any();
        assert!(any.is_any());
        assert_eq!(any.direction, Direction::InOut);

        let topic = SemanticTag::new("News", ["si:news"]);
        assert!(!any.clone().with_topic(topic).is_any());
        assert!(!any.with_direction(Direction::In).is_any());
    }

    #[test]
    fn test_set_and_get_tag() {
        let mut cc = ContextCoordinates::any();
        let peer = SemanticTag::peer("Alice", ["si:alice"], std::iter::empty::<String>());

        cc.set_tag(Dimension::RemotePeer, Some(peer.clone()));
        assert_eq!(cc.tag(Dimension::RemotePeer), Some(&peer));
        assert!(cc.tag(Dimension::Peer).is_none());
        assert!(cc.tag(Dimension::Direction).is_none());
    }

    #[test]
    fn test_direction_inverted() {
        assert_eq!(Direction::In.inverted(), Direction::Out);
        assert_eq!(Direction::Out.inverted(), Direction::In);
        assert_eq!(Direction::InOut.inverted(), Direction::InOut);
    }

    #[test]
    fn test_structural_hash() {
        use std::collections::HashSet;

        let topic = SemanticTag::new("News", ["si:news"]);
        let mut set = HashSet::new();
        set.insert(ContextCoordinates::any().with_topic(topic.clone()));
        set.insert(ContextCoordinates::any().with_topic(topic));

        assert_eq!(set.len(), 1);
    }
}
