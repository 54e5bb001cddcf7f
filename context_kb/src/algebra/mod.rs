//! Context space algebra - matching, expansion and projection.
//!
//! Two matching predicates exist and they are not interchangeable:
//! 1. **Exact match**: ANY only matches ANY; concrete tags must be identical and
//!    directions equal. Used for uniqueness checks and exact queries.
//! 2. **Algebra match**: ANY is absorbing and INOUT matches every direction.
//!    Used for wildcard queries.
//!
//! Expansion turns a context space into the set of concrete coordinates a
//! matching point could occupy. Its cost is the product of the dimension set
//! sizes; callers bound it by bounding query breadth.

mod fragmentation;

pub use fragmentation::*;

use semantic_tags::{identical, SemanticTag, TagSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::knowledge_base::{ContextCoordinates, ContextSpace, Dimension, Direction};

/// What an empty, non-ANY tag set means in a query dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDimensionPolicy {
    /// The dimension is ignored, as if it were ANY.
    #[default]
    Unconstrained,
    /// Nothing can match the dimension.
    MatchNothing,
}

/// Exact tag match: both ANY, or both concrete and identical.
pub fn exact_match_tags(a: Option<&SemanticTag>, b: Option<&SemanticTag>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => identical(a, b),
        _ => false,
    }
}

/// Exact coordinate match.
pub fn exact_match(a: &ContextCoordinates, b: &ContextCoordinates) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }
    a.direction == b.direction
        && Dimension::TAGGED
            .iter()
            .all(|d| exact_match_tags(a.tag(*d), b.tag(*d)))
}

/// Wildcard-tolerant tag match: ANY on either side matches.
pub fn identical_tags(a: Option<&SemanticTag>, b: Option<&SemanticTag>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => identical(a, b),
        _ => true,
    }
}

/// Directions match when equal or when either is INOUT.
pub fn identical_direction(a: Direction, b: Direction) -> bool {
    a == b || a == Direction::InOut || b == Direction::InOut
}

/// Wildcard-tolerant coordinate match. Symmetric.
pub fn identical_coordinates(a: &ContextCoordinates, b: &ContextCoordinates) -> bool {
    identical_direction(a.direction, b.direction)
        && Dimension::TAGGED
            .iter()
            .all(|d| identical_tags(a.tag(*d), b.tag(*d)))
}

/// Expand a context space into every coordinate a matching point could occupy.
///
/// An INOUT space seeds three prototypes (IN, OUT and INOUT). The set-valued
/// dimensions are then multiplied in in the order topic, peer, remote peer,
/// time, location. Hidden tags take part.
pub fn possible_coordinates(
    space: &ContextSpace,
    policy: EmptyDimensionPolicy,
) -> HashSet<ContextCoordinates> {
    let mut candidates: Vec<ContextCoordinates> = match space.direction {
        Direction::InOut => [Direction::In, Direction::Out, Direction::InOut]
            .into_iter()
            .map(|d| ContextCoordinates::prototype(space.originator.clone(), d))
            .collect(),
        d => vec![ContextCoordinates::prototype(space.originator.clone(), d)],
    };

    for dimension in [
        Dimension::Topic,
        Dimension::Peer,
        Dimension::RemotePeer,
        Dimension::Time,
        Dimension::Location,
    ] {
        let Some(set) = space.tag_set(dimension) else {
            continue;
        };
        if set.is_empty() {
            match policy {
                EmptyDimensionPolicy::Unconstrained => continue,
                EmptyDimensionPolicy::MatchNothing => return HashSet::new(),
            }
        }
        candidates = expand(candidates, dimension, set);
    }

    candidates.into_iter().collect()
}

fn expand(
    candidates: Vec<ContextCoordinates>,
    dimension: Dimension,
    set: &TagSet,
) -> Vec<ContextCoordinates> {
    let mut out = Vec::with_capacity(candidates.len() * set.len());
    for candidate in &candidates {
        for tag in set.all_tags() {
            let mut next = candidate.clone();
            next.set_tag(dimension, Some(tag.clone()));
            out.push(next);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str) -> SemanticTag {
        SemanticTag::new(name, [format!("si:{}", name.to_lowercase())])
    }

    fn peer(name: &str) -> SemanticTag {
        SemanticTag::peer(
            name,
            [format!("si:{}", name.to_lowercase())],
            std::iter::empty::<String>(),
        )
    }

    #[test]
    fn test_any_only_matches_any() {
        let t = topic("News");
        assert!(exact_match_tags(None, None));
        assert!(!exact_match_tags(None, Some(&t)));
        assert!(!exact_match_tags(Some(&t), None));
        assert!(exact_match_tags(Some(&t), Some(&t)));
    }

    #[test]
    fn test_exact_match_reflexive() {
        let cc = ContextCoordinates::any()
            .with_topic(topic("News"))
            .with_peer(peer("Alice"))
            .with_direction(Direction::Out);

        assert!(exact_match(&cc, &cc));
        assert!(exact_match(&cc, &cc.clone()));
        assert!(exact_match(&ContextCoordinates::any(), &ContextCoordinates::any()));
    }

    #[test]
    fn test_exact_match_uses_si_overlap() {
        let a = SemanticTag::new("News", ["si:news", "si:headlines"]);
        let b = SemanticTag::new("Headlines", ["si:headlines"]);
        let c = SemanticTag::new("news", ["SI:NEWS"]);

        let ca = ContextCoordinates::any().with_topic(a);
        assert!(exact_match(&ca, &ContextCoordinates::any().with_topic(b)));
        assert!(!exact_match(&ca, &ContextCoordinates::any().with_topic(c)));
    }

    #[test]
    fn test_exact_match_requires_same_direction() {
        let cc = ContextCoordinates::any().with_topic(topic("News"));
        let out = cc.clone().with_direction(Direction::Out);
        assert!(!exact_match(&cc, &out));
        assert!(identical_coordinates(&cc, &out));
    }

    #[test]
    fn test_identical_coordinates_any_absorbs() {
        let news = topic("News");
        let stored = ContextCoordinates::any()
            .with_topic(news.clone())
            .with_peer(peer("Alice"))
            .with_direction(Direction::Out);
        let query = ContextCoordinates::any().with_topic(news);

        assert!(identical_coordinates(&stored, &query));
        assert!(identical_coordinates(&query, &stored));

        let other = ContextCoordinates::any().with_peer(peer("Bob"));
        assert!(!identical_coordinates(&stored, &other));

        let inbound = ContextCoordinates::any().with_direction(Direction::In);
        assert!(!identical_coordinates(&stored, &inbound));
    }

    #[test]
    fn test_expansion_is_cartesian() {
        let space = ContextSpace::any()
            .with_topics([topic("A"), topic("B"), topic("C")])
            .with_peers([peer("P"), peer("Q")])
            .with_direction(Direction::Out);

        let coords = possible_coordinates(&space, EmptyDimensionPolicy::default());
        assert_eq!(coords.len(), 6);
        assert!(coords.iter().all(|c| c.direction == Direction::Out));
        assert!(coords.iter().all(|c| c.remote_peer.is_none() && c.time.is_none()));
    }

    #[test]
    fn test_inout_seeds_three_prototypes() {
        let coords = possible_coordinates(&ContextSpace::any(), EmptyDimensionPolicy::default());

        assert_eq!(coords.len(), 3);
        for direction in [Direction::In, Direction::Out, Direction::InOut] {
            assert!(coords.contains(&ContextCoordinates::any().with_direction(direction)));
        }
    }

    #[test]
    fn test_inout_multiplies_with_dimensions() {
        let space = ContextSpace::any().with_topics([topic("A"), topic("B")]);
        let coords = possible_coordinates(&space, EmptyDimensionPolicy::default());
        assert_eq!(coords.len(), 6);
    }

    #[test]
    fn test_originator_kept_on_every_candidate() {
        let me = peer("Me");
        let space = ContextSpace::any()
            .with_originator(me.clone())
            .with_topics([topic("A")])
            .with_direction(Direction::In);

        let coords = possible_coordinates(&space, EmptyDimensionPolicy::default());
        assert_eq!(coords.len(), 1);
        assert!(coords.iter().all(|c| c.originator.as_ref() == Some(&me)));
    }

    #[test]
    fn test_empty_dimension_unconstrained() {
        let space = ContextSpace::any()
            .with_topics([topic("A"), topic("B")])
            .with_peers(std::iter::empty())
            .with_direction(Direction::Out);

        let coords = possible_coordinates(&space, EmptyDimensionPolicy::Unconstrained);
        assert_eq!(coords.len(), 2);
        assert!(coords.iter().all(|c| c.peer.is_none()));
    }

    #[test]
    fn test_empty_dimension_match_nothing() {
        let space = ContextSpace::any()
            .with_topics([topic("A"), topic("B")])
            .with_peers(std::iter::empty())
            .with_direction(Direction::Out);

        let coords = possible_coordinates(&space, EmptyDimensionPolicy::MatchNothing);
        assert!(coords.is_empty());
    }

    #[test]
    fn test_expansion_includes_hidden_tags() {
        let mut topics = TagSet::from_tags(semantic_tags::TagDimension::Topic, [topic("A")]);
        topics.merge(topic("Secret").hidden()).unwrap();
        let space = ContextSpace::any()
            .with_topic_set(topics)
            .with_direction(Direction::In);

        assert_eq!(possible_coordinates(&space, EmptyDimensionPolicy::default()).len(), 2);
    }
}
