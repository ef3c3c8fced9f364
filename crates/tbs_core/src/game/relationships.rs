//! Diplomatic relationships between players.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{PlayerId, RelationshipTypeId};

/// The relationship a player always has with itself.
pub const SELF_RELATION: RelationshipTypeId = RelationshipTypeId(0);
/// Relationship with the null (unowned) side.
pub const NULL_RELATION: RelationshipTypeId = RelationshipTypeId(1);
/// Relationship of a pair that was never initialised.
pub const DEFAULT_WAR_RELATION: RelationshipTypeId = RelationshipTypeId(2);
/// Generic alliance available to every scenario.
pub const DEFAULT_ALLIED_RELATION: RelationshipTypeId = RelationshipTypeId(3);

/// Built-in relationship types, in the order they are registered.
pub const BUILT_IN_RELATIONSHIP_TYPES: [(&str, Archetype); 4] = [
    ("self_relation", Archetype::Allied),
    ("null_relation", Archetype::Neutral),
    ("default_war_relation", Archetype::War),
    ("default_allied_relation", Archetype::Allied),
];

/// What a relationship type means for allied/enemy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Players share control and fight together.
    Allied,
    /// Players ignore each other.
    Neutral,
    /// Players are enemies.
    War,
}

impl Archetype {
    /// Scenario spelling of this archetype.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allied => "allied",
            Self::Neutral => "neutral",
            Self::War => "war",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allied" => Ok(Self::Allied),
            "neutral" => Ok(Self::Neutral),
            "war" => Ok(Self::War),
            other => Err(format!("unknown archetype '{other}'")),
        }
    }
}

/// The current relationship of one player pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relationship type in force.
    pub relationship_type: RelationshipTypeId,
    /// Round in which it was established.
    pub round_created: u32,
}

impl Relationship {
    /// Create a relationship record.
    #[must_use]
    pub const fn new(relationship_type: RelationshipTypeId, round_created: u32) -> Self {
        Self {
            relationship_type,
            round_created,
        }
    }
}

/// Symmetric store of player-pair relationships.
#[derive(Debug, Clone, Default)]
pub struct RelationshipTracker {
    relations: BTreeMap<(PlayerId, PlayerId), Relationship>,
}

impl RelationshipTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(p1: PlayerId, p2: PlayerId) -> (PlayerId, PlayerId) {
        if p1 <= p2 {
            (p1, p2)
        } else {
            (p2, p1)
        }
    }

    /// Set the relationship of a pair, in both directions.
    pub fn set(&mut self, p1: PlayerId, p2: PlayerId, relationship: Relationship) {
        self.relations.insert(Self::key(p1, p2), relationship);
    }

    /// Stored relationship of a pair, if one was ever set.
    #[must_use]
    pub fn get(&self, p1: PlayerId, p2: PlayerId) -> Option<Relationship> {
        self.relations.get(&Self::key(p1, p2)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationships_are_symmetric() {
        let mut tracker = RelationshipTracker::new();
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        tracker.set(b, a, Relationship::new(DEFAULT_ALLIED_RELATION, 2));
        assert_eq!(
            tracker.get(a, b),
            Some(Relationship::new(DEFAULT_ALLIED_RELATION, 2))
        );
        assert_eq!(tracker.get(a, PlayerId::new(2)), None);
    }

    #[test]
    fn test_archetype_parse_is_case_insensitive() {
        assert_eq!("War".parse::<Archetype>(), Ok(Archetype::War));
        assert_eq!("allied".parse::<Archetype>(), Ok(Archetype::Allied));
        assert!("friendly".parse::<Archetype>().is_err());
    }
}
