//! Typed indices into the game data tables.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an ID from a raw table index.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Index of a player.
    PlayerId
);
entity_id!(
    /// Index of a territory.
    TerritoryId
);
entity_id!(
    /// Index of a unit type.
    UnitTypeId
);
entity_id!(
    /// Index of a resource.
    ResourceId
);
entity_id!(
    /// Index of a technology.
    TechId
);
entity_id!(
    /// Index of a relationship type.
    RelationshipTypeId
);
entity_id!(
    /// Index of a territory effect.
    TerritoryEffectId
);
entity_id!(
    /// Index of an attachment in the attachment arena.
    AttachmentId
);
