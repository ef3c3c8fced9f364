//! Relationship type behaviour: the archetype and a few movement rules.

use crate::error::{Result, ScenarioError};
use crate::game::{Archetype, GameData};

use super::property::{self, parse_bool, PropertyDef};

/// Behaviour of a relationship type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTypeAttachment {
    /// War, allied or neutral.
    pub archetype: Archetype,
    /// Land units may move through the other player's territory.
    pub can_move_land_units_over_owned_land: bool,
    /// Air units may fly over the other player's territory.
    pub can_move_air_units_over_owned_land: bool,
    /// Alliance is transitive through third players.
    pub alliances_can_chain_together: bool,
    /// Liberated territories go back to their original owner.
    pub gives_back_original_territories: bool,
}

impl Default for RelationshipTypeAttachment {
    fn default() -> Self {
        Self {
            archetype: Archetype::War,
            can_move_land_units_over_owned_land: true,
            can_move_air_units_over_owned_land: true,
            alliances_can_chain_together: false,
            gives_back_original_territories: false,
        }
    }
}

impl RelationshipTypeAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("archeType", Self::set_archetype),
        PropertyDef::writable(
            "canMoveLandUnitsOverOwnedLand",
            Self::set_can_move_land_units_over_owned_land,
        ),
        PropertyDef::writable(
            "canMoveAirUnitsOverOwnedLand",
            Self::set_can_move_air_units_over_owned_land,
        ),
        PropertyDef::writable(
            "alliancesCanChainTogether",
            Self::set_alliances_can_chain_together,
        ),
        PropertyDef::writable(
            "givesBackOriginalTerritories",
            Self::set_gives_back_original_territories,
        ),
    ];

    /// Set a property by scenario option name.
    pub fn set_property(
        &mut self,
        name: &str,
        value: &str,
        data: &GameData,
        attachment: &str,
    ) -> Result<()> {
        property::apply(Self::PROPERTIES, self, name, value, data, attachment)
    }

    /// Every option name this variant accepts.
    pub fn property_names() -> impl Iterator<Item = &'static str> {
        property::names(Self::PROPERTIES)
    }

    fn set_archetype(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.archetype = value
            .parse()
            .map_err(|reason: String| ScenarioError::invalid("archeType", value, reason))?;
        Ok(())
    }

    fn set_can_move_land_units_over_owned_land(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.can_move_land_units_over_owned_land =
            flag_or_default("canMoveLandUnitsOverOwnedLand", value, true)?;
        Ok(())
    }

    fn set_can_move_air_units_over_owned_land(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.can_move_air_units_over_owned_land =
            flag_or_default("canMoveAirUnitsOverOwnedLand", value, true)?;
        Ok(())
    }

    fn set_alliances_can_chain_together(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.alliances_can_chain_together =
            flag_or_default("alliancesCanChainTogether", value, false)?;
        Ok(())
    }

    fn set_gives_back_original_territories(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.gives_back_original_territories =
            flag_or_default("givesBackOriginalTerritories", value, false)?;
        Ok(())
    }
}

/// `true`, `false` or `default`.
fn flag_or_default(property: &str, value: &str, default: bool) -> Result<bool> {
    if value.eq_ignore_ascii_case("default") {
        Ok(default)
    } else {
        parse_bool(property, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_and_flags() {
        let data = GameData::new("test");
        let mut attachment = RelationshipTypeAttachment::default();
        attachment
            .set_property("archeType", "allied", &data, "relationshipTypeAttachment")
            .unwrap();
        attachment
            .set_property(
                "canMoveLandUnitsOverOwnedLand",
                "default",
                &data,
                "relationshipTypeAttachment",
            )
            .unwrap();
        assert_eq!(attachment.archetype, Archetype::Allied);
        assert!(attachment.can_move_land_units_over_owned_land);
        assert!(attachment
            .set_property("archeType", "friendly", &data, "relationshipTypeAttachment")
            .is_err());
    }
}
