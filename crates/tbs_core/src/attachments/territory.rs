//! Territory properties: production, impassability and original ownership.

use crate::error::Result;
use crate::game::{GameData, PlayerId};

use super::property::{self, parse_bool, parse_int, PropertyDef};

/// Extra data about a territory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryAttachment {
    /// Income produced.
    pub production: i32,
    /// Land units can never enter.
    pub is_impassable: bool,
    /// Victory city weight (0 for none).
    pub victory_city: i32,
    /// Player whose capital this is.
    pub capital: Option<PlayerId>,
    /// Overrides the game-start owner for `original` territory groups.
    pub original_owner: Option<PlayerId>,
}

impl TerritoryAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("production", Self::set_production),
        PropertyDef::writable("isImpassable", Self::set_is_impassable),
        PropertyDef::writable("victoryCity", Self::set_victory_city),
        PropertyDef::writable("capital", Self::set_capital),
        PropertyDef::writable("originalOwner", Self::set_original_owner),
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

    fn set_production(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.production = parse_int("production", value)?;
        Ok(())
    }

    fn set_is_impassable(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.is_impassable = parse_bool("isImpassable", value)?;
        Ok(())
    }

    fn set_victory_city(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.victory_city = parse_int("victoryCity", value)?;
        Ok(())
    }

    fn set_capital(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.capital = Some(data.require_player(value)?);
        Ok(())
    }

    fn set_original_owner(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.original_owner = Some(data.require_player(value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;

    #[test]
    fn test_original_owner_resolves_player() {
        let mut data = GameData::new("test");
        let germans = data.add_player("Germans").unwrap();
        let mut attachment = TerritoryAttachment::default();
        attachment
            .set_property("originalOwner", "Germans", &data, "territoryAttachment")
            .unwrap();
        assert_eq!(attachment.original_owner, Some(germans));

        let err = attachment
            .set_property("capital", "Atlanteans", &data, "territoryAttachment")
            .unwrap_err();
        assert!(matches!(err, ScenarioError::MissingEntity { .. }));
    }
}
