//! Terrain effects on combat and movement.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::game::{GameData, UnitTypeId};

use super::property::{self, parse_unit_amount, parse_unit_list, PropertyDef};

/// Combat modifiers and movement restrictions of a territory effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryEffectAttachment {
    /// Attack modifier per unit type.
    pub combat_offense_effect: BTreeMap<UnitTypeId, i32>,
    /// Defense modifier per unit type.
    pub combat_defense_effect: BTreeMap<UnitTypeId, i32>,
    /// Unit types that cannot blitz through.
    pub no_blitz: Vec<UnitTypeId>,
    /// Unit types that cannot enter.
    pub units_not_allowed: Vec<UnitTypeId>,
}

impl TerritoryEffectAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("combatOffenseEffect", Self::set_combat_offense_effect),
        PropertyDef::writable("combatDefenseEffect", Self::set_combat_defense_effect),
        PropertyDef::writable("noBlitz", Self::set_no_blitz),
        PropertyDef::writable("unitsNotAllowed", Self::set_units_not_allowed),
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

    fn set_combat_offense_effect(&mut self, value: &str, data: &GameData) -> Result<()> {
        let (amount, units) = parse_unit_amount("combatOffenseEffect", value, data)?;
        self.combat_offense_effect
            .extend(units.into_iter().map(|unit| (unit, amount)));
        Ok(())
    }

    fn set_combat_defense_effect(&mut self, value: &str, data: &GameData) -> Result<()> {
        let (amount, units) = parse_unit_amount("combatDefenseEffect", value, data)?;
        self.combat_defense_effect
            .extend(units.into_iter().map(|unit| (unit, amount)));
        Ok(())
    }

    fn set_no_blitz(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.no_blitz.extend(parse_unit_list(value, data)?);
        Ok(())
    }

    fn set_units_not_allowed(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.units_not_allowed.extend(parse_unit_list(value, data)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_accumulate() {
        let mut data = GameData::new("test");
        let infantry = data.add_unit_type("infantry").unwrap();
        let armour = data.add_unit_type("armour").unwrap();
        let mut effect = TerritoryEffectAttachment::default();
        effect
            .set_property("combatDefenseEffect", "1:infantry", &data, "territoryEffectAttachment")
            .unwrap();
        effect
            .set_property("combatDefenseEffect", "-1:armour", &data, "territoryEffectAttachment")
            .unwrap();
        effect
            .set_property("noBlitz", "armour", &data, "territoryEffectAttachment")
            .unwrap();
        assert_eq!(effect.combat_defense_effect.get(&infantry), Some(&1));
        assert_eq!(effect.combat_defense_effect.get(&armour), Some(&-1));
        assert_eq!(effect.no_blitz, vec![armour]);
    }
}
