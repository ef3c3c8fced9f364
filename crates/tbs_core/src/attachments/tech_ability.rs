//! Unit bonuses granted by a technology.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::game::{GameData, UnitTypeId};

use super::property::{self, parse_unit_amount, PropertyDef};

/// Per-unit-type bonuses of a technology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechAbilityAttachment {
    /// Attack bonus.
    pub attack_bonus: BTreeMap<UnitTypeId, i32>,
    /// Defense bonus.
    pub defense_bonus: BTreeMap<UnitTypeId, i32>,
    /// Movement bonus.
    pub movement_bonus: BTreeMap<UnitTypeId, i32>,
    /// Radar (anti-air) bonus.
    pub radar_bonus: BTreeMap<UnitTypeId, i32>,
}

impl TechAbilityAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("attackBonus", Self::set_attack_bonus),
        PropertyDef::writable("defenseBonus", Self::set_defense_bonus),
        PropertyDef::writable("movementBonus", Self::set_movement_bonus),
        PropertyDef::writable("radarBonus", Self::set_radar_bonus),
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

    fn set_attack_bonus(&mut self, value: &str, data: &GameData) -> Result<()> {
        add_bonus(&mut self.attack_bonus, "attackBonus", value, data)
    }

    fn set_defense_bonus(&mut self, value: &str, data: &GameData) -> Result<()> {
        add_bonus(&mut self.defense_bonus, "defenseBonus", value, data)
    }

    fn set_movement_bonus(&mut self, value: &str, data: &GameData) -> Result<()> {
        add_bonus(&mut self.movement_bonus, "movementBonus", value, data)
    }

    fn set_radar_bonus(&mut self, value: &str, data: &GameData) -> Result<()> {
        add_bonus(&mut self.radar_bonus, "radarBonus", value, data)
    }
}

fn add_bonus(
    bonus: &mut BTreeMap<UnitTypeId, i32>,
    property: &str,
    value: &str,
    data: &GameData,
) -> Result<()> {
    let (amount, units) = parse_unit_amount(property, value, data)?;
    bonus.extend(units.into_iter().map(|unit| (unit, amount)));
    Ok(())
}
