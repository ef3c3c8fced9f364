//! Unit type statistics consulted by the enemy-surface exclusion leaf.
//!
//! # Example RON
//!
//! ```ron
//! (
//!     name: "unitAttachment",
//!     attach_to: "destroyer",
//!     class: "games.strategy.triplea.attachments.UnitAttachment",
//!     options: [
//!         (name: "isSea", value: "true"),
//!         (name: "attack", value: "2"),
//!     ],
//! )
//! ```

use crate::error::Result;
use crate::game::GameData;

use super::property::{self, parse_bool, parse_int, PropertyDef};

/// Unit type statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitAttachment {
    /// Movement points.
    pub movement: i32,
    /// Attack value.
    pub attack: i32,
    /// Defense value.
    pub defense: i32,
    /// Naval unit.
    pub is_sea: bool,
    /// Air unit.
    pub is_air: bool,
    /// Can submerge / evade (submarines).
    pub can_evade: bool,
    /// Cargo capacity; -1 if the unit is not a transport.
    pub transport_capacity: i32,
    /// Transport that also fights.
    pub is_combat_transport: bool,
    /// Can be carried by air transports.
    pub is_air_transportable: bool,
    /// Can be carried by land transports.
    pub is_land_transportable: bool,
}

impl Default for UnitAttachment {
    fn default() -> Self {
        Self {
            movement: 0,
            attack: 0,
            defense: 0,
            is_sea: false,
            is_air: false,
            can_evade: false,
            transport_capacity: -1,
            is_combat_transport: false,
            is_air_transportable: false,
            is_land_transportable: false,
        }
    }
}

macro_rules! int_setter {
    ($fn_name:ident, $field:ident, $property:literal) => {
        fn $fn_name(&mut self, value: &str, _data: &GameData) -> Result<()> {
            self.$field = parse_int($property, value)?;
            Ok(())
        }
    };
}

macro_rules! bool_setter {
    ($fn_name:ident, $field:ident, $property:literal) => {
        fn $fn_name(&mut self, value: &str, _data: &GameData) -> Result<()> {
            self.$field = parse_bool($property, value)?;
            Ok(())
        }
    };
}

impl UnitAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("movement", Self::set_movement),
        PropertyDef::writable("attack", Self::set_attack),
        PropertyDef::writable("defense", Self::set_defense),
        PropertyDef::writable("isSea", Self::set_is_sea),
        PropertyDef::writable("isAir", Self::set_is_air),
        PropertyDef::writable("canEvade", Self::set_can_evade),
        PropertyDef::writable("transportCapacity", Self::set_transport_capacity),
        PropertyDef::writable("isCombatTransport", Self::set_is_combat_transport),
        PropertyDef::writable("isAirTransportable", Self::set_is_air_transportable),
        PropertyDef::writable("isLandTransportable", Self::set_is_land_transportable),
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

    /// A sea unit that is neither a pure transport nor able to evade:
    /// what counts as a surface warship.
    #[must_use]
    pub fn is_surface_warship(&self) -> bool {
        self.is_sea && !self.can_evade && self.is_not_transport_but_could_be_combat_transport()
    }

    fn is_not_transport_but_could_be_combat_transport(&self) -> bool {
        self.transport_capacity == -1 || (self.is_combat_transport && self.is_sea)
    }

    int_setter!(set_movement, movement, "movement");
    int_setter!(set_attack, attack, "attack");
    int_setter!(set_defense, defense, "defense");
    int_setter!(set_transport_capacity, transport_capacity, "transportCapacity");
    bool_setter!(set_is_sea, is_sea, "isSea");
    bool_setter!(set_is_air, is_air, "isAir");
    bool_setter!(set_can_evade, can_evade, "canEvade");
    bool_setter!(set_is_combat_transport, is_combat_transport, "isCombatTransport");
    bool_setter!(set_is_air_transportable, is_air_transportable, "isAirTransportable");
    bool_setter!(set_is_land_transportable, is_land_transportable, "isLandTransportable");
}
