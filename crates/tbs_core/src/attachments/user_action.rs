//! Player actions gated by conditions.

use crate::error::{Result, ScenarioError};
use crate::game::GameData;

use super::conditions::ConditionCore;
use super::property::{self, parse_bool, parse_int, split_on_colon, PropertyDef};

/// `triggerName:numberOfTimes:useUses:testUses:testConditions:testChance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerActivation {
    /// Trigger to fire.
    pub trigger: String,
    /// How many times to fire it.
    pub times: u32,
    /// Consume the trigger's uses.
    pub use_uses: bool,
    /// Skip the trigger if it has no uses left.
    pub test_uses: bool,
    /// Test the trigger's own conditions first.
    pub test_conditions: bool,
    /// Roll the trigger's own chance.
    pub test_chance: bool,
}

/// An action a player may attempt when its conditions hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActionAttachment {
    /// Conditions gating the action.
    pub core: ConditionCore,
    /// Key of the text shown to the player.
    pub text: String,
    /// Cost in PUs of an attempt.
    pub cost_pus: i32,
    /// Attempts allowed per turn.
    pub attempts_per_turn: i32,
    /// Triggers fired on success.
    pub activate_triggers: Vec<TriggerActivation>,
}

impl Default for UserActionAttachment {
    fn default() -> Self {
        Self {
            core: ConditionCore::default(),
            text: String::new(),
            cost_pus: 0,
            attempts_per_turn: 1,
            activate_triggers: Vec::new(),
        }
    }
}

impl UserActionAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("text", Self::set_text),
        PropertyDef::writable("costPUs", Self::set_cost_pus),
        PropertyDef::writable("attemptsPerTurn", Self::set_attempts_per_turn),
        PropertyDef::writable("activateTrigger", Self::set_activate_trigger),
    ];

    /// Set a property by scenario option name.
    pub fn set_property(
        &mut self,
        name: &str,
        value: &str,
        data: &GameData,
        attachment: &str,
    ) -> Result<()> {
        if let Some(result) = self.core.set_property(name, value) {
            return result;
        }
        property::apply(Self::PROPERTIES, self, name, value, data, attachment)
    }

    /// Every option name this variant accepts.
    pub fn property_names() -> impl Iterator<Item = &'static str> {
        ConditionCore::PROPERTY_NAMES
            .into_iter()
            .chain(property::names(Self::PROPERTIES))
    }

    fn set_text(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.text = value.to_string();
        Ok(())
    }

    fn set_cost_pus(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.cost_pus = parse_int("costPUs", value)?;
        Ok(())
    }

    fn set_attempts_per_turn(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.attempts_per_turn = parse_int("attemptsPerTurn", value)?;
        Ok(())
    }

    fn set_activate_trigger(&mut self, value: &str, _data: &GameData) -> Result<()> {
        let [trigger, times, use_uses, test_uses, test_conditions, test_chance] =
            split_on_colon(value)[..]
        else {
            return Err(ScenarioError::invalid(
                "activateTrigger",
                value,
                "must have 6 parts: triggerName:numberOfTimes:useUses:testUses:testConditions:testChance",
            ));
        };
        let times = times.parse::<u32>().map_err(|_| {
            ScenarioError::invalid("activateTrigger", value, "numberOfTimes must be positive")
        })?;
        self.activate_triggers.push(TriggerActivation {
            trigger: trigger.to_string(),
            times,
            use_uses: parse_bool("activateTrigger", use_uses)?,
            test_uses: parse_bool("activateTrigger", test_uses)?,
            test_conditions: parse_bool("activateTrigger", test_conditions)?,
            test_chance: parse_bool("activateTrigger", test_chance)?,
        });
        Ok(())
    }
}
