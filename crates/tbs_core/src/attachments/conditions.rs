//! The part of a condition shared by rules attachments and user actions:
//! sub-conditions, their combination, inversion and the chance gate.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScenarioError};
use crate::game::AttachmentId;

use super::property::{parse_bool, parse_int, split_on_colon, split_on_hyphen};

/// How the results of sub-conditions are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionType {
    /// Every sub-condition holds.
    #[default]
    And,
    /// At least one sub-condition holds.
    Or,
    /// Exactly `n` sub-conditions hold (`XOR` is `Exactly(1)`).
    Exactly(u32),
    /// Between `min` and `max` sub-conditions hold, inclusive.
    Between(u32, u32),
}

impl ConditionType {
    /// Combine sub-condition results.
    pub fn combine(self, results: impl IntoIterator<Item = bool>) -> bool {
        let mut total = 0u32;
        let mut satisfied = 0u32;
        for result in results {
            total += 1;
            if result {
                satisfied += 1;
            }
        }
        match self {
            Self::And => satisfied == total,
            Self::Or => satisfied > 0,
            Self::Exactly(n) => satisfied == n,
            Self::Between(min, max) => (min..=max).contains(&satisfied),
        }
    }
}

impl FromStr for ConditionType {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ScenarioError::invalid(
                "conditionType",
                s,
                "must be AND, OR, XOR, a number or a range like 1-3",
            )
        };
        if s.eq_ignore_ascii_case("AND") {
            return Ok(Self::And);
        }
        if s.eq_ignore_ascii_case("OR") {
            return Ok(Self::Or);
        }
        if s.eq_ignore_ascii_case("XOR") {
            return Ok(Self::Exactly(1));
        }
        if let Ok(n) = s.parse() {
            return Ok(Self::Exactly(n));
        }
        match split_on_hyphen(s).as_slice() {
            [min, max] => {
                let min: u32 = min.parse().map_err(|_| invalid())?;
                let max: u32 = max.parse().map_err(|_| invalid())?;
                if min > max {
                    return Err(invalid());
                }
                Ok(Self::Between(min, max))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Exactly(n) => write!(f, "{n}"),
            Self::Between(min, max) => write!(f, "{min}-{max}"),
        }
    }
}

/// `hit` out of `sides` chance gate. The default `1:1` always passes
/// without rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chance {
    /// Highest roll that succeeds.
    pub hit: i32,
    /// Dice sides.
    pub sides: i32,
}

impl Default for Chance {
    fn default() -> Self {
        Self { hit: 1, sides: 1 }
    }
}

impl FromStr for Chance {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        let tokens = split_on_colon(s);
        let [hit, sides] = tokens.as_slice() else {
            return Err(ScenarioError::invalid(
                "chance",
                s,
                "must have the form hit:sides",
            ));
        };
        let hit = parse_int("chance", hit)?;
        let sides = parse_int("chance", sides)?;
        if hit < 0 || sides < 0 || hit > sides {
            return Err(ScenarioError::invalid(
                "chance",
                s,
                "hit and sides must be non-negative with hit <= sides",
            ));
        }
        Ok(Self { hit, sides })
    }
}

/// A changed chance produced by an evaluation pass, applied to the game
/// data by whoever holds it mutably.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceAdjustment {
    /// Condition whose chance changed.
    pub condition: AttachmentId,
    /// New hit target.
    pub hit: i32,
}

/// Condition combinators and chance settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionCore {
    /// Sub-condition names as declared.
    pub conditions: Vec<String>,
    /// Sub-conditions resolved to arena indices after loading.
    pub linked: Vec<AttachmentId>,
    /// Combination of the sub-condition results.
    pub condition_type: ConditionType,
    /// Negate the final result.
    pub invert: bool,
    /// Chance gate, checked after everything else.
    pub chance: Chance,
    /// Added to the hit target after a failed roll.
    pub chance_increment_on_failure: i32,
    /// Subtracted from the hit target after a successful roll.
    pub chance_decrement_on_success: i32,
}

impl ConditionCore {
    /// Option names handled by [`ConditionCore::set_property`].
    pub const PROPERTY_NAMES: [&'static str; 6] = [
        "conditions",
        "conditionType",
        "invert",
        "chance",
        "chanceIncrementOnFailure",
        "chanceDecrementOnSuccess",
    ];

    /// Set one of the shared condition options.
    ///
    /// Returns `None` if `name` is not a condition option.
    pub fn set_property(&mut self, name: &str, value: &str) -> Option<Result<()>> {
        let result = match name {
            "conditions" => self.add_conditions(value),
            "conditionType" => value.parse::<ConditionType>().map(|t| self.condition_type = t),
            "invert" => parse_bool(name, value).map(|b| self.invert = b),
            "chance" => value.parse::<Chance>().map(|c| self.chance = c),
            "chanceIncrementOnFailure" => {
                parse_int(name, value).map(|n| self.chance_increment_on_failure = n)
            }
            "chanceDecrementOnSuccess" => {
                parse_int(name, value).map(|n| self.chance_decrement_on_success = n)
            }
            _ => return None,
        };
        Some(result)
    }

    fn add_conditions(&mut self, value: &str) -> Result<()> {
        for name in split_on_colon(value) {
            if name.is_empty() {
                return Err(ScenarioError::invalid(
                    "conditions",
                    value,
                    "empty condition name",
                ));
            }
            self.conditions.push(name.to_string());
        }
        Ok(())
    }

    /// Whether the chance gate needs to run at all.
    #[must_use]
    pub fn has_chance_gate(&self) -> bool {
        self.chance.hit != self.chance.sides
            || self.chance_increment_on_failure != 0
            || self.chance_decrement_on_success != 0
    }

    /// New hit target after a roll (or automatic outcome), if it changes.
    #[must_use]
    pub fn adjusted_hit(&self, success: bool) -> Option<i32> {
        let Chance { hit, sides } = self.chance;
        let new_hit = if success {
            if self.chance_decrement_on_success == 0 {
                return None;
            }
            (hit - self.chance_decrement_on_success).clamp(0, sides.max(0))
        } else {
            if self.chance_increment_on_failure == 0 {
                return None;
            }
            (hit + self.chance_increment_on_failure).min(sides)
        };
        (new_hit != hit).then_some(new_hit)
    }
}
