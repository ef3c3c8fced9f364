//! Rules attachments: conditions and national objectives attached to a
//! player.
//!
//! Every leaf test is optional. Territory lists keep their raw tokens because
//! groups such as `controlled` resolve against live game state; everything
//! else resolves to typed IDs while the scenario loads.
//!
//! # Example RON
//!
//! ```ron
//! (
//!     name: "objectiveAttachmentGermans1",
//!     attach_to: "Germans",
//!     target_kind: "player",
//!     class: "RulesAttachment",
//!     options: [
//!         (name: "objectiveValue", value: "5"),
//!         (name: "directOwnershipTerritories", value: "Moscow:Leningrad", count: Some("1")),
//!     ],
//! )
//! ```

use crate::error::{EntityKind, Result, ScenarioError};
use crate::game::{GameData, PlayerId, RelationshipTypeId, TechId, TerritoryId, UnitTypeId};

use super::conditions::ConditionCore;
use super::property::{
    self, parse_bool, parse_int, split_on_colon, split_on_hyphen, PropertyDef,
};

/// Prefix of rules attachments that pay income as national objectives.
pub const OBJECTIVE_PREFIX: &str = "objectiveAttachment";

/// Relationship leaf keywords that match any type of an archetype.
pub const ANY_ALLIED: &str = "anyAllied";
/// See [`ANY_ALLIED`].
pub const ANY_NEUTRAL: &str = "anyNeutral";
/// See [`ANY_ALLIED`].
pub const ANY_WAR: &str = "anyWar";

/// A territory-list leaf. Variants are listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TerritoryCheck {
    /// Units owned by the players are present.
    DirectPresence,
    /// Units allied to the players are present.
    AlliedPresence,
    /// Units at war with the players are present.
    EnemyPresence,
    /// No units owned by the players.
    DirectExclusion,
    /// No allied units other than the players' own.
    AlliedExclusion,
    /// No enemy units.
    EnemyExclusion,
    /// No enemy surface warships.
    EnemySurfaceExclusion,
    /// Territories owned by the players or their allies.
    AlliedOwnership,
    /// Territories owned by the players.
    DirectOwnership,
}

impl TerritoryCheck {
    /// All checks in the order the evaluator runs them.
    pub const EVALUATION_ORDER: [Self; 9] = [
        Self::DirectPresence,
        Self::AlliedPresence,
        Self::EnemyPresence,
        Self::DirectExclusion,
        Self::AlliedExclusion,
        Self::EnemyExclusion,
        Self::EnemySurfaceExclusion,
        Self::AlliedOwnership,
        Self::DirectOwnership,
    ];

    /// Scenario option name.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::DirectPresence => "directPresenceTerritories",
            Self::AlliedPresence => "alliedPresenceTerritories",
            Self::EnemyPresence => "enemyPresenceTerritories",
            Self::DirectExclusion => "directExclusionTerritories",
            Self::AlliedExclusion => "alliedExclusionTerritories",
            Self::EnemyExclusion => "enemyExclusionTerritories",
            Self::EnemySurfaceExclusion => "enemySurfaceExclusionTerritories",
            Self::AlliedOwnership => "alliedOwnershipTerritories",
            Self::DirectOwnership => "directOwnershipTerritories",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Inclusive round range; `end` is `u32::MAX` for open ranges (`3-+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRange {
    /// First round.
    pub start: u32,
    /// Last round.
    pub end: u32,
}

impl RoundRange {
    /// Whether `round` falls inside the range.
    #[must_use]
    pub fn contains(self, round: u32) -> bool {
        round >= self.start && round <= self.end
    }
}

/// A list of players or techs with a required count.
///
/// A count of 0 means none of the items may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedList<T> {
    /// Required matches.
    pub count: u32,
    /// Candidates.
    pub items: Vec<T>,
}

/// What a relationship leaf requires of the current relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipRequirement {
    /// Any allied type.
    AnyAllied,
    /// Any neutral type.
    AnyNeutral,
    /// Any war type.
    AnyWar,
    /// This exact type.
    Exactly(RelationshipTypeId),
}

/// `player1:player2:type[:minRounds]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipCheck {
    /// First player.
    pub player1: PlayerId,
    /// Second player.
    pub player2: PlayerId,
    /// Required relationship.
    pub requirement: RelationshipRequirement,
    /// Minimum rounds the relationship must have existed; -1 for any.
    pub min_rounds: i32,
}

/// `count:currentRound|allRounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedTuv {
    /// Required destroyed unit value; -1 disables the leaf.
    pub required: i32,
    /// Count only the current round.
    pub current_round_only: bool,
}

/// Which rounds a battle leaf looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleRounds {
    /// Only the current round.
    CurrentRound,
    /// An inclusive round range.
    Range(u32, u32),
}

/// `attacker:defender:resultType:rounds:territory...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleCheck {
    /// Attacker, `None` for `any`.
    pub attacker: Option<PlayerId>,
    /// Defender, `None` for `any`.
    pub defender: Option<PlayerId>,
    /// Rounds to search.
    pub rounds: BattleRounds,
    /// Territories where the battle must have been fought.
    pub territories: Vec<TerritoryId>,
}

/// Unit filter for presence/exclusion leaves: `count:unit...` or
/// `count:any`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPresence {
    /// `None` matches every unit.
    pub units: Option<Vec<UnitTypeId>>,
    /// Minimum (presence) or maximum (exclusion) matching units.
    pub count: u32,
}

/// Condition and national-objective attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesAttachment {
    /// Sub-conditions, invert and chance.
    pub core: ConditionCore,
    /// Players the leaves test; empty means the attached player.
    pub players: Vec<PlayerId>,
    /// Income paid when satisfied as a national objective.
    pub objective_value: i32,
    /// Remaining income payouts; negative for unlimited.
    pub uses: i32,
    /// Rounds in which the condition can hold.
    pub turns: Option<Vec<RoundRange>>,
    /// Manual on/off switch.
    pub switch: bool,
    /// Boolean game option that must be on.
    pub game_property: Option<String>,
    /// Technologies the attached player must have.
    pub techs: Option<CountedList<TechId>>,
    /// Players the attached player must be at war with.
    pub at_war_players: Option<CountedList<PlayerId>>,
    /// Relationship requirements, all of which must hold.
    pub relationships: Vec<RelationshipCheck>,
    /// Destroyed unit value threshold.
    pub destroyed_tuv: Option<DestroyedTuv>,
    /// Battle history requirements, all of which must hold.
    pub battles: Vec<BattleCheck>,
    /// Unit filter for presence and exclusion leaves.
    pub unit_presence: Vec<UnitPresence>,
    /// Report the number of matches instead of a plain pass.
    pub count_each: bool,
    territory_lists: [Option<Vec<String>>; 9],
}

impl Default for RulesAttachment {
    fn default() -> Self {
        Self {
            core: ConditionCore::default(),
            players: Vec::new(),
            objective_value: 0,
            uses: -1,
            turns: None,
            switch: true,
            game_property: None,
            techs: None,
            at_war_players: None,
            relationships: Vec::new(),
            destroyed_tuv: None,
            battles: Vec::new(),
            unit_presence: Vec::new(),
            count_each: false,
            territory_lists: Default::default(),
        }
    }
}

impl RulesAttachment {
    const PROPERTIES: &'static [PropertyDef<Self>] = &[
        PropertyDef::writable("players", Self::set_players),
        PropertyDef::writable("objectiveValue", Self::set_objective_value),
        PropertyDef::writable("uses", Self::set_uses),
        PropertyDef::writable("turns", Self::set_turns),
        PropertyDef::writable("rounds", Self::set_turns),
        PropertyDef::writable("switch", Self::set_switch),
        PropertyDef::writable("gameProperty", Self::set_game_property),
        PropertyDef::writable("techs", Self::set_techs),
        PropertyDef::writable("atWarPlayers", Self::set_at_war_players),
        PropertyDef::writable("relationship", Self::set_relationship),
        PropertyDef::writable("destroyedTUV", Self::set_destroyed_tuv),
        PropertyDef::writable("battle", Self::set_battle),
        PropertyDef::writable("directPresenceTerritories", Self::set_direct_presence),
        PropertyDef::writable("alliedPresenceTerritories", Self::set_allied_presence),
        PropertyDef::writable("enemyPresenceTerritories", Self::set_enemy_presence),
        PropertyDef::writable("directExclusionTerritories", Self::set_direct_exclusion),
        PropertyDef::writable("alliedExclusionTerritories", Self::set_allied_exclusion),
        PropertyDef::writable("enemyExclusionTerritories", Self::set_enemy_exclusion),
        PropertyDef::writable(
            "enemySurfaceExclusionTerritories",
            Self::set_enemy_surface_exclusion,
        ),
        PropertyDef::writable("alliedOwnershipTerritories", Self::set_allied_ownership),
        PropertyDef::writable("directOwnershipTerritories", Self::set_direct_ownership),
        PropertyDef::writable("unitPresence", Self::set_unit_presence),
        PropertyDef::read_only("countEach"),
        PropertyDef::read_only("eachMultiple"),
        PropertyDef::read_only("techCount"),
        PropertyDef::read_only("atWarCount"),
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

    /// Raw tokens of a territory-list leaf.
    #[must_use]
    pub fn territory_list(&self, check: TerritoryCheck) -> Option<&[String]> {
        self.territory_lists[check.index()].as_deref()
    }

    /// Every territory-list leaf that is set, in evaluation order.
    pub fn territory_lists(&self) -> impl Iterator<Item = (TerritoryCheck, &[String])> {
        TerritoryCheck::EVALUATION_ORDER
            .into_iter()
            .filter_map(|check| self.territory_list(check).map(|tokens| (check, tokens)))
    }

    /// Players the leaves test: the declared list, or the attached player.
    #[must_use]
    pub fn players_or(&self, attached: PlayerId) -> Vec<PlayerId> {
        if self.players.is_empty() {
            vec![attached]
        } else {
            self.players.clone()
        }
    }

    /// Whether this is a national objective (pays income).
    #[must_use]
    pub fn is_national_objective(name: &str) -> bool {
        name.starts_with(OBJECTIVE_PREFIX)
    }

    fn set_players(&mut self, value: &str, data: &GameData) -> Result<()> {
        for name in split_on_colon(value) {
            self.players.push(data.require_player(name)?);
        }
        Ok(())
    }

    fn set_objective_value(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.objective_value = parse_int("objectiveValue", value)?;
        Ok(())
    }

    fn set_uses(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.uses = parse_int("uses", value)?;
        Ok(())
    }

    fn set_turns(&mut self, value: &str, _data: &GameData) -> Result<()> {
        let mut ranges = Vec::new();
        for token in split_on_colon(value) {
            if token.is_empty() {
                return Err(ScenarioError::invalid("turns", value, "Empty turn list"));
            }
            let range = if let Ok(round) = token.parse::<u32>() {
                RoundRange {
                    start: round,
                    end: round,
                }
            } else {
                let [start, end] = split_on_hyphen(token)[..] else {
                    return Err(ScenarioError::invalid(
                        "turns",
                        value,
                        "Invalid syntax for turn range, must be 'int-int'",
                    ));
                };
                let bad_range = |_: std::num::ParseIntError| {
                    ScenarioError::invalid(
                        "turns",
                        value,
                        "Invalid syntax for turn range, must be 'int-int'",
                    )
                };
                let start = start.parse::<u32>().map_err(bad_range)?;
                let end = if end == "+" {
                    u32::MAX
                } else {
                    end.parse::<u32>().map_err(bad_range)?
                };
                RoundRange { start, end }
            };
            ranges.push(range);
        }
        self.turns = Some(ranges);
        Ok(())
    }

    fn set_switch(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.switch = parse_bool("switch", value)?;
        Ok(())
    }

    fn set_game_property(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.game_property = Some(value.to_string());
        Ok(())
    }

    fn set_techs(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.techs = Some(parse_counted_list("techs", value, |name| {
            data.require_technology(name)
        })?);
        Ok(())
    }

    fn set_at_war_players(&mut self, value: &str, data: &GameData) -> Result<()> {
        self.at_war_players = Some(parse_counted_list("atWarPlayers", value, |name| {
            data.require_player(name)
        })?);
        Ok(())
    }

    fn set_relationship(&mut self, value: &str, data: &GameData) -> Result<()> {
        let tokens = split_on_colon(value);
        if !(3..=4).contains(&tokens.len()) {
            return Err(ScenarioError::invalid(
                "relationship",
                value,
                "expected playername1:playername2:relationshiptype:numberOfRoundsExisting",
            ));
        }
        let player1 = data.require_player(tokens[0])?;
        let player2 = data.require_player(tokens[1])?;
        let requirement = match tokens[2] {
            ANY_ALLIED => RelationshipRequirement::AnyAllied,
            ANY_NEUTRAL => RelationshipRequirement::AnyNeutral,
            ANY_WAR => RelationshipRequirement::AnyWar,
            name => RelationshipRequirement::Exactly(data.require_relationship_type(name)?),
        };
        let min_rounds = match tokens.get(3) {
            Some(rounds) => parse_int("relationship", rounds)?,
            None => -1,
        };
        if min_rounds < -1 {
            return Err(ScenarioError::invalid(
                "relationship",
                value,
                "numberOfRoundsExisting must be -1 or more",
            ));
        }
        self.relationships.push(RelationshipCheck {
            player1,
            player2,
            requirement,
            min_rounds,
        });
        Ok(())
    }

    fn set_destroyed_tuv(&mut self, value: &str, _data: &GameData) -> Result<()> {
        let [count, scope] = split_on_colon(value)[..] else {
            return Err(ScenarioError::invalid(
                "destroyedTUV",
                value,
                "expected count:currentRound or count:allRounds",
            ));
        };
        let required = parse_int("destroyedTUV", count)?;
        if required < -1 {
            return Err(ScenarioError::invalid(
                "destroyedTUV",
                value,
                "count cannot be less than -1",
            ));
        }
        let current_round_only = match scope {
            "currentRound" => true,
            "allRounds" => false,
            _ => {
                return Err(ScenarioError::invalid(
                    "destroyedTUV",
                    value,
                    "value must be currentRound or allRounds",
                ))
            }
        };
        self.destroyed_tuv = Some(DestroyedTuv {
            required,
            current_round_only,
        });
        Ok(())
    }

    fn set_battle(&mut self, value: &str, data: &GameData) -> Result<()> {
        let tokens = split_on_colon(value);
        if tokens.len() < 5 {
            return Err(ScenarioError::invalid(
                "battle",
                value,
                "expected attacker:defender:resultType:round:territory1...",
            ));
        }
        let side = |name: &str| -> Result<Option<PlayerId>> {
            if name.eq_ignore_ascii_case("any") {
                Ok(None)
            } else {
                data.require_player(name).map(Some)
            }
        };
        let attacker = side(tokens[0])?;
        let defender = side(tokens[1])?;
        if !tokens[2].eq_ignore_ascii_case("any") {
            return Err(ScenarioError::invalid(
                "battle",
                value,
                "resultType must be any",
            ));
        }
        let rounds = if tokens[3].eq_ignore_ascii_case("currentRound") {
            BattleRounds::CurrentRound
        } else {
            match split_on_hyphen(tokens[3])[..] {
                [start, end] => match (start.parse::<u32>(), end.parse::<u32>()) {
                    (Ok(start), Ok(end)) => BattleRounds::Range(start, end),
                    _ => return Err(bad_battle_round(value)),
                },
                _ => return Err(bad_battle_round(value)),
            }
        };
        let territories = tokens[4..]
            .iter()
            .map(|name| data.require_territory(name))
            .collect::<Result<Vec<_>>>()?;
        self.battles.push(BattleCheck {
            attacker,
            defender,
            rounds,
            territories,
        });
        Ok(())
    }

    fn set_territory_list(&mut self, check: TerritoryCheck, value: &str) -> Result<()> {
        let tokens: Vec<String> = split_on_colon(value)
            .into_iter()
            .map(str::to_string)
            .collect();
        if tokens.iter().any(|t| t == "each") {
            self.count_each = true;
        }
        self.territory_lists[check.index()] = Some(tokens);
        Ok(())
    }

    fn set_direct_presence(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::DirectPresence, value)
    }

    fn set_allied_presence(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::AlliedPresence, value)
    }

    fn set_enemy_presence(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::EnemyPresence, value)
    }

    fn set_direct_exclusion(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::DirectExclusion, value)
    }

    fn set_allied_exclusion(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::AlliedExclusion, value)
    }

    fn set_enemy_exclusion(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::EnemyExclusion, value)
    }

    fn set_enemy_surface_exclusion(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::EnemySurfaceExclusion, value)
    }

    fn set_allied_ownership(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::AlliedOwnership, value)
    }

    fn set_direct_ownership(&mut self, value: &str, _data: &GameData) -> Result<()> {
        self.set_territory_list(TerritoryCheck::DirectOwnership, value)
    }

    fn set_unit_presence(&mut self, value: &str, data: &GameData) -> Result<()> {
        let tokens = split_on_colon(value);
        if tokens.len() < 2 {
            return Err(ScenarioError::invalid(
                "unitPresence",
                value,
                "expected count:unit1:unit2... or count:any",
            ));
        }
        let count: u32 = tokens[0].parse().map_err(|_| {
            ScenarioError::invalid("unitPresence", value, "count must be a positive integer")
        })?;
        let units = if tokens[1..].len() == 1 && tokens[1].eq_ignore_ascii_case("any") {
            None
        } else {
            let units = tokens[1..]
                .iter()
                .filter(|name| !name.eq_ignore_ascii_case("any"))
                .map(|name| data.require_unit_type(name))
                .collect::<Result<Vec<_>>>()?;
            Some(units)
        };
        // One filter per unit combination; a repeated combination replaces the old count.
        if let Some(existing) = self.unit_presence.iter_mut().find(|p| p.units == units) {
            existing.count = count;
        } else {
            self.unit_presence.push(UnitPresence { units, count });
        }
        Ok(())
    }
}

fn bad_battle_round(value: &str) -> ScenarioError {
    ScenarioError::invalid(
        "battle",
        value,
        "round must either be currentRound or two numbers like: 2-4",
    )
}

/// `[count:]item...`: a leading integer is the required count, otherwise
/// the count is 0. A count with no items is rejected.
fn parse_counted_list<T>(
    property: &str,
    value: &str,
    resolve: impl Fn(&str) -> Result<T>,
) -> Result<CountedList<T>> {
    let tokens = split_on_colon(value);
    let (count, names) = match tokens[0].parse::<u32>() {
        Ok(count) => (count, &tokens[1..]),
        Err(_) => (0, &tokens[..]),
    };
    if names.is_empty() || names.iter().all(|name| name.is_empty()) {
        return Err(ScenarioError::invalid(property, value, "Empty list"));
    }
    let items = names
        .iter()
        .map(|name| resolve(*name))
        .collect::<Result<Vec<_>>>()?;
    Ok(CountedList { count, items })
}

/// Missing condition error used when linking sub-conditions.
pub(crate) fn missing_condition(name: &str) -> ScenarioError {
    ScenarioError::missing(EntityKind::Condition, name)
}
