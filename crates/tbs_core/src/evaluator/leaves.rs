//! Leaf checks of a rules attachment against live game state.
//!
//! Leaves run in a fixed order and stop at the first one that fails. Leaves
//! that count matches overwrite the each-multiple when the attachment counts
//! each match, so the last counting leaf to run wins.

use std::collections::BTreeSet;

use crate::attachments::rules::{
    BattleRounds, RelationshipRequirement, RulesAttachment, TerritoryCheck, UnitPresence,
};
use crate::error::Result;
use crate::game::{Archetype, GameData, PlayerId, TerritoryId, Unit};
use crate::territory_set::{resolve_territories, TerritorySelection};

/// Result of the leaf checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LeafOutcome {
    /// Every present leaf passed.
    pub met: bool,
    /// Match count reported by the last counting leaf, if any ran.
    pub each_multiple: Option<u32>,
}

/// Run every present leaf of `rules`, attached to `attached`.
pub(super) fn check(
    data: &GameData,
    rules: &RulesAttachment,
    attached: PlayerId,
) -> Result<LeafOutcome> {
    let mut leaves = Leaves {
        data,
        rules,
        attached,
        players: rules.players_or(attached),
        each_multiple: None,
    };
    let met = leaves.run()?;
    Ok(LeafOutcome {
        met,
        each_multiple: leaves.each_multiple,
    })
}

struct Leaves<'a> {
    data: &'a GameData,
    rules: &'a RulesAttachment,
    attached: PlayerId,
    players: Vec<PlayerId>,
    each_multiple: Option<u32>,
}

impl Leaves<'_> {
    fn run(&mut self) -> Result<bool> {
        if !self.rules.switch {
            return Ok(false);
        }
        if let Some(turns) = &self.rules.turns {
            let round = self.data.round();
            if !turns.iter().any(|range| range.contains(round)) {
                return Ok(false);
            }
        }
        if let Some(property) = &self.rules.game_property {
            if !self.data.properties().flag(property, false) {
                return Ok(false);
            }
        }
        let rules = self.rules;
        for check in TerritoryCheck::EVALUATION_ORDER {
            let Some(tokens) = rules.territory_list(check) else {
                continue;
            };
            if !self.territory_check(check, tokens)? {
                return Ok(false);
            }
        }
        Ok(self.at_war()
            && self.techs()
            && self.relationships()
            && self.destroyed_tuv()
            && self.battles())
    }

    fn territory_check(&mut self, check: TerritoryCheck, tokens: &[String]) -> Result<bool> {
        let data = self.data;
        let players = &self.players;
        let owned_by = |owners: &[PlayerId], t: TerritoryId| {
            data.territory(t)
                .and_then(|territory| territory.owner)
                .is_some_and(|owner| owners.contains(&owner))
        };
        let (satisfied, number_met) = match check {
            TerritoryCheck::DirectPresence
            | TerritoryCheck::AlliedPresence
            | TerritoryCheck::EnemyPresence => {
                let selection = resolve_territories(tokens, players, data)?;
                self.count_matches(&selection, |t| self.has_presence(check, t))
            }
            TerritoryCheck::DirectExclusion
            | TerritoryCheck::AlliedExclusion
            | TerritoryCheck::EnemyExclusion
            | TerritoryCheck::EnemySurfaceExclusion => {
                let selection = resolve_territories(tokens, players, data)?;
                self.count_matches(&selection, |t| self.is_excluded(check, t))
            }
            TerritoryCheck::AlliedOwnership => {
                let group_players = match group_token(tokens) {
                    Some("original") => data.allies_of_any(players),
                    Some("enemy") => data.enemies_of_any(players),
                    _ => players.clone(),
                };
                let selection = resolve_territories(tokens, &group_players, data)?;
                let allies = data.allies_of_any(players);
                self.count_matches(&selection, |t| owned_by(&allies, t))
            }
            TerritoryCheck::DirectOwnership => {
                let group_players = match group_token(tokens) {
                    Some("enemy") => data.enemies_of_any(players),
                    _ => players.clone(),
                };
                let selection = resolve_territories(tokens, &group_players, data)?;
                self.count_matches(&selection, |t| owned_by(players, t))
            }
        };
        if self.rules.count_each {
            self.each_multiple = Some(number_met);
        }
        Ok(satisfied)
    }

    /// Count territories passing `matches` until the required number is
    /// reached, or through all of them when counting each match.
    fn count_matches(
        &self,
        selection: &TerritorySelection,
        matches: impl Fn(TerritoryId) -> bool,
    ) -> (bool, u32) {
        let mut number_met = 0u32;
        let mut satisfied = false;
        for &territory in &selection.territories {
            if !matches(territory) {
                continue;
            }
            number_met += 1;
            if number_met >= selection.required {
                satisfied = true;
                if !self.rules.count_each {
                    break;
                }
            }
        }
        (satisfied, number_met)
    }

    fn units_in(&self, territory: TerritoryId) -> &[Unit] {
        self.data
            .territory(territory)
            .map_or(&[], |t| t.units.as_slice())
    }

    fn is_owned_by_players(&self, owner: PlayerId) -> bool {
        self.players.contains(&owner)
    }

    fn is_allied_owner(&self, owner: PlayerId) -> bool {
        self.players.iter().any(|&p| self.data.is_allied(owner, p))
    }

    fn is_enemy_owner(&self, owner: PlayerId) -> bool {
        self.players.iter().any(|&p| self.data.is_at_war(owner, p))
    }

    fn has_presence(&self, check: TerritoryCheck, territory: TerritoryId) -> bool {
        let units: Vec<&Unit> = self
            .units_in(territory)
            .iter()
            .filter(|unit| match check {
                TerritoryCheck::DirectPresence => self.is_owned_by_players(unit.owner),
                TerritoryCheck::AlliedPresence => self.is_allied_owner(unit.owner),
                _ => self.is_enemy_owner(unit.owner),
            })
            .collect();
        if units.is_empty() {
            return false;
        }
        self.rules
            .unit_presence
            .iter()
            .all(|filter| count_matching(&units, filter) >= filter.count)
    }

    fn is_excluded(&self, check: TerritoryCheck, territory: TerritoryId) -> bool {
        let units: Vec<&Unit> = self
            .units_in(territory)
            .iter()
            .filter(|unit| match check {
                TerritoryCheck::AlliedExclusion => {
                    !self.is_owned_by_players(unit.owner) && self.is_allied_owner(unit.owner)
                }
                TerritoryCheck::DirectExclusion => self.is_owned_by_players(unit.owner),
                TerritoryCheck::EnemyExclusion => self.is_enemy_owner(unit.owner),
                _ => {
                    self.is_enemy_owner(unit.owner)
                        && self
                            .data
                            .unit_attachment(unit.unit_type)
                            .is_some_and(|stats| stats.is_surface_warship())
                }
            })
            .collect();
        if units.is_empty() {
            return true;
        }
        !self.rules.unit_presence.is_empty()
            && self
                .rules
                .unit_presence
                .iter()
                .all(|filter| count_matching(&units, filter) <= filter.count)
    }

    fn at_war(&mut self) -> bool {
        let rules = self.rules;
        let Some(at_war) = &rules.at_war_players else {
            return true;
        };
        let found = at_war
            .items
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|&enemy| self.data.is_at_war(self.attached, enemy))
            .count();
        self.threshold(found, at_war.count)
    }

    fn techs(&mut self) -> bool {
        let rules = self.rules;
        let Some(techs) = &rules.techs else {
            return true;
        };
        let found = techs
            .items
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|&tech| self.data.has_tech(self.attached, tech))
            .count();
        self.threshold(found, techs.count)
    }

    /// A required count of zero means none may be found.
    fn threshold(&mut self, found: usize, count: u32) -> bool {
        let found = u32::try_from(found).unwrap_or(u32::MAX);
        if count == 0 {
            return found == 0;
        }
        if self.rules.count_each {
            self.each_multiple = Some(found);
        }
        found >= count
    }

    fn relationships(&self) -> bool {
        let data = self.data;
        let round = i64::from(data.round());
        let extra_rounds = i64::from(data.properties().relationships_last_extra_rounds());
        self.rules.relationships.iter().all(|check| {
            let relationship = data.relationship(check.player1, check.player2);
            let created = i64::from(relationship.round_created) + extra_rounds;
            if round - created < i64::from(check.min_rounds) {
                return false;
            }
            let archetype = data.archetype(relationship.relationship_type);
            match check.requirement {
                RelationshipRequirement::AnyAllied => archetype == Archetype::Allied,
                RelationshipRequirement::AnyNeutral => archetype == Archetype::Neutral,
                RelationshipRequirement::AnyWar => archetype == Archetype::War,
                RelationshipRequirement::Exactly(expected) => {
                    relationship.relationship_type == expected
                }
            }
        })
    }

    fn destroyed_tuv(&mut self) -> bool {
        let Some(destroyed) = self.rules.destroyed_tuv else {
            return true;
        };
        if destroyed.required < 0 {
            return true;
        }
        let damage = self.data.battles().tuv_damage_caused_by(
            self.attached,
            self.data.round(),
            destroyed.current_round_only,
        );
        if self.rules.count_each {
            self.each_multiple = Some(u32::try_from(damage).unwrap_or(0));
        }
        destroyed.required <= damage
    }

    fn battles(&self) -> bool {
        let round = self.data.round();
        self.rules.battles.iter().all(|check| {
            let rounds = match check.rounds {
                BattleRounds::CurrentRound => round..=round,
                BattleRounds::Range(start, end) => start..=end,
            };
            self.data.battles().any_battle_matching(
                check.attacker,
                check.defender,
                &check.territories,
                rounds,
            )
        })
    }
}

/// The group keyword of an ownership list: the only token of a one-token
/// list, the second of a two-token list.
fn group_token(tokens: &[String]) -> Option<&str> {
    match tokens {
        [group] | [_, group] => Some(group.as_str()),
        _ => None,
    }
}

fn count_matching(units: &[&Unit], filter: &UnitPresence) -> u32 {
    let count = match &filter.units {
        None => units.len(),
        Some(types) => units
            .iter()
            .filter(|unit| types.contains(&unit.unit_type))
            .count(),
    };
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::evaluator::EvaluationPass;
    use crate::game::{BattleRecord, BattleResult, GameData};
    use crate::testing::{condition_id, scenario, ScriptedDice};

    fn rules(name: &str, options: &str) -> String {
        format!(
            r#"[AttachmentDecl(
                name: "{name}",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [{options}],
            )]"#
        )
    }

    fn eval(data: &GameData, name: &str) -> (bool, u32) {
        let id = condition_id(data, "Germans", name);
        let result = EvaluationPass::new(data, ScriptedDice::new(&[]))
            .evaluate(id)
            .unwrap();
        (result.satisfied, result.each_multiple)
    }

    #[test]
    fn test_switch_and_turns() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "turns", value: "2-3:5")"#,
        ));
        assert!(!eval(&data, "c").0);
        data.set_round(3);
        assert!(eval(&data, "c").0);
        data.set_round(5);
        assert!(eval(&data, "c").0);

        let data = scenario(&rules("c", r#"OptionDecl(name: "switch", value: "false")"#));
        assert!(!eval(&data, "c").0);
    }

    #[test]
    fn test_game_property_flag() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "gameProperty", value: "Total Victory")"#,
        ));
        assert!(!eval(&data, "c").0);
        data.properties_mut().set_flag("Total Victory", true);
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_direct_ownership_each_counts_matches() {
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "directOwnershipTerritories", value: "each:Germany:Poland:Russia")"#,
        ));
        assert_eq!(eval(&data, "c"), (true, 2));
    }

    #[test]
    fn test_controlled_shrinks_with_ownership_original_does_not() {
        let controlled = rules(
            "c",
            r#"OptionDecl(name: "directOwnershipTerritories", value: "controlled")"#,
        );
        let original = rules(
            "c",
            r#"OptionDecl(name: "directOwnershipTerritories", value: "original")"#,
        );
        for (options, expected) in [(controlled, true), (original, false)] {
            let mut data = scenario(&options);
            assert!(eval(&data, "c").0);
            let poland = data.territory_id("Poland").unwrap();
            let russians = data.player_id("Russians");
            data.set_owner(poland, russians);
            assert_eq!(eval(&data, "c").0, expected);
        }
    }

    #[test]
    fn test_allied_ownership_counts_allies() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "alliedOwnershipTerritories", value: "Germany:Rome")"#,
        ));
        assert!(eval(&data, "c").0);
        let rome = data.territory_id("Rome").unwrap();
        data.set_owner(rome, data.player_id("Russians"));
        assert!(!eval(&data, "c").0);
    }

    #[test]
    fn test_enemy_ownership_group_uses_enemies() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "directOwnershipTerritories", value: "enemy")"#,
        ));
        // Germans own none of the Russian starting territories.
        assert!(!eval(&data, "c").0);
        let germans = data.player_id("Germans");
        for name in ["Russia", "Moscow"] {
            let t = data.territory_id(name).unwrap();
            data.set_owner(t, germans);
        }
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_presence_with_unit_filter() {
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "directPresenceTerritories", value: "Germany"),
               OptionDecl(name: "unitPresence", value: "armour", count: Some("2"))"#,
        ));
        // Germany holds 3 infantry and 1 armour.
        assert!(!eval(&data, "c").0);

        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "directPresenceTerritories", value: "Germany"),
               OptionDecl(name: "unitPresence", value: "infantry", count: Some("3"))"#,
        ));
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_enemy_presence_and_exclusion() {
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "enemyPresenceTerritories", value: "Russia")"#,
        ));
        assert!(eval(&data, "c").0);
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "enemyExclusionTerritories", value: "Russia")"#,
        ));
        assert!(!eval(&data, "c").0);
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "enemyExclusionTerritories", value: "Germany:Poland")"#,
        ));
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_exclusion_with_unit_maximum() {
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "enemyExclusionTerritories", value: "Russia"),
               OptionDecl(name: "unitPresence", value: "infantry", count: Some("2"))"#,
        ));
        // Russia holds 2 Russian infantry: at most 2 allowed.
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_enemy_surface_ignores_submarines_and_transports() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "enemySurfaceExclusionTerritories", value: "Baltic Sea")"#,
        ));
        let baltic = data.territory_id("Baltic Sea").unwrap();
        let russians = data.require_player("Russians").unwrap();
        let submarine = data.require_unit_type("submarine").unwrap();
        let transport = data.require_unit_type("transport").unwrap();
        let destroyer = data.require_unit_type("destroyer").unwrap();
        data.add_units(baltic, submarine, russians, 1);
        data.add_units(baltic, transport, russians, 1);
        assert!(eval(&data, "c").0);
        data.add_units(baltic, destroyer, russians, 1);
        assert!(!eval(&data, "c").0);
    }

    #[test]
    fn test_allied_exclusion_ignores_own_units() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "alliedExclusionTerritories", value: "Germany")"#,
        ));
        assert!(eval(&data, "c").0);
        let germany = data.territory_id("Germany").unwrap();
        let italians = data.require_player("Italians").unwrap();
        let infantry = data.require_unit_type("infantry").unwrap();
        data.add_units(germany, infantry, italians, 1);
        assert!(!eval(&data, "c").0);
    }

    #[test]
    fn test_at_war_and_techs_counts() {
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "atWarPlayers", value: "1:Russians:Italians")"#,
        ));
        assert!(eval(&data, "c").0);
        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "atWarPlayers", value: "Russians")"#,
        ));
        // No count means none of them may be at war.
        assert!(!eval(&data, "c").0);

        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "techs", value: "2:radar:jetPower")"#,
        ));
        let germans = data.require_player("Germans").unwrap();
        let radar = data.require_technology("radar").unwrap();
        data.grant_tech(germans, radar);
        assert!(!eval(&data, "c").0);
        let jet = data.require_technology("jetPower").unwrap();
        data.grant_tech(germans, jet);
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_relationship_requirements() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "relationship", value: "Germans:Italians:anyAllied:2")"#,
        ));
        // Alliance created in round 1, current round 1.
        assert!(!eval(&data, "c").0);
        data.set_round(3);
        assert!(eval(&data, "c").0);

        let data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "relationship", value: "Germans:Russians:anyWar")"#,
        ));
        assert!(eval(&data, "c").0);
    }

    #[test]
    fn test_destroyed_tuv_and_battles() {
        let mut data = scenario(&rules(
            "c",
            r#"OptionDecl(name: "destroyedTUV", value: "10:currentRound"),
               OptionDecl(name: "battle", value: "Germans:any:any:currentRound:Poland:Russia")"#,
        ));
        assert!(!eval(&data, "c").0);
        let germans = data.require_player("Germans").unwrap();
        let russians = data.require_player("Russians").unwrap();
        let russia = data.territory_id("Russia").unwrap();
        data.record_battle(BattleRecord {
            round: 1,
            territory: russia,
            attacker: germans,
            defender: russians,
            result: BattleResult::Conquered,
            attacker_lost_tuv: 3,
            defender_lost_tuv: 12,
        });
        assert!(eval(&data, "c").0);
        data.set_round(2);
        assert!(!eval(&data, "c").0);
    }
}
