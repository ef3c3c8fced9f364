//! Battle history consumed by the battle and destroyed-TUV condition leaves.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::ids::{PlayerId, TerritoryId};

/// How a battle ended, from the attacker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    /// Attacker took the territory.
    Conquered,
    /// Attacker took the territory without a fight.
    Blitzed,
    /// Attacker destroyed the defenders but could not take the territory.
    WonWithoutConquering,
    /// Both sides survived.
    Stalemate,
    /// Attacker was destroyed or retreated.
    Lost,
    /// Strategic bombing raid.
    Bombed,
}

/// One fought battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Round the battle was fought in.
    pub round: u32,
    /// Where it was fought.
    pub territory: TerritoryId,
    /// Attacking player.
    pub attacker: PlayerId,
    /// Defending player.
    pub defender: PlayerId,
    /// Outcome.
    pub result: BattleResult,
    /// Total unit value the attacker lost.
    pub attacker_lost_tuv: i32,
    /// Total unit value the defender lost.
    pub defender_lost_tuv: i32,
}

/// All battles fought so far, in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct BattleRecordList {
    records: Vec<BattleRecord>,
}

impl BattleRecordList {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished battle.
    pub fn push(&mut self, record: BattleRecord) {
        self.records.push(record);
    }

    /// Iterate all records.
    pub fn iter(&self) -> impl Iterator<Item = &BattleRecord> {
        self.records.iter()
    }

    /// Total unit value destroyed by `player` as attacker or defender.
    ///
    /// Counts only `current_round` when `just_current_round` is set,
    /// otherwise every round up to and including it.
    #[must_use]
    pub fn tuv_damage_caused_by(
        &self,
        player: PlayerId,
        current_round: u32,
        just_current_round: bool,
    ) -> i32 {
        self.records
            .iter()
            .filter(|r| {
                if just_current_round {
                    r.round == current_round
                } else {
                    r.round <= current_round
                }
            })
            .map(|r| {
                let mut damage = 0;
                if r.attacker == player {
                    damage += r.defender_lost_tuv;
                }
                if r.defender == player {
                    damage += r.attacker_lost_tuv;
                }
                damage
            })
            .sum()
    }

    /// Whether any battle matches the given sides, territories and rounds.
    ///
    /// `None` for a side matches any player.
    #[must_use]
    pub fn any_battle_matching(
        &self,
        attacker: Option<PlayerId>,
        defender: Option<PlayerId>,
        territories: &[TerritoryId],
        rounds: RangeInclusive<u32>,
    ) -> bool {
        self.records.iter().any(|r| {
            rounds.contains(&r.round)
                && attacker.map_or(true, |a| a == r.attacker)
                && defender.map_or(true, |d| d == r.defender)
                && territories.contains(&r.territory)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(round: u32, attacker: u32, defender: u32, lost_by_defender: i32) -> BattleRecord {
        BattleRecord {
            round,
            territory: TerritoryId::new(0),
            attacker: PlayerId::new(attacker),
            defender: PlayerId::new(defender),
            result: BattleResult::Conquered,
            attacker_lost_tuv: 3,
            defender_lost_tuv: lost_by_defender,
        }
    }

    #[test]
    fn test_tuv_damage_by_round_scope() {
        let mut list = BattleRecordList::new();
        list.push(record(1, 0, 1, 10));
        list.push(record(2, 0, 1, 6));
        list.push(record(2, 1, 0, 4));

        // Round 2 only: 6 as attacker + 3 as defender.
        assert_eq!(list.tuv_damage_caused_by(PlayerId::new(0), 2, true), 9);
        assert_eq!(list.tuv_damage_caused_by(PlayerId::new(0), 2, false), 19);
    }

    #[test]
    fn test_battle_matching_wildcards() {
        let mut list = BattleRecordList::new();
        list.push(record(3, 0, 1, 0));
        let here = [TerritoryId::new(0)];
        assert!(list.any_battle_matching(None, None, &here, 3..=3));
        assert!(list.any_battle_matching(Some(PlayerId::new(0)), None, &here, 1..=4));
        assert!(!list.any_battle_matching(Some(PlayerId::new(1)), None, &here, 1..=4));
        assert!(!list.any_battle_matching(None, None, &[TerritoryId::new(5)], 1..=4));
        assert!(!list.any_battle_matching(None, None, &here, 1..=2));
    }
}
