//! National objectives: rules attachments that pay income each turn.

use tracing::debug;

use crate::attachments::conditions::ChanceAdjustment;
use crate::attachments::rules::RulesAttachment;
use crate::error::Result;
use crate::evaluator::EvaluationPass;
use crate::game::{AttachmentId, AttachmentTarget, GameData, PlayerId};
use crate::random::RandomSource;

/// Income paid by one satisfied objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveAward {
    /// The objective attachment.
    pub condition: AttachmentId,
    /// Objective name.
    pub name: String,
    /// `objectiveValue` times the each-multiple.
    pub amount: i32,
}

/// Result of one end-of-turn objective pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveIncome {
    /// Awards in attachment order.
    pub awards: Vec<ObjectiveAward>,
    /// Chance counter changes already written back to the game data.
    pub adjustments: Vec<ChanceAdjustment>,
}

impl ObjectiveIncome {
    /// Sum of every award.
    #[must_use]
    pub fn total(&self) -> i32 {
        self.awards.iter().map(|award| award.amount).sum()
    }
}

/// A player's national objectives, in attachment name order.
#[must_use]
pub fn national_objectives(data: &GameData, player: PlayerId) -> Vec<AttachmentId> {
    data.attachments_of(AttachmentTarget::Player(player))
        .filter(|&(name, id)| RulesAttachment::is_national_objective(name) && data.rules(id).is_some())
        .map(|(_, id)| id)
        .collect()
}

/// Evaluate a player's objectives as one batch and pay out.
///
/// Objectives with no uses left are skipped before evaluation, so they
/// never roll their chance. Positive use counts are
/// decremented for every paid objective, and the chance adjustments of the
/// pass are applied before returning.
///
/// # Errors
///
/// Evaluation failures, such as a sub-condition cycle.
pub fn collect_objective_income<R: RandomSource>(
    data: &mut GameData,
    player: PlayerId,
    random: R,
) -> Result<ObjectiveIncome> {
    let objectives: Vec<AttachmentId> = national_objectives(data, player)
        .into_iter()
        .filter(|&id| data.rules(id).is_some_and(|rules| rules.uses != 0))
        .collect();
    let (cache, adjustments) = {
        let mut pass = EvaluationPass::new(data, random);
        pass.test_all(&objectives)?;
        pass.finish()
    };

    let mut income = ObjectiveIncome::default();
    for id in objectives {
        let Some(rules) = data.rules_mut(id) else {
            continue;
        };
        let Some(result) = cache.get(id) else {
            continue;
        };
        if !result.satisfied {
            continue;
        }
        if rules.uses > 0 {
            rules.uses -= 1;
        }
        let multiple = i32::try_from(result.each_multiple).unwrap_or(i32::MAX);
        let amount = rules.objective_value.saturating_mul(multiple);
        let name = data.attachment_name(id).to_string();
        debug!(objective = %name, amount, "objective satisfied");
        income.awards.push(ObjectiveAward {
            condition: id,
            name,
            amount,
        });
    }

    data.apply_chance_adjustments(&adjustments);
    income.adjustments = adjustments;
    Ok(income)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{condition_id, scenario, ScriptedDice};

    const OBJECTIVES: &str = r#"[
        AttachmentDecl(
            name: "objectiveAttachmentPolandHeld",
            attach_to: "Germans",
            target_kind: "player",
            class: "RulesAttachment",
            options: [
                OptionDecl(name: "objectiveValue", value: "5"),
                OptionDecl(name: "directOwnershipTerritories", value: "Poland"),
            ],
        ),
        AttachmentDecl(
            name: "objectiveAttachmentEachTerritory",
            attach_to: "Germans",
            target_kind: "player",
            class: "RulesAttachment",
            options: [
                OptionDecl(name: "objectiveValue", value: "2"),
                OptionDecl(name: "uses", value: "1"),
                OptionDecl(name: "directOwnershipTerritories", value: "each:Germany:Poland:Russia"),
            ],
        ),
        AttachmentDecl(
            name: "conditionAttachmentNotAnObjective",
            attach_to: "Germans",
            target_kind: "player",
            class: "RulesAttachment",
            options: [OptionDecl(name: "objectiveValue", value: "100")],
        ),
    ]"#;

    #[test]
    fn test_objectives_are_selected_by_prefix() {
        let data = scenario(OBJECTIVES);
        let germans = data.require_player("Germans").unwrap();
        assert_eq!(national_objectives(&data, germans).len(), 2);
    }

    #[test]
    fn test_each_multiple_scales_income_and_uses_run_out() {
        let mut data = scenario(OBJECTIVES);
        let germans = data.require_player("Germans").unwrap();
        let each = condition_id(&data, "Germans", "objectiveAttachmentEachTerritory");

        let income = collect_objective_income(&mut data, germans, ScriptedDice::new(&[])).unwrap();
        assert_eq!(income.awards.len(), 2);
        assert_eq!(income.total(), 5 + 2 * 2);
        assert_eq!(data.rules(each).unwrap().uses, 0);

        let income = collect_objective_income(&mut data, germans, ScriptedDice::new(&[])).unwrap();
        assert_eq!(income.total(), 5);
    }

    #[test]
    fn test_unmet_objective_pays_nothing() {
        let mut data = scenario(OBJECTIVES);
        let germans = data.require_player("Germans").unwrap();
        let russians = data.player_id("Russians");
        let poland = data.territory_id("Poland").unwrap();
        data.set_owner(poland, russians);
        let income = collect_objective_income(&mut data, germans, ScriptedDice::new(&[])).unwrap();
        assert_eq!(income.awards.len(), 1);
        assert_eq!(income.total(), 2);
    }

    #[test]
    fn test_exhausted_objective_does_not_roll() {
        let mut data = scenario(
            r#"[
            AttachmentDecl(
                name: "objectiveAttachmentSpent",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [
                    OptionDecl(name: "objectiveValue", value: "4"),
                    OptionDecl(name: "uses", value: "0"),
                    OptionDecl(name: "chance", value: "1:6"),
                    OptionDecl(name: "directOwnershipTerritories", value: "Poland"),
                ],
            ),
        ]"#,
        );
        let germans = data.require_player("Germans").unwrap();
        let mut dice = ScriptedDice::new(&[0]);
        let income = collect_objective_income(&mut data, germans, &mut dice).unwrap();
        assert!(income.awards.is_empty());
        assert!(income.adjustments.is_empty());
        assert_eq!(dice.calls(), 0);
    }
}
