//! Human- and machine-readable reports over a loaded scenario.

use std::fmt::Write as _;

use serde::Serialize;
use tbs_core::attachments::rules::RulesAttachment;
use tbs_core::evaluator::EvaluationPass;
use tbs_core::game::{AttachmentId, AttachmentTarget, GameData, PlayerId};
use tbs_core::objectives::collect_objective_income;
use tbs_core::random::RandomSource;

use crate::error::{Result, ToolError};

/// One built attachment and the option values applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentEntry {
    /// Attachment name.
    pub name: String,
    /// Kind of entity it hangs off.
    pub target_kind: String,
    /// Name of that entity.
    pub target: String,
    /// Attachment class.
    pub variant: String,
    /// `(property, value)` pairs in declaration order.
    pub values: Vec<(String, String)>,
}

/// The attachment audit trail, in build order.
#[must_use]
pub fn attachment_entries(data: &GameData) -> Vec<AttachmentEntry> {
    data.applied_attachments()
        .iter()
        .map(|applied| AttachmentEntry {
            name: applied.name.clone(),
            target_kind: applied.target.kind().to_string(),
            target: data.target_name(applied.target).to_string(),
            variant: data
                .attachment(applied.attachment)
                .map(|a| a.attachment.variant().to_string())
                .unwrap_or_default(),
            values: applied.values.clone(),
        })
        .collect()
}

/// Evaluated state of one condition or user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEntry {
    /// Attachment name.
    pub name: String,
    /// Satisfied (conditions) or performable (user actions).
    pub satisfied: bool,
    /// Each-multiple; always 1 for user actions.
    pub each_multiple: u32,
}

/// Evaluate every condition and user action of a player in one pass.
///
/// # Errors
///
/// Evaluation failures such as a sub-condition cycle.
pub fn condition_entries<R: RandomSource>(
    data: &GameData,
    player: PlayerId,
    random: R,
) -> Result<Vec<ConditionEntry>> {
    let ids: Vec<(String, AttachmentId)> = data
        .attachments_of(AttachmentTarget::Player(player))
        .map(|(name, id)| (name.to_string(), id))
        .collect();
    let rules: Vec<AttachmentId> = ids
        .iter()
        .filter(|(_, id)| data.rules(*id).is_some())
        .map(|(_, id)| *id)
        .collect();

    let mut pass = EvaluationPass::new(data, random);
    pass.test_all(&rules)?;
    let mut entries = Vec::with_capacity(ids.len());
    for (name, id) in ids {
        if data.user_action(id).is_some() {
            entries.push(ConditionEntry {
                name,
                satisfied: pass.can_perform(id)?,
                each_multiple: 1,
            });
        } else if let Some(result) = pass.cache().get(id) {
            entries.push(ConditionEntry {
                name,
                satisfied: result.satisfied,
                each_multiple: result.each_multiple,
            });
        }
    }
    Ok(entries)
}

/// Objective income of a player for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectiveReport {
    /// Player name.
    pub player: String,
    /// `(objective, amount)` for each paying objective.
    pub awards: Vec<(String, i32)>,
    /// Sum of the awards.
    pub total: i32,
}

/// Collect a player's national objective income.
///
/// # Errors
///
/// Evaluation failures such as a sub-condition cycle.
pub fn objective_report<R: RandomSource>(
    data: &mut GameData,
    player: PlayerId,
    random: R,
) -> Result<ObjectiveReport> {
    let income = collect_objective_income(data, player, random)?;
    Ok(ObjectiveReport {
        player: data.player_name(player).to_string(),
        awards: income
            .awards
            .iter()
            .map(|award| (award.name.clone(), award.amount))
            .collect(),
        total: income.total(),
    })
}

/// Look up a player by name.
///
/// # Errors
///
/// [`ToolError::UnknownPlayer`] if there is none.
pub fn find_player(data: &GameData, name: &str) -> Result<PlayerId> {
    data.player_id(name)
        .ok_or_else(|| ToolError::UnknownPlayer(name.to_string()))
}

/// Render attachment entries as plain text, one block per attachment.
#[must_use]
pub fn render_attachments(entries: &[AttachmentEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{} [{}] on {} '{}'",
            entry.name, entry.variant, entry.target_kind, entry.target
        );
        for (property, value) in &entry.values {
            let _ = writeln!(out, "    {property} = {value}");
        }
    }
    out
}

/// Render condition entries as a plain table.
#[must_use]
pub fn render_conditions(entries: &[ConditionEntry]) -> String {
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let state = if entry.satisfied { "yes" } else { "no" };
        let _ = write!(out, "{:width$}  {state:>3}", entry.name);
        if entry.each_multiple != 1 {
            let _ = write!(out, "  x{}", entry.each_multiple);
        }
        if RulesAttachment::is_national_objective(&entry.name) {
            out.push_str("  (objective)");
        }
        out.push('\n');
    }
    out
}

/// Render an objective report.
#[must_use]
pub fn render_objectives(report: &ObjectiveReport) -> String {
    let mut out = String::new();
    for (name, amount) in &report.awards {
        let _ = writeln!(out, "{name}: +{amount}");
    }
    let _ = writeln!(out, "{} total: {}", report.player, report.total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbs_test_utils::dice::ScriptedDice;
    use tbs_test_utils::fixtures::sample_game;

    #[test]
    fn test_attachment_entries_follow_build_order() {
        let data = sample_game();
        let entries = attachment_entries(&data);
        assert_eq!(entries[0].target, "infantry");
        assert_eq!(entries[1].target, "armour");
        assert_eq!(entries[1].variant, "UnitAttachment");
        assert!(entries[1]
            .values
            .contains(&("movement".to_string(), "2".to_string())));
        assert!(entries[0]
            .values
            .contains(&("isLandTransportable".to_string(), "true".to_string())));
        let text = render_attachments(&entries);
        assert!(text.contains("territoryAttachment [TerritoryAttachment] on territory 'Italy'"));
    }

    #[test]
    fn test_british_conditions() {
        let data = sample_game();
        let british = find_player(&data, "British").unwrap();
        let entries = condition_entries(&data, british, ScriptedDice::new(&[])).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.satisfied));
        assert!(render_conditions(&entries).contains("userActionAttachmentCoup"));
    }

    #[test]
    fn test_objective_report_totals() {
        let mut data = sample_game();
        let russians = find_player(&data, "Russians").unwrap();
        let report = objective_report(&mut data, russians, ScriptedDice::new(&[])).unwrap();
        assert_eq!(report.total, 8);
        assert!(render_objectives(&report).ends_with("Russians total: 8\n"));
    }

    #[test]
    fn test_unknown_player() {
        let data = sample_game();
        assert!(matches!(
            find_player(&data, "Martians"),
            Err(ToolError::UnknownPlayer(_))
        ));
    }
}
