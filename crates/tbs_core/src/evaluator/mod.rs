//! Recursive, memoized evaluation of condition attachments.
//!
//! An [`EvaluationPass`] walks the sub-condition graph from the conditions it
//! is asked about, caching every result it computes. Handing the cache of
//! one pass to the next (see [`EvaluationPass::with_cache`]) guarantees that
//! a condition is evaluated, and its chance rolled, at most once across a
//! batch.
//!
//! A pass only reads the game data. Changes to adaptive chances are
//! collected as [`ChanceAdjustment`]s and returned by
//! [`EvaluationPass::finish`] for the caller to apply.

mod leaves;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::attachments::conditions::{Chance, ChanceAdjustment, ConditionCore};
use crate::attachments::rules::RulesAttachment;
use crate::attachments::Attachment;
use crate::error::{EntityKind, Result, ScenarioError};
use crate::game::{AttachmentId, GameData, PlayerId};
use crate::random::RandomSource;

/// Outcome of one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionResult {
    /// Final result, after chance and inversion.
    pub satisfied: bool,
    /// Scale factor for paired rewards; 1 unless the condition counts each
    /// match.
    pub each_multiple: u32,
}

/// Results of conditions already evaluated, keyed by condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionCache {
    results: BTreeMap<AttachmentId, ConditionResult>,
}

impl ConditionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result of a condition.
    #[must_use]
    pub fn get(&self, condition: AttachmentId) -> Option<ConditionResult> {
        self.results.get(&condition).copied()
    }

    /// Whether a condition has been evaluated.
    #[must_use]
    pub fn contains(&self, condition: AttachmentId) -> bool {
        self.results.contains_key(&condition)
    }

    /// Cached boolean of a condition; `false` if never evaluated.
    #[must_use]
    pub fn is_satisfied(&self, condition: AttachmentId) -> bool {
        self.get(condition).is_some_and(|r| r.satisfied)
    }

    /// Store a result.
    pub fn insert(&mut self, condition: AttachmentId, result: ConditionResult) {
        self.results.insert(condition, result);
    }

    /// Number of cached conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Every cached result.
    pub fn iter(&self) -> impl Iterator<Item = (AttachmentId, ConditionResult)> + '_ {
        self.results.iter().map(|(id, result)| (*id, *result))
    }
}

/// Every condition reachable from `roots` through sub-condition links,
/// roots included, in discovery order.
#[must_use]
pub fn collect_all_conditions(data: &GameData, roots: &[AttachmentId]) -> Vec<AttachmentId> {
    let mut seen = BTreeSet::new();
    let mut ordered = Vec::new();
    let mut stack: Vec<AttachmentId> = roots.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        ordered.push(id);
        if let Some(core) = data.attachment(id).and_then(|a| a.attachment.condition()) {
            stack.extend(core.linked.iter().rev().copied());
        }
    }
    ordered
}

/// One evaluation pass over the condition graph.
#[derive(Debug)]
pub struct EvaluationPass<'a, R: RandomSource> {
    data: &'a GameData,
    random: R,
    cache: ConditionCache,
    in_progress: BTreeSet<AttachmentId>,
    adjustments: Vec<ChanceAdjustment>,
}

impl<'a, R: RandomSource> EvaluationPass<'a, R> {
    /// A pass with an empty cache.
    pub fn new(data: &'a GameData, random: R) -> Self {
        Self::with_cache(data, random, ConditionCache::new())
    }

    /// A pass that reuses results already in `cache`.
    pub fn with_cache(data: &'a GameData, random: R, cache: ConditionCache) -> Self {
        Self {
            data,
            random,
            cache,
            in_progress: BTreeSet::new(),
            adjustments: Vec::new(),
        }
    }

    /// Evaluate a rules attachment, reusing or filling the cache.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::CyclicCondition`] if the condition is reachable from
    /// itself, [`ScenarioError::MissingEntity`] if `condition` is not a rules
    /// attachment.
    pub fn evaluate(&mut self, condition: AttachmentId) -> Result<ConditionResult> {
        if let Some(result) = self.cache.get(condition) {
            return Ok(result);
        }
        let data = self.data;
        let name = data.attachment_name(condition);
        if !self.in_progress.insert(condition) {
            return Err(ScenarioError::CyclicCondition(name.to_string()));
        }
        let instance = data
            .attachment(condition)
            .ok_or_else(|| ScenarioError::missing(EntityKind::Condition, name))?;
        let (Attachment::Rules(rules), Some(attached)) =
            (&instance.attachment, instance.target.player())
        else {
            return Err(ScenarioError::missing(EntityKind::Condition, name));
        };

        let result = self.evaluate_rules(condition, rules, attached);
        self.in_progress.remove(&condition);
        let result = result?;
        debug!(
            condition = %name,
            satisfied = result.satisfied,
            each_multiple = result.each_multiple,
            "evaluated condition"
        );
        self.cache.insert(condition, result);
        Ok(result)
    }

    /// Boolean result of a condition.
    ///
    /// # Errors
    ///
    /// See [`EvaluationPass::evaluate`].
    pub fn is_satisfied(&mut self, condition: AttachmentId) -> Result<bool> {
        Ok(self.evaluate(condition)?.satisfied)
    }

    /// Evaluate a batch of conditions and everything they depend on into
    /// the cache. User actions in the batch contribute their sub-conditions
    /// only.
    ///
    /// # Errors
    ///
    /// See [`EvaluationPass::evaluate`].
    pub fn test_all(&mut self, conditions: &[AttachmentId]) -> Result<()> {
        let data = self.data;
        for condition in collect_all_conditions(data, conditions) {
            if data.rules(condition).is_some() {
                self.evaluate(condition)?;
            }
        }
        Ok(())
    }

    /// Whether a user action may be performed: its sub-conditions combined
    /// per its condition type, then inverted if asked. An action with no
    /// conditions is always available.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::MissingEntity`] if `action` is not a user action,
    /// otherwise see [`EvaluationPass::evaluate`].
    pub fn can_perform(&mut self, action: AttachmentId) -> Result<bool> {
        let data = self.data;
        let core = data
            .user_action(action)
            .map(|a| &a.core)
            .ok_or_else(|| {
                ScenarioError::missing(EntityKind::Condition, data.attachment_name(action))
            })?;
        if core.linked.is_empty() {
            return Ok(true);
        }
        Ok(self.combine_sub_conditions(core)? != core.invert)
    }

    /// Results gathered so far.
    #[must_use]
    pub fn cache(&self) -> &ConditionCache {
        &self.cache
    }

    /// Chance changes produced so far.
    #[must_use]
    pub fn adjustments(&self) -> &[ChanceAdjustment] {
        &self.adjustments
    }

    /// End the pass, returning its cache and chance changes.
    pub fn finish(self) -> (ConditionCache, Vec<ChanceAdjustment>) {
        (self.cache, self.adjustments)
    }

    fn combine_sub_conditions(&mut self, core: &ConditionCore) -> Result<bool> {
        let mut results = Vec::with_capacity(core.linked.len());
        for &sub in &core.linked {
            results.push(self.evaluate(sub)?.satisfied);
        }
        Ok(core.condition_type.combine(results))
    }

    fn evaluate_rules(
        &mut self,
        id: AttachmentId,
        rules: &RulesAttachment,
        attached: PlayerId,
    ) -> Result<ConditionResult> {
        let mut met = true;
        if !rules.core.linked.is_empty() {
            met = self.combine_sub_conditions(&rules.core)?;
        }
        let mut each_multiple = 1;
        if met {
            let outcome = leaves::check(self.data, rules, attached)?;
            met = outcome.met;
            if let Some(each) = outcome.each_multiple {
                each_multiple = each;
            }
        }
        met = self.chance_gate(id, &rules.core, met);
        Ok(ConditionResult {
            satisfied: met != rules.core.invert,
            each_multiple: if rules.count_each { each_multiple } else { 1 },
        })
    }

    fn chance_gate(&mut self, id: AttachmentId, core: &ConditionCore, met: bool) -> bool {
        if !met || !core.has_chance_gate() {
            return met;
        }
        let Chance { hit, sides } = core.chance;
        let success = if sides <= 0 || hit >= sides {
            true
        } else if hit <= 0 {
            false
        } else {
            let name = self.data.attachment_name(id);
            let annotation = format!("Attempting the Condition: {name}");
            let roll = self.random.random(sides.unsigned_abs(), &annotation) + 1;
            let success = roll <= hit.unsigned_abs();
            info!(
                condition = %name,
                hit,
                sides,
                roll,
                success,
                "chance roll"
            );
            success
        };
        if let Some(new_hit) = core.adjusted_hit(success) {
            self.adjustments.push(ChanceAdjustment {
                condition: id,
                hit: new_hit,
            });
        }
        success
    }
}

/// Evaluate one condition with a fresh cache.
///
/// # Errors
///
/// See [`EvaluationPass::evaluate`].
pub fn evaluate_condition<R: RandomSource>(
    data: &GameData,
    condition: AttachmentId,
    random: R,
) -> Result<(ConditionResult, Vec<ChanceAdjustment>)> {
    let mut pass = EvaluationPass::new(data, random);
    let result = pass.evaluate(condition)?;
    let (_, adjustments) = pass.finish();
    Ok((result, adjustments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{condition_id, scenario, ScriptedDice};

    const BASE: &str = r#"
        AttachmentDecl(
            name: "conditionAttachmentOwnsTwo",
            attach_to: "Germans",
            target_kind: "player",
            class: "RulesAttachment",
            options: [
                OptionDecl(name: "directOwnershipTerritories", value: "Germany:Poland:Russia", count: Some("2")),
            ],
        ),
        AttachmentDecl(
            name: "conditionAttachmentRadar",
            attach_to: "Germans",
            target_kind: "player",
            class: "RulesAttachment",
            options: [OptionDecl(name: "techs", value: "1:radar")],
        )
    "#;

    fn with_base(extra: &str) -> GameData {
        scenario(&format!("[{BASE}, {extra}]"))
    }

    #[test]
    fn test_and_of_ownership_and_tech() {
        let mut data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentBoth",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "conditions", value: "conditionAttachmentOwnsTwo:conditionAttachmentRadar")],
            )"#,
        );
        let both = condition_id(&data, "Germans", "conditionAttachmentBoth");
        let germans = data.require_player("Germans").unwrap();
        let radar = data.require_technology("radar").unwrap();
        data.grant_tech(germans, radar);

        let mut pass = EvaluationPass::new(&data, ScriptedDice::new(&[]));
        assert!(pass.is_satisfied(both).unwrap());

        let poland = data.territory_id("Poland").unwrap();
        let russians = data.require_player("Russians").unwrap();
        data.set_owner(poland, Some(russians));
        let mut pass = EvaluationPass::new(&data, ScriptedDice::new(&[]));
        assert!(!pass.is_satisfied(both).unwrap());
    }

    #[test]
    fn test_or_and_xor() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentEither",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [
                    OptionDecl(name: "conditions", value: "conditionAttachmentOwnsTwo:conditionAttachmentRadar"),
                    OptionDecl(name: "conditionType", value: "XOR"),
                ],
            )"#,
        );
        let either = condition_id(&data, "Germans", "conditionAttachmentEither");
        // Owns two territories, has no radar: exactly one holds.
        let mut pass = EvaluationPass::new(&data, ScriptedDice::new(&[]));
        assert!(pass.is_satisfied(either).unwrap());
        assert_eq!(pass.cache().len(), 3);
    }

    #[test]
    fn test_invert_negates_leaf_result() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentNotRadar",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [
                    OptionDecl(name: "techs", value: "1:radar"),
                    OptionDecl(name: "invert", value: "true"),
                ],
            )"#,
        );
        let radar = condition_id(&data, "Germans", "conditionAttachmentRadar");
        let not_radar = condition_id(&data, "Germans", "conditionAttachmentNotRadar");
        let mut pass = EvaluationPass::new(&data, ScriptedDice::new(&[]));
        assert_eq!(
            pass.is_satisfied(radar).unwrap(),
            !pass.is_satisfied(not_radar).unwrap()
        );
    }

    #[test]
    fn test_shared_sub_condition_rolls_once() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentLucky",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "chance", value: "3:6")],
            ),
            AttachmentDecl(
                name: "conditionAttachmentA",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "conditions", value: "conditionAttachmentLucky")],
            ),
            AttachmentDecl(
                name: "conditionAttachmentB",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "conditions", value: "conditionAttachmentLucky:conditionAttachmentOwnsTwo")],
            )"#,
        );
        let a = condition_id(&data, "Germans", "conditionAttachmentA");
        let b = condition_id(&data, "Germans", "conditionAttachmentB");
        let mut dice = ScriptedDice::new(&[1]);
        let mut pass = EvaluationPass::new(&data, &mut dice);
        pass.test_all(&[a, b]).unwrap();
        let (cache, _) = pass.finish();
        assert_eq!(dice.calls(), 1);
        // Rolled 1 + 1 = 2 <= 3.
        assert!(cache.is_satisfied(a));
        assert!(cache.is_satisfied(b));

        let mut pass = EvaluationPass::with_cache(&data, &mut dice, cache);
        assert!(pass.is_satisfied(a).unwrap());
        assert_eq!(dice.calls(), 1);
    }

    #[test]
    fn test_chance_boundaries_never_roll() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentCertain",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "chance", value: "6:6")],
            ),
            AttachmentDecl(
                name: "conditionAttachmentNever",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [OptionDecl(name: "chance", value: "0:6")],
            )"#,
        );
        let certain = condition_id(&data, "Germans", "conditionAttachmentCertain");
        let never = condition_id(&data, "Germans", "conditionAttachmentNever");
        let mut dice = ScriptedDice::new(&[]);
        let mut pass = EvaluationPass::new(&data, &mut dice);
        assert!(pass.is_satisfied(certain).unwrap());
        assert!(!pass.is_satisfied(never).unwrap());
        drop(pass);
        assert_eq!(dice.calls(), 0);
    }

    #[test]
    fn test_chance_adjustment_on_failure() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "conditionAttachmentGrowing",
                attach_to: "Germans",
                target_kind: "player",
                class: "RulesAttachment",
                options: [
                    OptionDecl(name: "chance", value: "1:6"),
                    OptionDecl(name: "chanceIncrementOnFailure", value: "1"),
                ],
            )"#,
        );
        let growing = condition_id(&data, "Germans", "conditionAttachmentGrowing");
        let (result, adjustments) =
            evaluate_condition(&data, growing, ScriptedDice::new(&[5])).unwrap();
        assert!(!result.satisfied);
        assert_eq!(
            adjustments,
            vec![ChanceAdjustment {
                condition: growing,
                hit: 2
            }]
        );

        let mut data = data;
        data.apply_chance_adjustments(&adjustments);
        assert_eq!(data.rules(growing).unwrap().core.chance.hit, 2);
    }

    #[test]
    fn test_cycle_is_reported() {
        let data = scenario(
            r#"[
                AttachmentDecl(
                    name: "conditionAttachmentPing",
                    attach_to: "Germans",
                    target_kind: "player",
                    class: "RulesAttachment",
                    options: [OptionDecl(name: "conditions", value: "conditionAttachmentPong")],
                ),
                AttachmentDecl(
                    name: "conditionAttachmentPong",
                    attach_to: "Germans",
                    target_kind: "player",
                    class: "RulesAttachment",
                    options: [OptionDecl(name: "conditions", value: "conditionAttachmentPing")],
                ),
            ]"#,
        );
        let ping = condition_id(&data, "Germans", "conditionAttachmentPing");
        let err = EvaluationPass::new(&data, ScriptedDice::new(&[]))
            .evaluate(ping)
            .unwrap_err();
        assert!(matches!(err, ScenarioError::CyclicCondition(_)));
        assert_eq!(collect_all_conditions(&data, &[ping]).len(), 2);
    }

    #[test]
    fn test_user_action_eligibility() {
        let data = with_base(
            r#"AttachmentDecl(
                name: "userActionBribe",
                attach_to: "Germans",
                target_kind: "player",
                class: "UserActionAttachment",
                options: [
                    OptionDecl(name: "conditions", value: "conditionAttachmentRadar"),
                    OptionDecl(name: "invert", value: "true"),
                ],
            ),
            AttachmentDecl(
                name: "userActionFree",
                attach_to: "Germans",
                target_kind: "player",
                class: "UserActionAttachment",
            )"#,
        );
        let bribe = condition_id(&data, "Germans", "userActionBribe");
        let free = condition_id(&data, "Germans", "userActionFree");
        let mut pass = EvaluationPass::new(&data, ScriptedDice::new(&[]));
        assert!(pass.can_perform(bribe).unwrap());
        assert!(pass.can_perform(free).unwrap());
        assert!(pass.evaluate(bribe).is_err());
    }
}
