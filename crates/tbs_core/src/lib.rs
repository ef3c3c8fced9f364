//! # TBS Core
//!
//! Scenario loading and condition evaluation for turn-based strategy maps.
//!
//! This crate contains **only** game logic:
//! - No rendering
//! - No terminal IO
//! - No unseeded randomness (dice come in through [`random::RandomSource`])
//!
//! A scenario is a RON document. Loading it registers the map's entities,
//! expands templated attachment declarations over variable lists, and
//! builds typed attachments on their targets. Conditions built that way are
//! then evaluated against live game state, sharing one cache per pass so
//! that chance rolls happen at most once.
//!
//! ## Crate Structure
//!
//! - [`data`] - Scenario document types (RON)
//! - [`expansion`] - Variables and `foreach` templating
//! - [`attachments`] - Attachment variants and their property schemas
//! - [`builder`] - Builds expanded declarations into attachments
//! - [`game`] - Entity tables and live game state
//! - [`territory_set`] - Territory list and group resolution
//! - [`evaluator`] - Recursive, memoized condition evaluation
//! - [`objectives`] - National objective income
//! - [`loader`] - Document to game data

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod attachments;
pub mod builder;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod expansion;
pub mod game;
pub mod loader;
pub mod objectives;
pub mod random;
pub mod territory_set;

#[cfg(test)]
pub(crate) mod testing;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::attachments::conditions::{ChanceAdjustment, ConditionType};
    pub use crate::attachments::rules::RulesAttachment;
    pub use crate::attachments::{Attachment, AttachmentVariant, TargetKind};
    pub use crate::builder::AttachmentBuilder;
    pub use crate::data::{AttachmentDecl, OptionDecl, ScenarioDocument, VariableDecl};
    pub use crate::error::{Result, ScenarioError};
    pub use crate::evaluator::{
        collect_all_conditions, evaluate_condition, ConditionCache, ConditionResult,
        EvaluationPass,
    };
    pub use crate::expansion::{expand, ExpandedDeclaration, VariableTable};
    pub use crate::game::{AttachmentId, AttachmentTarget, GameData, PlayerId, TerritoryId};
    pub use crate::loader::{build_game_data, load_scenario};
    pub use crate::objectives::{collect_objective_income, national_objectives, ObjectiveIncome};
    pub use crate::random::{RandomSource, SeededDice};
}
