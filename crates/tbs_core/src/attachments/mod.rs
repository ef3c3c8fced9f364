//! Attachment variants and their property schemas.
//!
//! An attachment is a bag of typed properties hung off a game entity. Each
//! variant owns a table mapping scenario option names to setters; the
//! builder feeds option values through [`Attachment::set_property`].

pub mod conditions;
pub mod legacy;
pub mod property;
pub mod relationship_type;
pub mod rules;
pub mod tech_ability;
pub mod territory;
pub mod territory_effect;
pub mod unit;
pub mod user_action;

use std::fmt;
use std::str::FromStr;

use crate::error::{EntityKind, Result, ScenarioError};
use crate::game::GameData;

use conditions::ConditionCore;
use relationship_type::RelationshipTypeAttachment;
use rules::RulesAttachment;
use tech_ability::TechAbilityAttachment;
use territory::TerritoryAttachment;
use territory_effect::TerritoryEffectAttachment;
use unit::UnitAttachment;
use user_action::UserActionAttachment;

/// Conventional name of a territory's property attachment.
pub const TERRITORY_ATTACHMENT_NAME: &str = "territoryAttachment";
/// Conventional name of a unit type's statistics attachment.
pub const UNIT_ATTACHMENT_NAME: &str = "unitAttachment";
/// Conventional name of a relationship type's behaviour attachment.
pub const RELATIONSHIP_TYPE_ATTACHMENT_NAME: &str = "relationshipTypeAttachment";

/// Entity category an attachment declaration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// `unitType` (the default).
    UnitType,
    /// `territory`.
    Territory,
    /// `resource`.
    Resource,
    /// `territoryEffect`.
    TerritoryEffect,
    /// `player`.
    Player,
    /// `relationship`.
    RelationshipType,
    /// `technology`.
    Technology,
}

impl TargetKind {
    /// Scenario spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnitType => "unitType",
            Self::Territory => "territory",
            Self::Resource => "resource",
            Self::TerritoryEffect => "territoryEffect",
            Self::Player => "player",
            Self::RelationshipType => "relationship",
            Self::Technology => "technology",
        }
    }

    /// Entity category used in lookup errors.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::UnitType => EntityKind::UnitType,
            Self::Territory => EntityKind::Territory,
            Self::Resource => EntityKind::Resource,
            Self::TerritoryEffect => EntityKind::TerritoryEffect,
            Self::Player => EntityKind::Player,
            Self::RelationshipType => EntityKind::RelationshipType,
            Self::Technology => EntityKind::Technology,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unitType" => Ok(Self::UnitType),
            "territory" => Ok(Self::Territory),
            "resource" => Ok(Self::Resource),
            "territoryEffect" => Ok(Self::TerritoryEffect),
            "player" => Ok(Self::Player),
            "relationship" => Ok(Self::RelationshipType),
            "technology" => Ok(Self::Technology),
            other => Err(ScenarioError::Format(format!(
                "Type not found to attach to: {other}"
            ))),
        }
    }
}

/// Supported attachment classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentVariant {
    /// Conditions and national objectives.
    Rules,
    /// Player actions gated by conditions.
    UserAction,
    /// Unit type statistics.
    Unit,
    /// Territory properties.
    Territory,
    /// Terrain combat modifiers.
    TerritoryEffect,
    /// Relationship type behaviour.
    RelationshipType,
    /// Technology bonuses.
    TechAbility,
}

impl AttachmentVariant {
    const ALL: [Self; 7] = [
        Self::Rules,
        Self::UserAction,
        Self::Unit,
        Self::Territory,
        Self::TerritoryEffect,
        Self::RelationshipType,
        Self::TechAbility,
    ];

    /// Short class name, as written after the last `.` of a declaration's
    /// `class`.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Rules => "RulesAttachment",
            Self::UserAction => "UserActionAttachment",
            Self::Unit => "UnitAttachment",
            Self::Territory => "TerritoryAttachment",
            Self::TerritoryEffect => "TerritoryEffectAttachment",
            Self::RelationshipType => "RelationshipTypeAttachment",
            Self::TechAbility => "TechAbilityAttachment",
        }
    }

    /// Resolve a declaration's class discriminant. Package prefixes are
    /// ignored.
    pub fn from_class_name(class: &str) -> Result<Self> {
        let short = class.rsplit('.').next().unwrap_or(class);
        Self::ALL
            .into_iter()
            .find(|variant| variant.class_name() == short)
            .ok_or_else(|| ScenarioError::UnknownAttachmentVariant(class.to_string()))
    }

    /// Whether this variant may be attached to entities of `kind`.
    #[must_use]
    pub const fn accepts(self, kind: TargetKind) -> bool {
        matches!(
            (self, kind),
            (Self::Rules | Self::UserAction, TargetKind::Player)
                | (Self::Unit, TargetKind::UnitType)
                | (Self::Territory, TargetKind::Territory)
                | (Self::TerritoryEffect, TargetKind::TerritoryEffect)
                | (Self::RelationshipType, TargetKind::RelationshipType)
                | (Self::TechAbility, TargetKind::Technology)
        )
    }

    /// A fresh attachment with every property at its default.
    #[must_use]
    pub fn instantiate(self) -> Attachment {
        match self {
            Self::Rules => Attachment::Rules(Box::default()),
            Self::UserAction => Attachment::UserAction(UserActionAttachment::default()),
            Self::Unit => Attachment::Unit(UnitAttachment::default()),
            Self::Territory => Attachment::Territory(TerritoryAttachment::default()),
            Self::TerritoryEffect => {
                Attachment::TerritoryEffect(TerritoryEffectAttachment::default())
            }
            Self::RelationshipType => {
                Attachment::RelationshipType(RelationshipTypeAttachment::default())
            }
            Self::TechAbility => Attachment::TechAbility(TechAbilityAttachment::default()),
        }
    }

    /// Option names accepted by this variant.
    #[must_use]
    pub fn property_names(self) -> Vec<&'static str> {
        match self {
            Self::Rules => RulesAttachment::property_names().collect(),
            Self::UserAction => UserActionAttachment::property_names().collect(),
            Self::Unit => UnitAttachment::property_names().collect(),
            Self::Territory => TerritoryAttachment::property_names().collect(),
            Self::TerritoryEffect => TerritoryEffectAttachment::property_names().collect(),
            Self::RelationshipType => RelationshipTypeAttachment::property_names().collect(),
            Self::TechAbility => TechAbilityAttachment::property_names().collect(),
        }
    }
}

impl fmt::Display for AttachmentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// A built attachment of any supported variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Rules (condition) attachment.
    Rules(Box<RulesAttachment>),
    /// User action.
    UserAction(UserActionAttachment),
    /// Unit statistics.
    Unit(UnitAttachment),
    /// Territory properties.
    Territory(TerritoryAttachment),
    /// Territory effect.
    TerritoryEffect(TerritoryEffectAttachment),
    /// Relationship type behaviour.
    RelationshipType(RelationshipTypeAttachment),
    /// Technology bonuses.
    TechAbility(TechAbilityAttachment),
}

impl Attachment {
    /// The variant of this attachment.
    #[must_use]
    pub const fn variant(&self) -> AttachmentVariant {
        match self {
            Self::Rules(_) => AttachmentVariant::Rules,
            Self::UserAction(_) => AttachmentVariant::UserAction,
            Self::Unit(_) => AttachmentVariant::Unit,
            Self::Territory(_) => AttachmentVariant::Territory,
            Self::TerritoryEffect(_) => AttachmentVariant::TerritoryEffect,
            Self::RelationshipType(_) => AttachmentVariant::RelationshipType,
            Self::TechAbility(_) => AttachmentVariant::TechAbility,
        }
    }

    /// Apply one option through the variant's property schema.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownProperty`] if the option is not in the schema,
    /// otherwise whatever the setter rejects.
    pub fn set_property(
        &mut self,
        name: &str,
        value: &str,
        data: &GameData,
        attachment: &str,
    ) -> Result<()> {
        match self {
            Self::Rules(a) => a.set_property(name, value, data, attachment),
            Self::UserAction(a) => a.set_property(name, value, data, attachment),
            Self::Unit(a) => a.set_property(name, value, data, attachment),
            Self::Territory(a) => a.set_property(name, value, data, attachment),
            Self::TerritoryEffect(a) => a.set_property(name, value, data, attachment),
            Self::RelationshipType(a) => a.set_property(name, value, data, attachment),
            Self::TechAbility(a) => a.set_property(name, value, data, attachment),
        }
    }

    /// Condition settings, for the variants that are conditions.
    #[must_use]
    pub fn condition(&self) -> Option<&ConditionCore> {
        match self {
            Self::Rules(rules) => Some(&rules.core),
            Self::UserAction(action) => Some(&action.core),
            _ => None,
        }
    }

    /// Mutable condition settings.
    pub fn condition_mut(&mut self) -> Option<&mut ConditionCore> {
        match self {
            Self::Rules(rules) => Some(&mut rules.core),
            Self::UserAction(action) => Some(&mut action.core),
            _ => None,
        }
    }

    /// The rules attachment, if this is one.
    #[must_use]
    pub fn as_rules(&self) -> Option<&RulesAttachment> {
        match self {
            Self::Rules(rules) => Some(&**rules),
            _ => None,
        }
    }
}
