//! In-memory game model consulted by the attachment builder and the
//! condition evaluator.
//!
//! [`GameData`] owns every entity table, the attachment arena and the live
//! game state (ownership, units, relationships, technologies, battles and the
//! current round). Entities refer to their attachments by [`AttachmentId`],
//! so a condition can be shared by many parents without ownership cycles.

pub mod battles;
pub mod ids;
pub mod properties;
pub mod registry;
pub mod relationships;

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::attachments::conditions::ChanceAdjustment;
use crate::attachments::relationship_type::RelationshipTypeAttachment;
use crate::attachments::rules::RulesAttachment;
use crate::attachments::territory::TerritoryAttachment;
use crate::attachments::unit::UnitAttachment;
use crate::attachments::user_action::UserActionAttachment;
use crate::attachments::{
    Attachment, TargetKind, RELATIONSHIP_TYPE_ATTACHMENT_NAME, TERRITORY_ATTACHMENT_NAME,
    UNIT_ATTACHMENT_NAME,
};
use crate::error::{EntityKind, Result, ScenarioError};

pub use battles::{BattleRecord, BattleRecordList, BattleResult};
pub use ids::{
    AttachmentId, PlayerId, RelationshipTypeId, ResourceId, TechId, TerritoryEffectId,
    TerritoryId, UnitTypeId,
};
pub use properties::GameProperties;
pub use registry::{Named, Registry};
pub use relationships::{
    Archetype, Relationship, RelationshipTracker, DEFAULT_ALLIED_RELATION, DEFAULT_WAR_RELATION,
    NULL_RELATION, SELF_RELATION,
};

/// Attachments of one entity, keyed by attachment name.
pub type AttachmentMap = BTreeMap<String, AttachmentId>;

/// A player (nation).
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique name.
    pub name: String,
    /// Attached rules, conditions and user actions.
    pub attachments: AttachmentMap,
}

/// A land or sea zone.
#[derive(Debug, Clone)]
pub struct Territory {
    /// Unique name.
    pub name: String,
    /// Sea zone.
    pub water: bool,
    /// Current owner, `None` for neutral/unowned.
    pub owner: Option<PlayerId>,
    /// Owner at game start, before any `originalOwner` override.
    pub initial_owner: Option<PlayerId>,
    /// Units currently in the territory.
    pub units: Vec<Unit>,
    /// Attachments (at most one `territoryAttachment` is meaningful).
    pub attachments: AttachmentMap,
}

/// One unit on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Type of the unit.
    pub unit_type: UnitTypeId,
    /// Owning player.
    pub owner: PlayerId,
}

/// A plain named entity that only carries attachments.
#[derive(Debug, Clone)]
pub struct NamedEntity {
    /// Unique name.
    pub name: String,
    /// Attachments by name.
    pub attachments: AttachmentMap,
}

impl NamedEntity {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attachments: AttachmentMap::new(),
        }
    }
}

/// A diplomatic relationship type.
#[derive(Debug, Clone)]
pub struct RelationshipType {
    /// Unique name.
    pub name: String,
    /// Archetype used when no `relationshipTypeAttachment` overrides it.
    pub archetype: Archetype,
    /// Attachments by name.
    pub attachments: AttachmentMap,
}

macro_rules! impl_named {
    ($($ty:ty),*) => {
        $(impl Named for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

impl_named!(Player, Territory, NamedEntity, RelationshipType);

/// The entity an attachment hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttachmentTarget {
    /// A unit type.
    UnitType(UnitTypeId),
    /// A territory.
    Territory(TerritoryId),
    /// A resource.
    Resource(ResourceId),
    /// A territory effect.
    TerritoryEffect(TerritoryEffectId),
    /// A player.
    Player(PlayerId),
    /// A relationship type.
    RelationshipType(RelationshipTypeId),
    /// A technology.
    Technology(TechId),
}

impl AttachmentTarget {
    /// Category of the target.
    #[must_use]
    pub const fn kind(self) -> TargetKind {
        match self {
            Self::UnitType(_) => TargetKind::UnitType,
            Self::Territory(_) => TargetKind::Territory,
            Self::Resource(_) => TargetKind::Resource,
            Self::TerritoryEffect(_) => TargetKind::TerritoryEffect,
            Self::Player(_) => TargetKind::Player,
            Self::RelationshipType(_) => TargetKind::RelationshipType,
            Self::Technology(_) => TargetKind::Technology,
        }
    }

    /// The player this attachment belongs to, if it is attached to one.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Self::Player(id) => Some(id),
            _ => None,
        }
    }
}

/// A built attachment living in the arena.
#[derive(Debug, Clone)]
pub struct AttachmentInstance {
    /// Concrete (post-foreach) name.
    pub name: String,
    /// Owning entity.
    pub target: AttachmentTarget,
    /// Typed property values.
    pub attachment: Attachment,
}

/// Audit entry: the exact option values applied to one attachment, in the
/// order the scenario declared them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedAttachment {
    /// Arena index of the attachment.
    pub attachment: AttachmentId,
    /// Attachment name.
    pub name: String,
    /// Owning entity.
    pub target: AttachmentTarget,
    /// `(property, final value)` pairs.
    pub values: Vec<(String, String)>,
}

/// The loaded game: entity tables, attachments and live state.
#[derive(Debug, Clone)]
pub struct GameData {
    name: String,
    players: Registry<Player>,
    territories: Registry<Territory>,
    unit_types: Registry<NamedEntity>,
    resources: Registry<NamedEntity>,
    technologies: Registry<NamedEntity>,
    relationship_types: Registry<RelationshipType>,
    territory_effects: Registry<NamedEntity>,
    attachments: Vec<AttachmentInstance>,
    applied: Vec<AppliedAttachment>,
    relationships: RelationshipTracker,
    battles: BattleRecordList,
    techs: BTreeMap<PlayerId, BTreeSet<TechId>>,
    properties: GameProperties,
    round: u32,
}

impl GameData {
    /// Create an empty game with the built-in relationship types registered.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let built_in = relationships::BUILT_IN_RELATIONSHIP_TYPES
            .iter()
            .map(|(name, archetype)| RelationshipType {
                name: (*name).to_string(),
                archetype: *archetype,
                attachments: AttachmentMap::new(),
            })
            .collect();
        Self {
            name: name.into(),
            players: Registry::new(EntityKind::Player),
            territories: Registry::new(EntityKind::Territory),
            unit_types: Registry::new(EntityKind::UnitType),
            resources: Registry::new(EntityKind::Resource),
            technologies: Registry::new(EntityKind::Technology),
            relationship_types: Registry::from_distinct(EntityKind::RelationshipType, built_in),
            territory_effects: Registry::new(EntityKind::TerritoryEffect),
            attachments: Vec::new(),
            applied: Vec::new(),
            relationships: RelationshipTracker::new(),
            battles: BattleRecordList::new(),
            techs: BTreeMap::new(),
            properties: GameProperties::new(),
            round: 1,
        }
    }

    /// Scenario (map) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ---- registration ----------------------------------------------------

    /// Register a player.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId> {
        self.players
            .insert(Player {
                name: name.into(),
                attachments: AttachmentMap::new(),
            })
            .map(PlayerId)
    }

    /// Register a territory.
    pub fn add_territory(&mut self, name: impl Into<String>, water: bool) -> Result<TerritoryId> {
        self.territories
            .insert(Territory {
                name: name.into(),
                water,
                owner: None,
                initial_owner: None,
                units: Vec::new(),
                attachments: AttachmentMap::new(),
            })
            .map(TerritoryId)
    }

    /// Register a unit type.
    pub fn add_unit_type(&mut self, name: impl Into<String>) -> Result<UnitTypeId> {
        self.unit_types.insert(NamedEntity::new(name)).map(UnitTypeId)
    }

    /// Register a resource.
    pub fn add_resource(&mut self, name: impl Into<String>) -> Result<ResourceId> {
        self.resources.insert(NamedEntity::new(name)).map(ResourceId)
    }

    /// Register a technology.
    pub fn add_technology(&mut self, name: impl Into<String>) -> Result<TechId> {
        self.technologies.insert(NamedEntity::new(name)).map(TechId)
    }

    /// Register a scenario relationship type. Its archetype defaults to war
    /// until a `relationshipTypeAttachment` says otherwise.
    pub fn add_relationship_type(&mut self, name: impl Into<String>) -> Result<RelationshipTypeId> {
        self.relationship_types
            .insert(RelationshipType {
                name: name.into(),
                archetype: Archetype::War,
                attachments: AttachmentMap::new(),
            })
            .map(RelationshipTypeId)
    }

    /// Register a territory effect.
    pub fn add_territory_effect(&mut self, name: impl Into<String>) -> Result<TerritoryEffectId> {
        self.territory_effects
            .insert(NamedEntity::new(name))
            .map(TerritoryEffectId)
    }

    // ---- lookups -----------------------------------------------------------

    /// Player by name.
    #[must_use]
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.players.lookup(name).map(PlayerId)
    }

    /// Player by name, or a missing-entity error.
    pub fn require_player(&self, name: &str) -> Result<PlayerId> {
        self.players.require(name).map(PlayerId)
    }

    /// Territory by name.
    #[must_use]
    pub fn territory_id(&self, name: &str) -> Option<TerritoryId> {
        self.territories.lookup(name).map(TerritoryId)
    }

    /// Territory by name, or a missing-entity error.
    pub fn require_territory(&self, name: &str) -> Result<TerritoryId> {
        self.territories.require(name).map(TerritoryId)
    }

    /// Unit type by name, or a missing-entity error.
    pub fn require_unit_type(&self, name: &str) -> Result<UnitTypeId> {
        self.unit_types.require(name).map(UnitTypeId)
    }

    /// Resource by name, or a missing-entity error.
    pub fn require_resource(&self, name: &str) -> Result<ResourceId> {
        self.resources.require(name).map(ResourceId)
    }

    /// Technology by name, or a missing-entity error.
    pub fn require_technology(&self, name: &str) -> Result<TechId> {
        self.technologies.require(name).map(TechId)
    }

    /// Relationship type by name.
    #[must_use]
    pub fn relationship_type_id(&self, name: &str) -> Option<RelationshipTypeId> {
        self.relationship_types.lookup(name).map(RelationshipTypeId)
    }

    /// Relationship type by name, or a missing-entity error.
    pub fn require_relationship_type(&self, name: &str) -> Result<RelationshipTypeId> {
        self.relationship_types
            .require(name)
            .map(RelationshipTypeId)
    }

    /// Territory effect by name, or a missing-entity error.
    pub fn require_territory_effect(&self, name: &str) -> Result<TerritoryEffectId> {
        self.territory_effects
            .require(name)
            .map(TerritoryEffectId)
    }

    /// Resolve an attachment target by category and name.
    pub fn resolve_target(&self, kind: TargetKind, name: &str) -> Result<AttachmentTarget> {
        Ok(match kind {
            TargetKind::UnitType => AttachmentTarget::UnitType(self.require_unit_type(name)?),
            TargetKind::Territory => AttachmentTarget::Territory(self.require_territory(name)?),
            TargetKind::Resource => AttachmentTarget::Resource(self.require_resource(name)?),
            TargetKind::TerritoryEffect => {
                AttachmentTarget::TerritoryEffect(self.require_territory_effect(name)?)
            }
            TargetKind::Player => AttachmentTarget::Player(self.require_player(name)?),
            TargetKind::RelationshipType => {
                AttachmentTarget::RelationshipType(self.require_relationship_type(name)?)
            }
            TargetKind::Technology => {
                AttachmentTarget::Technology(self.require_technology(name)?)
            }
        })
    }

    /// All players, in declaration order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.players.iter().map(|(id, p)| (PlayerId(id), p))
    }

    /// A player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    /// Name of a player, or `"?"` for an unknown index.
    #[must_use]
    pub fn player_name(&self, id: PlayerId) -> &str {
        self.player(id).map_or("?", |p| p.name.as_str())
    }

    /// All territories, in declaration order.
    pub fn territories(&self) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.territories.iter().map(|(id, t)| (TerritoryId(id), t))
    }

    /// A territory.
    #[must_use]
    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(id.0)
    }

    /// Number of territories on the map.
    #[must_use]
    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    /// Name of a unit type, or `"?"`.
    #[must_use]
    pub fn unit_type_name(&self, id: UnitTypeId) -> &str {
        self.unit_types.get(id.0).map_or("?", |u| u.name.as_str())
    }

    /// Name of a technology, or `"?"`.
    #[must_use]
    pub fn technology_name(&self, id: TechId) -> &str {
        self.technologies.get(id.0).map_or("?", |t| t.name.as_str())
    }

    /// Name of an attachment target.
    #[must_use]
    pub fn target_name(&self, target: AttachmentTarget) -> &str {
        let name = match target {
            AttachmentTarget::UnitType(id) => self.unit_types.get(id.0).map(|e| e.name.as_str()),
            AttachmentTarget::Territory(id) => {
                self.territories.get(id.0).map(|e| e.name.as_str())
            }
            AttachmentTarget::Resource(id) => self.resources.get(id.0).map(|e| e.name.as_str()),
            AttachmentTarget::TerritoryEffect(id) => {
                self.territory_effects.get(id.0).map(|e| e.name.as_str())
            }
            AttachmentTarget::Player(id) => self.players.get(id.0).map(|e| e.name.as_str()),
            AttachmentTarget::RelationshipType(id) => {
                self.relationship_types.get(id.0).map(|e| e.name.as_str())
            }
            AttachmentTarget::Technology(id) => {
                self.technologies.get(id.0).map(|e| e.name.as_str())
            }
        };
        name.unwrap_or("?")
    }

    // ---- attachments -------------------------------------------------------

    /// Store an attachment and hang it off its target under `name`.
    ///
    /// A second attachment with the same name on the same entity replaces
    /// the first, reusing its arena slot and id.
    pub fn attach(
        &mut self,
        name: impl Into<String>,
        target: AttachmentTarget,
        attachment: Attachment,
    ) -> Result<AttachmentId> {
        let name = name.into();
        let next = u32::try_from(self.attachments.len()).map(AttachmentId).map_err(|_| {
            ScenarioError::Format("too many attachments".to_string())
        })?;
        let map = self.attachment_map_mut(target)?;
        let previous = map.get(&name).copied();
        if previous.is_none() {
            map.insert(name.clone(), next);
        }
        let instance = AttachmentInstance {
            name,
            target,
            attachment,
        };
        match previous.and_then(|id| self.attachments.get_mut(id.0 as usize).map(|slot| (id, slot))) {
            Some((id, slot)) => {
                warn!(
                    attachment = %instance.name,
                    id = id.0,
                    "attachment name reused on the same entity; replacing"
                );
                *slot = instance;
                Ok(id)
            }
            None => {
                self.attachments.push(instance);
                Ok(next)
            }
        }
    }

    fn attachment_map_mut(&mut self, target: AttachmentTarget) -> Result<&mut AttachmentMap> {
        let name = format!("{target:?}");
        let map = match target {
            AttachmentTarget::UnitType(id) => {
                self.unit_types.get_mut(id.0).map(|e| &mut e.attachments)
            }
            AttachmentTarget::Territory(id) => {
                self.territories.get_mut(id.0).map(|e| &mut e.attachments)
            }
            AttachmentTarget::Resource(id) => {
                self.resources.get_mut(id.0).map(|e| &mut e.attachments)
            }
            AttachmentTarget::TerritoryEffect(id) => {
                self.territory_effects.get_mut(id.0).map(|e| &mut e.attachments)
            }
            AttachmentTarget::Player(id) => self.players.get_mut(id.0).map(|e| &mut e.attachments),
            AttachmentTarget::RelationshipType(id) => {
                self.relationship_types.get_mut(id.0).map(|e| &mut e.attachments)
            }
            AttachmentTarget::Technology(id) => {
                self.technologies.get_mut(id.0).map(|e| &mut e.attachments)
            }
        };
        map.ok_or_else(|| ScenarioError::missing(target.kind().entity_kind(), name))
    }

    fn attachment_map(&self, target: AttachmentTarget) -> Option<&AttachmentMap> {
        match target {
            AttachmentTarget::UnitType(id) => self.unit_types.get(id.0).map(|e| &e.attachments),
            AttachmentTarget::Territory(id) => {
                self.territories.get(id.0).map(|e| &e.attachments)
            }
            AttachmentTarget::Resource(id) => self.resources.get(id.0).map(|e| &e.attachments),
            AttachmentTarget::TerritoryEffect(id) => {
                self.territory_effects.get(id.0).map(|e| &e.attachments)
            }
            AttachmentTarget::Player(id) => self.players.get(id.0).map(|e| &e.attachments),
            AttachmentTarget::RelationshipType(id) => {
                self.relationship_types.get(id.0).map(|e| &e.attachments)
            }
            AttachmentTarget::Technology(id) => {
                self.technologies.get(id.0).map(|e| &e.attachments)
            }
        }
    }

    /// Attachment of an entity by name.
    #[must_use]
    pub fn attachment_named(&self, target: AttachmentTarget, name: &str) -> Option<AttachmentId> {
        self.attachment_map(target)
            .and_then(|map| map.get(name))
            .copied()
    }

    /// Every attachment of an entity, by name.
    pub fn attachments_of(
        &self,
        target: AttachmentTarget,
    ) -> impl Iterator<Item = (&str, AttachmentId)> {
        self.attachment_map(target)
            .into_iter()
            .flat_map(|map| map.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    /// An attachment from the arena.
    #[must_use]
    pub fn attachment(&self, id: AttachmentId) -> Option<&AttachmentInstance> {
        self.attachments.get(id.0 as usize)
    }

    /// A mutable attachment from the arena.
    pub fn attachment_mut(&mut self, id: AttachmentId) -> Option<&mut AttachmentInstance> {
        self.attachments.get_mut(id.0 as usize)
    }

    /// All attachments in build order.
    pub fn attachments(&self) -> impl Iterator<Item = (AttachmentId, &AttachmentInstance)> {
        (0u32..)
            .zip(self.attachments.iter())
            .map(|(id, a)| (AttachmentId(id), a))
    }

    /// Name of an attachment, or `"?"`.
    #[must_use]
    pub fn attachment_name(&self, id: AttachmentId) -> &str {
        self.attachment(id).map_or("?", |a| a.name.as_str())
    }

    /// A rules (condition) attachment.
    #[must_use]
    pub fn rules(&self, id: AttachmentId) -> Option<&RulesAttachment> {
        match &self.attachment(id)?.attachment {
            Attachment::Rules(rules) => Some(&**rules),
            _ => None,
        }
    }

    /// A mutable rules attachment.
    pub fn rules_mut(&mut self, id: AttachmentId) -> Option<&mut RulesAttachment> {
        match &mut self.attachment_mut(id)?.attachment {
            Attachment::Rules(rules) => Some(&mut **rules),
            _ => None,
        }
    }

    /// A user action attachment.
    #[must_use]
    pub fn user_action(&self, id: AttachmentId) -> Option<&UserActionAttachment> {
        match &self.attachment(id)?.attachment {
            Attachment::UserAction(action) => Some(action),
            _ => None,
        }
    }

    /// The `unitAttachment` of a unit type.
    #[must_use]
    pub fn unit_attachment(&self, unit_type: UnitTypeId) -> Option<&UnitAttachment> {
        let id = self.attachment_named(AttachmentTarget::UnitType(unit_type), UNIT_ATTACHMENT_NAME)?;
        match &self.attachment(id)?.attachment {
            Attachment::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// The `territoryAttachment` of a territory.
    #[must_use]
    pub fn territory_attachment(&self, territory: TerritoryId) -> Option<&TerritoryAttachment> {
        let id = self.attachment_named(
            AttachmentTarget::Territory(territory),
            TERRITORY_ATTACHMENT_NAME,
        )?;
        match &self.attachment(id)?.attachment {
            Attachment::Territory(attachment) => Some(attachment),
            _ => None,
        }
    }

    /// The `relationshipTypeAttachment` of a relationship type.
    #[must_use]
    pub fn relationship_type_attachment(
        &self,
        relationship_type: RelationshipTypeId,
    ) -> Option<&RelationshipTypeAttachment> {
        let id = self.attachment_named(
            AttachmentTarget::RelationshipType(relationship_type),
            RELATIONSHIP_TYPE_ATTACHMENT_NAME,
        )?;
        match &self.attachment(id)?.attachment {
            Attachment::RelationshipType(attachment) => Some(attachment),
            _ => None,
        }
    }

    /// Record the applied option values of an attachment.
    pub fn record_applied(&mut self, applied: AppliedAttachment) {
        self.applied.push(applied);
    }

    /// Audit trail of applied option values, in declaration order.
    #[must_use]
    pub fn applied_attachments(&self) -> &[AppliedAttachment] {
        &self.applied
    }

    /// Store the adaptive-chance changes produced by an evaluation pass.
    pub fn apply_chance_adjustments(&mut self, adjustments: &[ChanceAdjustment]) {
        for adjustment in adjustments {
            let Some(instance) = self.attachments.get_mut(adjustment.condition.0 as usize) else {
                continue;
            };
            if let Some(core) = instance.attachment.condition_mut() {
                core.chance.hit = adjustment.hit;
            }
        }
    }

    // ---- ownership and units ----------------------------------------------

    /// Change the current owner of a territory.
    pub fn set_owner(&mut self, territory: TerritoryId, owner: Option<PlayerId>) {
        if let Some(t) = self.territories.get_mut(territory.0) {
            t.owner = owner;
        }
    }

    /// Set the game-start owner of a territory (also its current owner).
    pub fn set_initial_owner(&mut self, territory: TerritoryId, owner: PlayerId) {
        if let Some(t) = self.territories.get_mut(territory.0) {
            t.owner = Some(owner);
            t.initial_owner = Some(owner);
        }
    }

    /// Place units.
    pub fn add_units(
        &mut self,
        territory: TerritoryId,
        unit_type: UnitTypeId,
        owner: PlayerId,
        quantity: u32,
    ) {
        if let Some(t) = self.territories.get_mut(territory.0) {
            t.units
                .extend((0..quantity).map(|_| Unit { unit_type, owner }));
        }
    }

    /// Territories currently owned by `player`.
    pub fn territories_owned_by(&self, player: PlayerId) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories()
            .filter(move |(_, t)| t.owner == Some(player))
            .map(|(id, _)| id)
    }

    /// Original owner of a territory: the `originalOwner` of its
    /// `territoryAttachment` if set, otherwise the owner at game start.
    #[must_use]
    pub fn original_owner(&self, territory: TerritoryId) -> Option<PlayerId> {
        self.territory_attachment(territory)
            .and_then(|a| a.original_owner)
            .or_else(|| self.territory(territory).and_then(|t| t.initial_owner))
    }

    /// Territories originally owned by `player`.
    pub fn originally_owned_by(&self, player: PlayerId) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories()
            .map(|(id, _)| id)
            .filter(move |id| self.original_owner(*id) == Some(player))
    }

    /// Sea zones and impassable land block land units.
    #[must_use]
    pub fn is_impassable_to_land(&self, territory: TerritoryId) -> bool {
        self.territory(territory).map_or(true, |t| t.water)
            || self
                .territory_attachment(territory)
                .is_some_and(|a| a.is_impassable)
    }

    // ---- diplomacy ----------------------------------------------------------

    /// Set the relationship of a pair.
    pub fn set_relationship(
        &mut self,
        p1: PlayerId,
        p2: PlayerId,
        relationship_type: RelationshipTypeId,
        round_created: u32,
    ) {
        self.relationships
            .set(p1, p2, Relationship::new(relationship_type, round_created));
    }

    /// Relationship of a pair. A player is always in `self_relation` with
    /// itself; a pair never initialised is at default war since round 0.
    #[must_use]
    pub fn relationship(&self, p1: PlayerId, p2: PlayerId) -> Relationship {
        if p1 == p2 {
            return Relationship::new(SELF_RELATION, 0);
        }
        self.relationships
            .get(p1, p2)
            .unwrap_or(Relationship::new(DEFAULT_WAR_RELATION, 0))
    }

    /// Archetype of a relationship type.
    #[must_use]
    pub fn archetype(&self, relationship_type: RelationshipTypeId) -> Archetype {
        if let Some(attachment) = self.relationship_type_attachment(relationship_type) {
            return attachment.archetype;
        }
        self.relationship_types
            .get(relationship_type.0)
            .map_or(Archetype::War, |rt| rt.archetype)
    }

    fn relation_archetype(&self, p1: PlayerId, p2: PlayerId) -> Archetype {
        self.archetype(self.relationship(p1, p2).relationship_type)
    }

    /// Whether two players are allied (a player is allied with itself).
    #[must_use]
    pub fn is_allied(&self, p1: PlayerId, p2: PlayerId) -> bool {
        self.relation_archetype(p1, p2) == Archetype::Allied
    }

    /// Whether two players are at war.
    #[must_use]
    pub fn is_at_war(&self, p1: PlayerId, p2: PlayerId) -> bool {
        self.relation_archetype(p1, p2) == Archetype::War
    }

    /// Every player allied with at least one of `players`.
    #[must_use]
    pub fn allies_of_any(&self, players: &[PlayerId]) -> Vec<PlayerId> {
        self.players()
            .map(|(id, _)| id)
            .filter(|id| players.iter().any(|p| self.is_allied(*id, *p)))
            .collect()
    }

    /// Every player at war with at least one of `players`.
    #[must_use]
    pub fn enemies_of_any(&self, players: &[PlayerId]) -> Vec<PlayerId> {
        self.players()
            .map(|(id, _)| id)
            .filter(|id| players.iter().any(|p| self.is_at_war(*id, *p)))
            .collect()
    }

    // ---- technology, battles, properties, round ----------------------------

    /// Give a technology to a player.
    pub fn grant_tech(&mut self, player: PlayerId, tech: TechId) {
        self.techs.entry(player).or_default().insert(tech);
    }

    /// Whether a player has researched a technology.
    #[must_use]
    pub fn has_tech(&self, player: PlayerId, tech: TechId) -> bool {
        self.techs.get(&player).is_some_and(|t| t.contains(&tech))
    }

    /// Record a finished battle.
    pub fn record_battle(&mut self, record: BattleRecord) {
        self.battles.push(record);
    }

    /// Battle history.
    #[must_use]
    pub fn battles(&self) -> &BattleRecordList {
        &self.battles
    }

    /// Game options.
    #[must_use]
    pub fn properties(&self) -> &GameProperties {
        &self.properties
    }

    /// Mutable game options.
    pub fn properties_mut(&mut self) -> &mut GameProperties {
        &mut self.properties
    }

    /// Current round (starts at 1).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Advance or rewind the round counter.
    pub fn set_round(&mut self, round: u32) {
        self.round = round;
    }
}
