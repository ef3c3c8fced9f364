//! Turns a [`ScenarioDocument`] into live [`GameData`].
//!
//! Loading registers every entity, applies game options and the starting
//! state, expands and builds the attachments, then links sub-condition
//! names and validates territory lists. Any failure rejects the whole
//! scenario.

use std::path::Path;

use tracing::info;

use crate::attachments::rules::missing_condition;
use crate::builder::AttachmentBuilder;
use crate::data::ScenarioDocument;
use crate::error::Result;
use crate::expansion::VariableTable;
use crate::game::{AttachmentId, AttachmentTarget, GameData, PlayerId};
use crate::territory_set::resolve_territories;

/// Read, parse and load a scenario file.
///
/// # Errors
///
/// Any [`crate::error::ScenarioError`]: IO, parse and every load-time
/// failure of [`build_game_data`].
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<GameData> {
    let doc = ScenarioDocument::load(path)?;
    build_game_data(&doc)
}

/// Build game data from a parsed document.
///
/// # Errors
///
/// - [`crate::error::ScenarioError::Format`] for duplicate entity names or
///   malformed variables and foreach expressions
/// - [`crate::error::ScenarioError::MissingEntity`] for unknown names in
///   the starting state or attachment targets
/// - any attachment build failure
/// - [`crate::error::ScenarioError::Integrity`] for unresolvable
///   sub-condition names or territory lists
pub fn build_game_data(doc: &ScenarioDocument) -> Result<GameData> {
    let mut data = GameData::new(doc.name.clone());
    register_entities(&mut data, doc)?;
    for property in &doc.properties {
        data.properties_mut().set_raw(property.name.clone(), &property.value);
    }
    apply_initial_state(&mut data, doc)?;

    let variables = VariableTable::from_decls(&doc.variables)?;
    let built = AttachmentBuilder::new(&doc.name, &variables).build_all(&mut data, &doc.attachments)?;
    let links = link_conditions(&mut data)?;
    validate_territory_lists(&data)?;

    info!(
        scenario = %doc.name,
        players = doc.players.len(),
        territories = doc.territories.len(),
        variables = variables.len(),
        attachments = built.len(),
        links,
        "scenario loaded"
    );
    Ok(data)
}

fn register_entities(data: &mut GameData, doc: &ScenarioDocument) -> Result<()> {
    for name in &doc.players {
        data.add_player(name.clone())?;
    }
    for territory in &doc.territories {
        data.add_territory(territory.name.clone(), territory.water)?;
    }
    for name in &doc.resources {
        data.add_resource(name.clone())?;
    }
    for name in &doc.unit_types {
        data.add_unit_type(name.clone())?;
    }
    for name in &doc.technologies {
        data.add_technology(name.clone())?;
    }
    for name in &doc.relationship_types {
        data.add_relationship_type(name.clone())?;
    }
    for name in &doc.territory_effects {
        data.add_territory_effect(name.clone())?;
    }
    Ok(())
}

fn apply_initial_state(data: &mut GameData, doc: &ScenarioDocument) -> Result<()> {
    let init = &doc.initialize;
    data.set_round(init.round);
    for owner in &init.owners {
        let territory = data.require_territory(&owner.territory)?;
        let player = data.require_player(&owner.owner)?;
        data.set_initial_owner(territory, player);
    }
    for units in &init.units {
        let territory = data.require_territory(&units.territory)?;
        let unit_type = data.require_unit_type(&units.unit_type)?;
        let owner = data.require_player(&units.owner)?;
        data.add_units(territory, unit_type, owner, units.quantity);
    }
    for relationship in &init.relationships {
        let p1 = data.require_player(&relationship.player1)?;
        let p2 = data.require_player(&relationship.player2)?;
        let relationship_type = data.require_relationship_type(&relationship.relationship_type)?;
        data.set_relationship(p1, p2, relationship_type, relationship.round_created);
    }
    for tech in &init.techs {
        let player = data.require_player(&tech.player)?;
        let tech_id = data.require_technology(&tech.tech)?;
        data.grant_tech(player, tech_id);
    }
    Ok(())
}

/// Resolve every `conditions` name to an arena index. Returns the number of
/// links made.
fn link_conditions(data: &mut GameData) -> Result<usize> {
    let players: Vec<PlayerId> = data.players().map(|(id, _)| id).collect();
    let pending: Vec<(AttachmentId, Option<PlayerId>, String, Vec<String>)> = data
        .attachments()
        .filter_map(|(id, instance)| {
            let core = instance.attachment.condition()?;
            if core.conditions.is_empty() {
                return None;
            }
            Some((
                id,
                instance.target.player(),
                instance.name.clone(),
                core.conditions.clone(),
            ))
        })
        .collect();

    let mut links = 0;
    for (id, owner, name, conditions) in pending {
        let mut linked = Vec::with_capacity(conditions.len());
        for condition in &conditions {
            let found = find_condition(data, owner, &players, condition)
                .ok_or_else(|| missing_condition(condition).in_integrity_check(name.as_str()))?;
            linked.push(found);
        }
        links += linked.len();
        if let Some(core) = data
            .attachment_mut(id)
            .and_then(|instance| instance.attachment.condition_mut())
        {
            core.linked = linked;
        }
    }
    Ok(links)
}

/// Search the owning player first, then every other player in declaration
/// order. Only rules attachments can be sub-conditions.
fn find_condition(
    data: &GameData,
    owner: Option<PlayerId>,
    players: &[PlayerId],
    name: &str,
) -> Option<AttachmentId> {
    owner
        .into_iter()
        .chain(players.iter().copied().filter(|&p| Some(p) != owner))
        .filter_map(|player| data.attachment_named(AttachmentTarget::Player(player), name))
        .find(|&id| data.rules(id).is_some())
}

fn validate_territory_lists(data: &GameData) -> Result<()> {
    for (id, instance) in data.attachments() {
        let (Some(rules), Some(attached)) = (data.rules(id), instance.target.player()) else {
            continue;
        };
        let players = rules.players_or(attached);
        for (_, tokens) in rules.territory_lists() {
            resolve_territories(tokens, &players, data)
                .map_err(|err| err.in_integrity_check(instance.name.as_str()))?;
        }
    }
    Ok(())
}
