//! Fixtures shared by the unit tests of this crate.

use crate::data::{AttachmentDecl, OptionDecl, ScenarioDocument};
use crate::game::{AttachmentId, AttachmentTarget, GameData};
use crate::loader::build_game_data;
use crate::random::RandomSource;

/// Dice that replay a fixed list of rolls, then roll zero.
///
/// Integration tests use `tbs_test_utils::dice::ScriptedDice`. Unit tests
/// need this copy because that one implements `RandomSource` for the
/// separately built `tbs_core` that `tbs_test_utils` links against.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedDice {
    rolls: Vec<u32>,
    calls: usize,
}

impl ScriptedDice {
    pub(crate) fn new(rolls: &[u32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            calls: 0,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

impl RandomSource for ScriptedDice {
    fn random(&mut self, _max: u32, _annotation: &str) -> u32 {
        let roll = self.rolls.get(self.calls).copied().unwrap_or(0);
        self.calls += 1;
        roll
    }
}

const WORLD: &str = r#"
    ScenarioDocument(
        name: "Test World",
        players: ["Germans", "Italians", "Russians", "Americans"],
        territories: [
            TerritoryDecl(name: "Germany"),
            TerritoryDecl(name: "Poland"),
            TerritoryDecl(name: "Rome"),
            TerritoryDecl(name: "Russia"),
            TerritoryDecl(name: "Moscow"),
            TerritoryDecl(name: "Eastern United States"),
            TerritoryDecl(name: "Baltic Sea", water: true),
        ],
        unit_types: ["infantry", "armour", "destroyer", "submarine", "transport"],
        technologies: ["radar", "jetPower"],
        attachments: ATTACHMENTS,
        initialize: InitialState(
            owners: [
                OwnerInit(territory: "Germany", owner: "Germans"),
                OwnerInit(territory: "Poland", owner: "Germans"),
                OwnerInit(territory: "Baltic Sea", owner: "Germans"),
                OwnerInit(territory: "Rome", owner: "Italians"),
                OwnerInit(territory: "Russia", owner: "Russians"),
                OwnerInit(territory: "Moscow", owner: "Russians"),
                OwnerInit(territory: "Eastern United States", owner: "Americans"),
            ],
            units: [
                UnitInit(territory: "Germany", unit_type: "infantry", owner: "Germans", quantity: 3),
                UnitInit(territory: "Germany", unit_type: "armour", owner: "Germans", quantity: 1),
                UnitInit(territory: "Russia", unit_type: "infantry", owner: "Russians", quantity: 2),
            ],
            relationships: [
                RelationshipInit(player1: "Germans", player2: "Italians", relationship_type: "default_allied_relation", round_created: 1),
                RelationshipInit(player1: "Germans", player2: "Americans", relationship_type: "null_relation"),
                RelationshipInit(player1: "Italians", player2: "Americans", relationship_type: "null_relation"),
                RelationshipInit(player1: "Russians", player2: "Americans", relationship_type: "default_allied_relation"),
            ],
        ),
    )
"#;

/// Naval statistics so the enemy-surface leaf can tell warships apart.
fn sea_units() -> Vec<AttachmentDecl> {
    let sea = |unit: &str| {
        AttachmentDecl::new("unitAttachment", unit, "unitType", "UnitAttachment")
            .with_option(OptionDecl::new("isSea", "true"))
    };
    vec![
        sea("destroyer"),
        sea("submarine").with_option(OptionDecl::new("isSub", "true")),
        sea("transport").with_option(OptionDecl::new("transportCapacity", "5")),
    ]
}

/// Load the test world with `attachments` (a RON list of declarations)
/// appended after the naval unit statistics.
///
/// Germans and Italians are allied, both at war with the Russians; the
/// Americans are allied with the Russians and neutral to the rest.
pub(crate) fn scenario(attachments: &str) -> GameData {
    let mut doc = ScenarioDocument::from_ron_str(&WORLD.replace("ATTACHMENTS", attachments))
        .expect("test world parses");
    doc.attachments.splice(0..0, sea_units());
    build_game_data(&doc).expect("test world loads")
}

/// Arena index of a player's attachment.
pub(crate) fn condition_id(data: &GameData, player: &str, name: &str) -> AttachmentId {
    let player = data.require_player(player).expect("player exists");
    data.attachment_named(AttachmentTarget::Player(player), name)
        .unwrap_or_else(|| panic!("no attachment {name} on {player:?}"))
}
