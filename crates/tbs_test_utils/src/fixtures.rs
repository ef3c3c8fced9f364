//! Test fixtures and helpers.
//!
//! The sample scenario is a small five-power map exercising every
//! attachment variant, `foreach` templating and national objectives.

use tbs_core::data::ScenarioDocument;
use tbs_core::game::{AttachmentId, AttachmentTarget, GameData, PlayerId};
use tbs_core::loader::build_game_data;

/// RON source of the sample scenario.
pub const SAMPLE_WORLD_RON: &str = include_str!("../scenarios/sample_world.ron");

/// Parse the sample scenario document.
///
/// # Panics
///
/// Panics if the bundled document does not parse.
#[must_use]
pub fn sample_document() -> ScenarioDocument {
    ScenarioDocument::from_ron_str(SAMPLE_WORLD_RON).expect("sample scenario parses")
}

/// Load the sample scenario into game data.
///
/// # Panics
///
/// Panics if the bundled document does not load.
#[must_use]
pub fn sample_game() -> GameData {
    build_game_data(&sample_document()).expect("sample scenario loads")
}

/// Load a scenario from inline RON.
///
/// # Panics
///
/// Panics if the document does not parse or load.
#[must_use]
pub fn game_from_ron(ron: &str) -> GameData {
    let doc = ScenarioDocument::from_ron_str(ron).expect("scenario parses");
    build_game_data(&doc).expect("scenario loads")
}

/// Look up a player by name.
///
/// # Panics
///
/// Panics if the player does not exist.
#[must_use]
pub fn player(data: &GameData, name: &str) -> PlayerId {
    data.player_id(name)
        .unwrap_or_else(|| panic!("no player named {name}"))
}

/// Look up an attachment hung off a player.
///
/// # Panics
///
/// Panics if the player or the attachment does not exist.
#[must_use]
pub fn player_attachment(data: &GameData, player_name: &str, name: &str) -> AttachmentId {
    let id = player(data, player_name);
    data.attachment_named(AttachmentTarget::Player(id), name)
        .unwrap_or_else(|| panic!("no attachment {name} on {player_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_world_loads() {
        let data = sample_game();
        assert_eq!(data.name(), "Sample World");
        assert_eq!(data.players().count(), 5);
        let germans = player(&data, "Germans");
        assert!(data
            .attachment_named(AttachmentTarget::Player(germans), "conditionAttachmentGermansAtWar")
            .is_some());
    }
}
