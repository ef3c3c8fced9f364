//! Top-level scenario document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::attachment_decl::{AttachmentDecl, VariableDecl};
use crate::error::{Result, ScenarioError};

/// Complete declarative scenario definition.
///
/// Immutable once parsed; [`crate::loader::build_game_data`] turns it into
/// a [`crate::game::GameData`].
///
/// # Example RON
///
/// ```ron
/// ScenarioDocument(
///     name: "Channel Crisis",
///     players: ["Britain", "Germany"],
///     territories: [
///         TerritoryDecl(name: "London"),
///         TerritoryDecl(name: "North Sea", water: true),
///     ],
///     unit_types: ["infantry"],
///     attachments: [...],
///     initialize: InitialState(owners: [OwnerInit(territory: "London", owner: "Britain")]),
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDocument {
    /// Scenario (map) name, used in error context.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Player names in turn order.
    pub players: Vec<String>,

    /// Map territories.
    pub territories: Vec<TerritoryDecl>,

    /// Resource names.
    #[serde(default)]
    pub resources: Vec<String>,

    /// Unit type names.
    #[serde(default)]
    pub unit_types: Vec<String>,

    /// Technology names.
    #[serde(default)]
    pub technologies: Vec<String>,

    /// Scenario-defined relationship type names (built-in types are added
    /// automatically).
    #[serde(default)]
    pub relationship_types: Vec<String>,

    /// Territory effect names.
    #[serde(default)]
    pub territory_effects: Vec<String>,

    /// Game options.
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,

    /// Variable lists for attachment templating.
    #[serde(default)]
    pub variables: Vec<VariableDecl>,

    /// Attachment declarations in document order.
    #[serde(default)]
    pub attachments: Vec<AttachmentDecl>,

    /// Starting state.
    #[serde(default)]
    pub initialize: InitialState,
}

impl ScenarioDocument {
    /// Load a scenario document from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read and
    /// [`ScenarioError::Parse`] if it is not a valid document.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse a scenario document from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Parse`] if the string is not a valid document.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        Self::parse(ron, "<inline>")
    }

    fn parse(contents: &str, label: &str) -> Result<Self> {
        ron::from_str(contents).map_err(|source| ScenarioError::Parse {
            path: label.to_string(),
            source,
        })
    }
}

/// A territory declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerritoryDecl {
    /// Territory name.
    pub name: String,

    /// Sea zones are water.
    #[serde(default)]
    pub water: bool,
}

impl TerritoryDecl {
    /// A land territory.
    pub fn land(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            water: false,
        }
    }

    /// A sea zone.
    pub fn sea(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            water: true,
        }
    }
}

/// A game option. `true`/`false` values become flags, integers become
/// numeric options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Option name, e.g. `"Relationships Last Extra Rounds"`.
    pub name: String,
    /// Raw option value.
    pub value: String,
}

/// Starting state of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialState {
    /// Starting round number.
    #[serde(default = "default_round")]
    pub round: u32,

    /// Initial territory owners; these also become the original owners.
    #[serde(default)]
    pub owners: Vec<OwnerInit>,

    /// Initial unit placements.
    #[serde(default)]
    pub units: Vec<UnitInit>,

    /// Initial diplomatic relationships.
    #[serde(default)]
    pub relationships: Vec<RelationshipInit>,

    /// Technologies players start with.
    #[serde(default)]
    pub techs: Vec<TechInit>,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            round: default_round(),
            owners: Vec::new(),
            units: Vec::new(),
            relationships: Vec::new(),
            techs: Vec::new(),
        }
    }
}

/// Games start in round one.
const fn default_round() -> u32 {
    1
}

/// Initial owner of one territory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerInit {
    /// Territory name.
    pub territory: String,
    /// Owning player name.
    pub owner: String,
}

/// Units placed at game start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitInit {
    /// Territory name.
    pub territory: String,
    /// Unit type name.
    pub unit_type: String,
    /// Owning player name.
    pub owner: String,
    /// Number of units.
    pub quantity: u32,
}

/// Initial relationship between two players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipInit {
    /// First player.
    pub player1: String,
    /// Second player.
    pub player2: String,
    /// Relationship type name.
    pub relationship_type: String,
    /// Round in which the relationship was established.
    #[serde(default)]
    pub round_created: u32,
}

/// A technology a player owns from the start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TechInit {
    /// Player name.
    pub player: String,
    /// Technology name.
    pub tech: String,
}
