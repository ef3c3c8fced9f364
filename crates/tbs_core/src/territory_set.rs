//! Resolution of territory-list tokens into concrete territory sets.
//!
//! A list is either a single group keyword, a single territory, a
//! `count:group` pair, or explicit territory names optionally led by a
//! required count or `each`. Resolving a list also fixes how many of its
//! territories a leaf needs to match.

use std::collections::BTreeSet;

use crate::error::{Result, ScenarioError};
use crate::game::{GameData, PlayerId, TerritoryId};

/// Symbolic territory groups.
pub const GROUP_KEYWORDS: [&str; 7] = [
    "controlled",
    "controlledNoWater",
    "original",
    "originalNoWater",
    "all",
    "map",
    "enemy",
];

/// Keyword that asks a leaf to report how many territories matched.
pub const EACH: &str = "each";

/// A dynamically computed territory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerritoryGroup {
    /// Originally owned by the players (`original` and `enemy`).
    Original,
    /// Originally owned, passable to land units.
    OriginalNoWater,
    /// Currently owned by the players.
    Controlled,
    /// Currently owned, passable to land units.
    ControlledNoWater,
    /// Currently or originally owned.
    All,
    /// Every territory on the map.
    Map,
}

impl TerritoryGroup {
    /// Parse a group keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "original" | "enemy" => Some(Self::Original),
            "originalNoWater" => Some(Self::OriginalNoWater),
            "controlled" => Some(Self::Controlled),
            "controlledNoWater" => Some(Self::ControlledNoWater),
            "all" => Some(Self::All),
            "map" => Some(Self::Map),
            _ => None,
        }
    }

    /// Territories of this group for the given players.
    #[must_use]
    pub fn resolve(self, players: &[PlayerId], data: &GameData) -> BTreeSet<TerritoryId> {
        let mut territories = BTreeSet::new();
        if self == Self::Map {
            territories.extend(data.territories().map(|(id, _)| id));
            return territories;
        }
        for &player in players {
            match self {
                Self::Original => territories.extend(data.originally_owned_by(player)),
                Self::OriginalNoWater => territories.extend(
                    data.originally_owned_by(player)
                        .filter(|&t| !data.is_impassable_to_land(t)),
                ),
                Self::Controlled => territories.extend(data.territories_owned_by(player)),
                Self::ControlledNoWater => territories.extend(
                    data.territories_owned_by(player)
                        .filter(|&t| !data.is_impassable_to_land(t)),
                ),
                Self::All => {
                    territories.extend(data.territories_owned_by(player));
                    territories.extend(data.originally_owned_by(player));
                }
                Self::Map => {}
            }
        }
        territories
    }
}

/// Territories a leaf inspects and how many of them must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritorySelection {
    /// Resolved territories.
    pub territories: BTreeSet<TerritoryId>,
    /// Matches needed for the leaf to pass.
    pub required: u32,
    /// The list asked for a count of matches (`each`).
    pub count_each: bool,
}

impl TerritorySelection {
    fn from_group(territories: BTreeSet<TerritoryId>) -> Self {
        let required = size(&territories);
        Self {
            territories,
            required,
            count_each: false,
        }
    }
}

/// Resolve raw list tokens for the given players.
///
/// A group keyword sets the required count to the group's size, and a
/// numeric leading count in the `count:group` form is overwritten. A
/// leading `each` is the exception: it switches on counting with a
/// required count of one.
///
/// # Errors
///
/// [`ScenarioError::MissingEntity`] for an unknown territory name,
/// [`ScenarioError::InvalidPropertyValue`] when the leading token of a
/// `count:group` pair is neither a number nor `each`.
pub fn resolve_territories(
    tokens: &[String],
    players: &[PlayerId],
    data: &GameData,
) -> Result<TerritorySelection> {
    match tokens {
        [] => Ok(TerritorySelection::default()),
        [single] => resolve_single(single, players, data),
        [count, group] if GROUP_KEYWORDS.contains(&group.as_str()) => {
            let territories = TerritoryGroup::from_keyword(group)
                .map(|g| g.resolve(players, data))
                .unwrap_or_default();
            let mut selection = TerritorySelection::from_group(territories);
            if count == EACH {
                selection.count_each = true;
                selection.required = 1;
            } else if count.parse::<u32>().is_err() {
                return Err(ScenarioError::invalid(
                    "territoryCount",
                    count.as_str(),
                    "must be a number or 'each'",
                ));
            }
            Ok(selection)
        }
        _ => resolve_listed(tokens, data),
    }
}

fn resolve_single(name: &str, players: &[PlayerId], data: &GameData) -> Result<TerritorySelection> {
    if let Some(group) = TerritoryGroup::from_keyword(name) {
        return Ok(TerritorySelection::from_group(group.resolve(players, data)));
    }
    let territory = data.require_territory(name)?;
    Ok(TerritorySelection {
        territories: BTreeSet::from([territory]),
        required: 1,
        count_each: false,
    })
}

fn resolve_listed(tokens: &[String], data: &GameData) -> Result<TerritorySelection> {
    let mut selection = TerritorySelection::default();
    let mut required = None;
    for (i, name) in tokens.iter().enumerate() {
        if i == 0 {
            if let Ok(count) = name.parse::<u32>() {
                required = Some(count);
                continue;
            }
        }
        if name == EACH {
            selection.count_each = true;
            required = Some(1);
            continue;
        }
        if GROUP_KEYWORDS.contains(&name.as_str()) {
            break;
        }
        selection.territories.insert(data.require_territory(name)?);
    }
    selection.required = required.unwrap_or_else(|| size(&selection.territories));
    Ok(selection)
}

fn size(territories: &BTreeSet<TerritoryId>) -> u32 {
    u32::try_from(territories.len()).unwrap_or(u32::MAX)
}
