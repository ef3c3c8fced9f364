//! Backward-compatible option names and values.

use crate::error::{Result, ScenarioError};

/// Old option names and the property they now set.
const RENAMED_OPTIONS: &[(&str, &str)] = &[
    ("isParatroop", "isAirTransportable"),
    ("isInfantry", "isLandTransportable"),
    ("isMechanized", "isLandTransportable"),
    ("occupiedTerrOf", "originalOwner"),
    ("isImpassible", "isImpassable"),
    ("isSub", "canEvade"),
];

/// Options that older scenarios carry but that no longer do anything.
const IGNORED_OPTIONS: &[&str] = &[
    "takeUnitControl",
    "giveUnitControlInAllTerritories",
    "isTwoHit",
    "isParatroopTransport",
];

/// Lower-case the first character of an option name.
#[must_use]
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalise an option name: decapitalise, then apply renames.
///
/// Returns `Ok(None)` for options that should be skipped.
///
/// # Errors
///
/// A [`ScenarioError::Format`] error for an empty option name.
pub fn normalize_option_name(name: &str, attachment: &str) -> Result<Option<String>> {
    let name = decapitalize(name);
    let name = RENAMED_OPTIONS
        .iter()
        .find(|(old, _)| *old == name)
        .map_or(name, |(_, new)| (*new).to_string());
    if IGNORED_OPTIONS.contains(&name.as_str()) {
        return Ok(None);
    }
    if name.is_empty() {
        return Err(ScenarioError::Format(format!(
            "Option name with zero length for attachment: {attachment}"
        )));
    }
    Ok(Some(name))
}

/// Map legacy values of a (normalised) option onto their current form.
#[must_use]
pub fn normalize_option_value(name: &str, value: String) -> String {
    match name {
        "victoryCity" if value.eq_ignore_ascii_case("true") => "1".to_string(),
        "victoryCity" if value.eq_ignore_ascii_case("false") => "0".to_string(),
        "conditionType" if value.eq_ignore_ascii_case("XOR") => "1".to_string(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decapitalize() {
        assert_eq!(decapitalize("Movement"), "movement");
        assert_eq!(decapitalize("isSea"), "isSea");
        assert_eq!(decapitalize(""), "");
    }

    #[test]
    fn test_renamed_and_ignored_options() {
        assert_eq!(
            normalize_option_name("IsParatroop", "a").unwrap().as_deref(),
            Some("isAirTransportable")
        );
        assert_eq!(
            normalize_option_name("occupiedTerrOf", "a").unwrap().as_deref(),
            Some("originalOwner")
        );
        assert_eq!(normalize_option_name("isTwoHit", "a").unwrap(), None);
        assert!(normalize_option_name("", "a").is_err());
    }

    #[test]
    fn test_value_mapping() {
        assert_eq!(normalize_option_value("victoryCity", "true".into()), "1");
        assert_eq!(normalize_option_value("victoryCity", "2".into()), "2");
        assert_eq!(normalize_option_value("conditionType", "XOR".into()), "1");
        assert_eq!(normalize_option_value("invert", "true".into()), "true");
    }
}
