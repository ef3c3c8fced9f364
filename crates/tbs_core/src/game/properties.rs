//! Game options declared by the scenario.

use std::collections::BTreeMap;

/// Extra rounds added to a relationship's age before the
/// relationship-duration leaf compares it.
pub const RELATIONSHIPS_LAST_EXTRA_ROUNDS: &str = "Relationships Last Extra Rounds";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// `true` / `false`.
    Flag(bool),
    /// Integer option.
    Number(i32),
    /// Anything else.
    Text(String),
}

impl PropertyValue {
    /// Classify a raw scenario value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Self::Flag(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Self::Flag(false)
        } else if let Ok(n) = raw.trim().parse() {
            Self::Number(n)
        } else {
            Self::Text(raw.to_string())
        }
    }
}

/// Named game options.
#[derive(Debug, Clone, Default)]
pub struct GameProperties {
    values: BTreeMap<String, PropertyValue>,
}

impl GameProperties {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option from its raw scenario text.
    pub fn set_raw(&mut self, name: impl Into<String>, raw: &str) {
        self.values.insert(name.into(), PropertyValue::parse(raw));
    }

    /// Set a boolean option.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.values.insert(name.into(), PropertyValue::Flag(value));
    }

    /// Set an integer option.
    pub fn set_number(&mut self, name: impl Into<String>, value: i32) {
        self.values.insert(name.into(), PropertyValue::Number(value));
    }

    /// Boolean option, or `default` when unset or not a flag.
    #[must_use]
    pub fn flag(&self, name: &str, default: bool) -> bool {
        match self.values.get(name) {
            Some(PropertyValue::Flag(value)) => *value,
            _ => default,
        }
    }

    /// Integer option, or `default` when unset or not a number.
    #[must_use]
    pub fn number(&self, name: &str, default: i32) -> i32 {
        match self.values.get(name) {
            Some(PropertyValue::Number(value)) => *value,
            _ => default,
        }
    }

    /// See [`RELATIONSHIPS_LAST_EXTRA_ROUNDS`].
    #[must_use]
    pub fn relationships_last_extra_rounds(&self) -> i32 {
        self.number(RELATIONSHIPS_LAST_EXTRA_ROUNDS, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_are_classified() {
        let mut props = GameProperties::new();
        props.set_raw("Two Hit Battleship", "TRUE");
        props.set_raw(RELATIONSHIPS_LAST_EXTRA_ROUNDS, "2");
        props.set_raw("Theme", "ww2");

        assert!(props.flag("Two Hit Battleship", false));
        assert_eq!(props.relationships_last_extra_rounds(), 2);
        assert!(!props.flag("Theme", false));
        assert_eq!(props.number("Theme", 7), 7);
    }
}
