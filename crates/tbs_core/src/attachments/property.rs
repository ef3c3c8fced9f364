//! Typed property schemas.
//!
//! Each attachment variant exposes a static table of [`PropertyDef`]s that
//! maps the scenario's option names onto validating setters. Option names
//! stay exactly as scenario files spell them.

use crate::error::{Result, ScenarioError};
use crate::game::{GameData, UnitTypeId};

/// Parses a raw value and stores it on the attachment.
pub type Setter<T> = fn(&mut T, &str, &GameData) -> Result<()>;

/// One named property of an attachment variant.
pub struct PropertyDef<T: 'static> {
    /// Option name as written in scenario files.
    pub name: &'static str,
    /// `None` for read-only (derived) properties.
    pub setter: Option<Setter<T>>,
}

impl<T: 'static> PropertyDef<T> {
    /// A settable property.
    pub const fn writable(name: &'static str, setter: Setter<T>) -> Self {
        Self {
            name,
            setter: Some(setter),
        }
    }

    /// A property that can be read but never set from a scenario.
    pub const fn read_only(name: &'static str) -> Self {
        Self { name, setter: None }
    }
}

/// Look `property` up in `schema` and run its setter.
///
/// # Errors
///
/// [`ScenarioError::UnknownProperty`] if the name is not in the schema,
/// [`ScenarioError::InvalidPropertyValue`] if it is read-only or the setter
/// rejects the value.
pub fn apply<T>(
    schema: &[PropertyDef<T>],
    target: &mut T,
    property: &str,
    value: &str,
    data: &GameData,
    attachment: &str,
) -> Result<()> {
    let def = schema
        .iter()
        .find(|def| def.name == property)
        .ok_or_else(|| ScenarioError::UnknownProperty {
            option: property.to_string(),
            attachment: attachment.to_string(),
        })?;
    match def.setter {
        Some(setter) => setter(target, value, data),
        None => Err(ScenarioError::invalid(
            property,
            value,
            "property is read-only",
        )),
    }
}

/// Names of every property in a schema.
pub fn names<T>(schema: &[PropertyDef<T>]) -> impl Iterator<Item = &'static str> + '_ {
    schema.iter().map(|def| def.name)
}

/// Split a value on `:`. An empty value yields a single empty token.
#[must_use]
pub fn split_on_colon(value: &str) -> Vec<&str> {
    value.split(':').collect()
}

/// Split a value on `-`.
#[must_use]
pub fn split_on_hyphen(value: &str) -> Vec<&str> {
    value.split('-').collect()
}

/// Parse a signed integer property value.
pub fn parse_int(property: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| ScenarioError::invalid(property, value, "expected an integer"))
}

/// Parse a boolean property value (`true`/`false`, any case).
pub fn parse_bool(property: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ScenarioError::invalid(
            property,
            value,
            "expected true or false",
        ))
    }
}

/// Parse the common `n:unit1:unit2...` form into the number and the units.
pub fn parse_unit_amount(
    property: &str,
    value: &str,
    data: &GameData,
) -> Result<(i32, Vec<UnitTypeId>)> {
    let tokens = split_on_colon(value);
    if tokens.len() < 2 {
        return Err(ScenarioError::invalid(
            property,
            value,
            "expected a number followed by at least one unit type",
        ));
    }
    let amount = parse_int(property, tokens[0])?;
    let units = tokens[1..]
        .iter()
        .map(|name| data.require_unit_type(name))
        .collect::<Result<Vec<_>>>()?;
    Ok((amount, units))
}

/// Resolve a colon-separated unit type list.
pub fn parse_unit_list(value: &str, data: &GameData) -> Result<Vec<UnitTypeId>> {
    split_on_colon(value)
        .into_iter()
        .map(|name| data.require_unit_type(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        value: i32,
    }

    fn set_value(sample: &mut Sample, value: &str, _data: &GameData) -> Result<()> {
        sample.value = parse_int("value", value)?;
        Ok(())
    }

    const SCHEMA: &[PropertyDef<Sample>] = &[
        PropertyDef::writable("value", set_value),
        PropertyDef::read_only("derived"),
    ];

    #[test]
    fn test_apply_known_property() {
        let data = GameData::new("test");
        let mut sample = Sample::default();
        apply(SCHEMA, &mut sample, "value", "7", &data, "sample").unwrap();
        assert_eq!(sample.value, 7);
    }

    #[test]
    fn test_apply_unknown_property() {
        let data = GameData::new("test");
        let mut sample = Sample::default();
        let err = apply(SCHEMA, &mut sample, "bogus", "1", &data, "sample").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing property definition for option 'bogus' in attachment 'sample'"
        );
    }

    #[test]
    fn test_apply_read_only_property() {
        let data = GameData::new("test");
        let mut sample = Sample::default();
        let err = apply(SCHEMA, &mut sample, "derived", "1", &data, "sample").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidPropertyValue { .. }));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int("x", " 12 ").unwrap(), 12);
        assert!(parse_int("x", "twelve").is_err());
        assert!(parse_bool("x", "TRUE").unwrap());
        assert!(parse_bool("x", "yes").is_err());
        assert_eq!(split_on_colon(""), vec![""]);
        assert_eq!(split_on_hyphen("3-+"), vec!["3", "+"]);
    }

    #[test]
    fn test_parse_unit_amount() {
        let mut data = GameData::new("test");
        let infantry = data.add_unit_type("infantry").unwrap();
        let (amount, units) = parse_unit_amount("attackBonus", "2:infantry", &data).unwrap();
        assert_eq!(amount, 2);
        assert_eq!(units, vec![infantry]);
        assert!(parse_unit_amount("attackBonus", "2", &data).is_err());
        assert!(parse_unit_amount("attackBonus", "2:tank", &data).is_err());
    }
}
