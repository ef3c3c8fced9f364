//! `foreach` expansion of attachment declarations.
//!
//! A foreach expression names one or two groups of variables:
//! `$a$:$b$` iterates both lists in lockstep, `$a$^$b$` iterates `$b$`
//! fully for every element of `$a$`. Inside the declaration, `@a@` stands
//! for the current element of `$a$`.

use std::collections::BTreeMap;

use crate::data::AttachmentDecl;
use crate::error::{Result, ScenarioError};

use super::VariableTable;

/// Parsed foreach expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachSpec {
    /// Variables iterated in the outer loop, as `$name$` references.
    pub outer: Vec<String>,
    /// Variables iterated in the inner loop; empty for a single group.
    pub inner: Vec<String>,
}

impl ForeachSpec {
    /// Parse and validate a foreach expression against the variable table.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Format`] if there is more than one `^`, a group
    /// names an undeclared variable, or the variables of one group differ in
    /// length.
    pub fn parse(expression: &str, variables: &VariableTable) -> Result<Self> {
        let groups: Vec<&str> = expression.split('^').collect();
        if groups.len() > 2 {
            return Err(ScenarioError::Format(format!(
                "Invalid foreach expression, can only use variables, ':', and at most 1 '^': {expression}"
            )));
        }
        let outer = parse_group(groups[0], expression, variables)?;
        let inner = match groups.get(1) {
            Some(group) => parse_group(group, expression, variables)?,
            None => Vec::new(),
        };
        Ok(Self { outer, inner })
    }
}

fn parse_group(group: &str, expression: &str, variables: &VariableTable) -> Result<Vec<String>> {
    let names: Vec<String> = group.split(':').map(str::to_string).collect();
    let mut length = None;
    for name in &names {
        let values = variables.get(name).ok_or_else(|| {
            ScenarioError::Format(format!(
                "Attachment has invalid variables in foreach: {expression}"
            ))
        })?;
        match length {
            None => length = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(ScenarioError::Format(format!(
                    "Attachment foreach variables must have same number of elements: {expression}"
                )));
            }
            Some(_) => {}
        }
    }
    Ok(names)
}

/// One option after foreach substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedOption {
    /// Option name as declared.
    pub name: String,
    /// Value with `@var@` placeholders substituted.
    pub value: String,
    /// Count with `@var@` placeholders substituted.
    pub count: Option<String>,
}

/// A concrete declaration produced by expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedDeclaration {
    /// Declaration name before substitution, for error context.
    pub declaration: String,
    /// Attachment name.
    pub name: String,
    /// Target entity name.
    pub attach_to: String,
    /// Target entity category.
    pub target_kind: String,
    /// Attachment variant discriminant.
    pub class: String,
    /// Options in declaration order.
    pub options: Vec<ExpandedOption>,
}

/// `@name@` placeholder to current element.
type Bindings = BTreeMap<String, String>;

/// Expand one declaration into its concrete instances.
///
/// Without a foreach expression the declaration is returned as is. Options
/// whose value or count mention a placeholder bound to an empty element are
/// dropped from that instance.
///
/// # Errors
///
/// [`ScenarioError::Format`] for a malformed foreach expression.
pub fn expand(decl: &AttachmentDecl, variables: &VariableTable) -> Result<Vec<ExpandedDeclaration>> {
    let Some(expression) = decl.foreach.as_deref().filter(|e| !e.is_empty()) else {
        return Ok(vec![instantiate(decl, &Bindings::new())]);
    };
    let spec = ForeachSpec::parse(expression, variables)?;
    let outer_len = group_len(&spec.outer, variables);
    let inner_len = group_len(&spec.inner, variables);

    let mut expanded = Vec::new();
    for i in 0..outer_len {
        let outer = bindings(&spec.outer, i, variables);
        if spec.inner.is_empty() {
            expanded.push(instantiate(decl, &outer));
            continue;
        }
        for j in 0..inner_len {
            let mut combined = bindings(&spec.inner, j, variables);
            combined.extend(outer.iter().map(|(k, v)| (k.clone(), v.clone())));
            expanded.push(instantiate(decl, &combined));
        }
    }
    Ok(expanded)
}

fn group_len(group: &[String], variables: &VariableTable) -> usize {
    group
        .first()
        .and_then(|name| variables.get(name))
        .map_or(0, <[String]>::len)
}

fn bindings(group: &[String], index: usize, variables: &VariableTable) -> Bindings {
    group
        .iter()
        .filter_map(|name| {
            let value = variables.get(name)?.get(index)?;
            Some((name.replace('$', "@"), value.clone()))
        })
        .collect()
}

fn instantiate(decl: &AttachmentDecl, bindings: &Bindings) -> ExpandedDeclaration {
    let options = decl
        .options
        .iter()
        .filter(|option| {
            !mentions_empty_binding(&option.value, bindings)
                && !option
                    .count
                    .as_deref()
                    .is_some_and(|count| mentions_empty_binding(count, bindings))
        })
        .map(|option| ExpandedOption {
            name: option.name.clone(),
            value: substitute(&option.value, bindings),
            count: option.count.as_deref().map(|count| substitute(count, bindings)),
        })
        .collect();
    ExpandedDeclaration {
        declaration: decl.name.clone(),
        name: substitute(&decl.name, bindings),
        attach_to: substitute(&decl.attach_to, bindings),
        target_kind: decl.target_kind.clone(),
        class: decl.class.clone(),
        options,
    }
}

fn substitute(text: &str, bindings: &Bindings) -> String {
    bindings
        .iter()
        .fold(text.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder.as_str(), value)
        })
}

fn mentions_empty_binding(text: &str, bindings: &Bindings) -> bool {
    bindings
        .iter()
        .any(|(placeholder, value)| value.is_empty() && text.contains(placeholder.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OptionDecl, VariableDecl};

    fn table(vars: &[(&str, &[&str])]) -> VariableTable {
        let decls: Vec<VariableDecl> = vars
            .iter()
            .map(|(name, elements)| VariableDecl {
                name: (*name).to_string(),
                elements: elements.iter().map(ToString::to_string).collect(),
            })
            .collect();
        VariableTable::from_decls(&decls).unwrap()
    }

    #[test]
    fn test_no_foreach_is_identity() {
        let decl = AttachmentDecl::new("unitAttachment", "infantry", "unitType", "UnitAttachment")
            .with_option(OptionDecl::new("attack", "1"));
        let expanded = expand(&decl, &VariableTable::new()).unwrap();
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].name, "unitAttachment");
        assert_eq!(expanded[0].options[0].value, "1");
    }

    #[test]
    fn test_single_group_pairs_index_wise() {
        let vars = table(&[("unit", &["Inf", "Tank"]), ("owner", &["P1", "P2"])]);
        let decl = AttachmentDecl::new("ua_@unit@", "@unit@", "unitType", "UnitAttachment")
            .with_foreach("$unit$:$owner$")
            .with_option(OptionDecl::new("note", "@owner@"));
        let expanded = expand(&decl, &vars).unwrap();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].name, "ua_Inf");
        assert_eq!(expanded[0].options[0].value, "P1");
        assert_eq!(expanded[1].attach_to, "Tank");
        assert_eq!(expanded[1].options[0].value, "P2");
        assert_eq!(expanded[1].declaration, "ua_@unit@");
    }

    #[test]
    fn test_nested_groups_cross_product() {
        let vars = table(&[("a", &["1", "2", "3"]), ("b", &["x", "y"])]);
        let decl = AttachmentDecl::new("c_@a@_@b@", "P", "player", "RulesAttachment")
            .with_foreach("$a$^$b$");
        let names: Vec<String> = expand(&decl, &vars)
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["c_1_x", "c_1_y", "c_2_x", "c_2_y", "c_3_x", "c_3_y"]);
    }

    #[test]
    fn test_option_with_empty_binding_is_dropped() {
        let vars = table(&[("terr", &["Berlin", ""])]);
        let decl = AttachmentDecl::new("c_@terr@", "P", "player", "RulesAttachment")
            .with_foreach("$terr$")
            .with_option(OptionDecl::new("directOwnershipTerritories", "@terr@"))
            .with_option(OptionDecl::new("switch", "true"));
        let expanded = expand(&decl, &vars).unwrap();
        assert_eq!(expanded[0].options.len(), 2);
        assert_eq!(expanded[1].options.len(), 1);
        assert_eq!(expanded[1].options[0].name, "switch");
    }

    #[test]
    fn test_count_is_substituted() {
        let vars = table(&[("n", &["2"])]);
        let decl = AttachmentDecl::new("c", "P", "player", "RulesAttachment")
            .with_foreach("$n$")
            .with_option(OptionDecl::new("unitPresence", "armour").with_count("@n@"));
        let expanded = expand(&decl, &vars).unwrap();
        assert_eq!(expanded[0].options[0].count.as_deref(), Some("2"));
    }

    #[test]
    fn test_malformed_expressions() {
        let vars = table(&[("a", &["1", "2"]), ("b", &["x"])]);
        let base = AttachmentDecl::new("c", "P", "player", "RulesAttachment");
        for expression in ["$a$^$b$^$a$", "$missing$", "$a$:$b$", "a"] {
            let decl = base.clone().with_foreach(expression);
            assert!(
                matches!(expand(&decl, &vars), Err(ScenarioError::Format(_))),
                "{expression}"
            );
        }
    }
}
