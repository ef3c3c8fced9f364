//! Named value lists declared by a scenario.

use std::collections::BTreeMap;

use crate::data::VariableDecl;
use crate::error::{Result, ScenarioError};

/// Variable lists keyed by their full `$name$` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    variables: BTreeMap<String, Vec<String>>,
    order: Vec<String>,
}

impl VariableTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from declarations, in order.
    ///
    /// An element equal to the `$name$` of an earlier variable is replaced
    /// by that variable's values.
    pub fn from_decls(decls: &[VariableDecl]) -> Result<Self> {
        let mut table = Self::new();
        for decl in decls {
            table.declare(decl)?;
        }
        Ok(table)
    }

    /// Add one variable.
    pub fn declare(&mut self, decl: &VariableDecl) -> Result<()> {
        if decl.name.is_empty() {
            return Err(ScenarioError::Format("Variable with empty name".into()));
        }
        let key = reference(&decl.name);
        if self.variables.contains_key(&key) {
            return Err(ScenarioError::Format(format!(
                "Variable declared twice: {key}"
            )));
        }
        let mut values = Vec::with_capacity(decl.elements.len());
        for element in &decl.elements {
            match self.variables.get(element) {
                Some(spliced) => values.extend(spliced.iter().cloned()),
                None => values.push(element.clone()),
            }
        }
        self.order.push(key.clone());
        self.variables.insert(key, values);
        Ok(())
    }

    /// Values of a variable by its `$name$` reference.
    #[must_use]
    pub fn get(&self, reference: &str) -> Option<&[String]> {
        self.variables.get(reference).map(Vec::as_slice)
    }

    /// Whether the table has a variable with this `$name$` reference.
    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.variables.contains_key(reference)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no variables are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Replace every whole-variable reference in `text` with the variable's
    /// values joined by `:`.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        if !text.contains('$') {
            return text.to_string();
        }
        let mut result = text.to_string();
        for key in &self.order {
            if let Some(values) = self.variables.get(key) {
                if result.contains(key.as_str()) {
                    result = result.replace(key.as_str(), &values.join(":"));
                }
            }
        }
        result
    }
}

/// `$name$` for a bare variable name.
fn reference(name: &str) -> String {
    format!("${name}$")
}
