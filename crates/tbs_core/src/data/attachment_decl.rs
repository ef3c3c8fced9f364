//! Attachment and variable declarations as written in a scenario document.

use serde::{Deserialize, Serialize};

/// A named list of string values usable from attachment declarations.
///
/// # Example RON
///
/// ```ron
/// VariableDecl(
///     name: "landUnits",
///     elements: ["infantry", "armour"],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariableDecl {
    /// Variable name without the surrounding `$` markers.
    pub name: String,

    /// Ordered values. An element naming an earlier variable (`$other$`)
    /// splices that variable's values in place.
    #[serde(default)]
    pub elements: Vec<String>,
}

/// One `name=value` option of an attachment declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionDecl {
    /// Option name as written (may be capitalised or a legacy name).
    pub name: String,

    /// Raw option value.
    pub value: String,

    /// Optional count, prepended to the value as `count:value`.
    #[serde(default)]
    pub count: Option<String>,
}

impl OptionDecl {
    /// Create an option without a count.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            count: None,
        }
    }

    /// Attach a count to this option.
    #[must_use]
    pub fn with_count(mut self, count: impl Into<String>) -> Self {
        self.count = Some(count.into());
        self
    }
}

/// Declaration of one attachment (or, with `foreach`, a family of them).
///
/// # Example RON
///
/// ```ron
/// AttachmentDecl(
///     name: "conditionAttachment_@player@_holds_capital",
///     attach_to: "@player@",
///     target_kind: "player",
///     class: "RulesAttachment",
///     foreach: Some("$players$"),
///     options: [
///         OptionDecl(name: "directOwnershipTerritories", value: "@capital@"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentDecl {
    /// Attachment name, may contain `@var@` placeholders.
    pub name: String,

    /// Name of the entity the attachment is attached to.
    pub attach_to: String,

    /// Entity category of the target (`unitType`, `territory`, `resource`,
    /// `territoryEffect`, `player`, `relationship`, `technology`).
    #[serde(default = "default_target_kind")]
    pub target_kind: String,

    /// Discriminant selecting the attachment variant.
    pub class: String,

    /// Foreach expression: `$a$:$b$` or `$a$^$b$`.
    #[serde(default)]
    pub foreach: Option<String>,

    /// Options in declaration order.
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// Unit types are the historical default target.
fn default_target_kind() -> String {
    "unitType".to_string()
}

impl AttachmentDecl {
    /// Create a declaration with no options.
    pub fn new(
        name: impl Into<String>,
        attach_to: impl Into<String>,
        target_kind: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            attach_to: attach_to.into(),
            target_kind: target_kind.into(),
            class: class.into(),
            foreach: None,
            options: Vec::new(),
        }
    }

    /// Set the foreach expression.
    #[must_use]
    pub fn with_foreach(mut self, foreach: impl Into<String>) -> Self {
        self.foreach = Some(foreach.into());
        self
    }

    /// Append an option.
    #[must_use]
    pub fn with_option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }
}
