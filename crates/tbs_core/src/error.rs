//! Error types for scenario loading and condition evaluation.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`ScenarioError`].
pub type Result<T> = std::result::Result<T, ScenarioError>;

/// Categories of named things a scenario can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A unit type.
    UnitType,
    /// A territory on the map.
    Territory,
    /// A resource.
    Resource,
    /// A territory effect.
    TerritoryEffect,
    /// A player.
    Player,
    /// A relationship type.
    RelationshipType,
    /// A technology.
    Technology,
    /// A condition attachment referenced by name.
    Condition,
}

impl EntityKind {
    /// Human-readable label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitType => "unit type",
            Self::Territory => "territory",
            Self::Resource => "resource",
            Self::TerritoryEffect => "territory effect",
            Self::Player => "player",
            Self::RelationshipType => "relationship type",
            Self::Technology => "technology",
            Self::Condition => "condition",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Top-level error type for scenario loading and evaluation.
///
/// Every load-time variant is fatal: the scenario is rejected as a whole.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Malformed document content, foreach or variable syntax.
    #[error("Invalid scenario format: {0}")]
    Format(String),

    /// A declaration references an entity that does not exist.
    #[error("No {kind} named '{name}'")]
    MissingEntity {
        /// Category that was searched.
        kind: EntityKind,
        /// Name that was not found.
        name: String,
    },

    /// The attachment class discriminant is not supported.
    #[error("Attachment of type '{0}' could not be instantiated")]
    UnknownAttachmentVariant(String),

    /// An option name is not part of the attachment's property schema.
    #[error("Missing property definition for option '{option}' in attachment '{attachment}'")]
    UnknownProperty {
        /// Option name after legacy remapping.
        option: String,
        /// Attachment being configured.
        attachment: String,
    },

    /// A property value failed the property's own validation.
    #[error("Invalid value '{value}' for property '{property}': {reason}")]
    InvalidPropertyValue {
        /// Property name.
        property: String,
        /// Raw value that was rejected.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A condition references something that does not exist, found during
    /// post-load validation.
    #[error("Scenario integrity violated by attachment '{attachment}': {source}")]
    Integrity {
        /// Attachment that holds the bad reference.
        attachment: String,
        /// Underlying lookup failure.
        #[source]
        source: Box<ScenarioError>,
    },

    /// A condition is reachable from itself through its sub-conditions.
    #[error("Condition '{0}' is part of a sub-condition cycle")]
    CyclicCondition(String),

    /// A property setter failed while applying a declaration.
    #[error("map name: '{map}', failed setting values for attachment '{attachment}' (declared as '{declaration}'): {source}")]
    InAttachment {
        /// Scenario/map identifier.
        map: String,
        /// Declaration name before foreach substitution.
        declaration: String,
        /// Concrete attachment name.
        attachment: String,
        /// Setter failure.
        #[source]
        source: Box<ScenarioError>,
    },

    /// Failed to read a scenario file.
    #[error("Failed to read scenario file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a RON scenario document.
    #[error("Failed to parse scenario '{path}': {source}")]
    Parse {
        /// Path (or label) of the document.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },
}

impl ScenarioError {
    /// Shorthand for [`ScenarioError::MissingEntity`].
    pub fn missing(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::MissingEntity {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for [`ScenarioError::InvalidPropertyValue`].
    pub fn invalid(
        property: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPropertyValue {
            property: property.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error as an integrity fault of the named attachment.
    #[must_use]
    pub fn in_integrity_check(self, attachment: impl Into<String>) -> Self {
        Self::Integrity {
            attachment: attachment.into(),
            source: Box::new(self),
        }
    }
}
