//! Data structures for scenario documents.
//!
//! This module contains the typed form of a scenario definition: entity
//! declarations, variable lists, attachment declarations and the initial
//! game state. All structs are designed to be deserialized from RON files.
//!
//! **Note:** Apart from [`ScenarioDocument::load`], this module only defines
//! data types. Turning a document into live game data is handled by
//! [`crate::loader`].

mod attachment_decl;
mod scenario_document;

pub use attachment_decl::{AttachmentDecl, OptionDecl, VariableDecl};
pub use scenario_document::{
    InitialState, OwnerInit, PropertyDecl, RelationshipInit, ScenarioDocument, TechInit,
    TerritoryDecl, UnitInit,
};
