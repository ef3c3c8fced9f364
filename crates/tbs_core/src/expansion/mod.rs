//! Scenario templating: variable lists and `foreach` expansion.
//!
//! Declarations are expanded before any attachment is built. Foreach
//! placeholders (`@name@`) are substituted here; whole-list references
//! (`$name$`) are substituted by the builder once option names are known.

mod foreach;
mod variables;

pub use foreach::{expand, ExpandedDeclaration, ExpandedOption, ForeachSpec};
pub use variables::VariableTable;
