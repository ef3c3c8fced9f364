//! Name-indexed entity tables.

use std::collections::HashMap;

use crate::error::{EntityKind, Result, ScenarioError};

/// Anything stored in a [`Registry`] is looked up by its name.
pub trait Named {
    /// The unique name of this entity.
    fn name(&self) -> &str;
}

/// Ordered table of named entities with a name index.
///
/// Entities are addressed by their insertion index, so an index handed out
/// by [`Registry::insert`] stays valid for the lifetime of the game.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    kind: EntityKind,
    items: Vec<T>,
    index: HashMap<String, u32>,
}

impl<T: Named> Registry<T> {
    /// Create an empty registry for one entity category.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry from entities whose names are known to be distinct.
    ///
    /// A repeated name resolves to its last occurrence.
    #[must_use]
    pub fn from_distinct(kind: EntityKind, items: Vec<T>) -> Self {
        let index = (0u32..)
            .zip(items.iter())
            .map(|(id, item)| (item.name().to_string(), id))
            .collect();
        Self { kind, items, index }
    }

    /// Add an entity, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Format`] if the name is already taken.
    pub fn insert(&mut self, item: T) -> Result<u32> {
        if self.index.contains_key(item.name()) {
            return Err(ScenarioError::Format(format!(
                "duplicate {} '{}'",
                self.kind,
                item.name()
            )));
        }
        let id = u32::try_from(self.items.len())
            .map_err(|_| ScenarioError::Format(format!("too many {} entries", self.kind)))?;
        self.index.insert(item.name().to_string(), id);
        self.items.push(item);
        Ok(id)
    }

    /// Get an entity by index.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize)
    }

    /// Get a mutable entity by index.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.items.get_mut(id as usize)
    }

    /// Find an entity index by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Find an entity index by name, failing with a missing-entity error.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MissingEntity`] if no entity has that name.
    pub fn require(&self, name: &str) -> Result<u32> {
        self.lookup(name)
            .ok_or_else(|| ScenarioError::missing(self.kind, name))
    }

    /// Iterate entities with their indices, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        (0u32..).zip(self.items.iter())
    }

    /// Iterate entities mutably, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(&'static str);

    impl Named for Thing {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut registry = Registry::new(EntityKind::Resource);
        assert_eq!(registry.insert(Thing("PUs")).unwrap(), 0);
        assert_eq!(registry.insert(Thing("oil")).unwrap(), 1);
        assert_eq!(registry.lookup("oil"), Some(1));
        assert_eq!(registry.get(0).map(Named::name), Some("PUs"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new(EntityKind::Resource);
        registry.insert(Thing("PUs")).unwrap();
        let err = registry.insert(Thing("PUs")).unwrap_err();
        assert!(matches!(err, ScenarioError::Format(_)));
    }

    #[test]
    fn test_require_reports_kind() {
        let registry: Registry<Thing> = Registry::new(EntityKind::Technology);
        let err = registry.require("radar").unwrap_err();
        assert_eq!(err.to_string(), "No technology named 'radar'");
    }
}
