use std::collections::BTreeMap;

use crate::entity::Entity;
use crate::prelude::{DeriveError, DeriveResult};

/// Append-only registry of one flight run's entities.
///
/// An entry is written exactly once and never mutated; the store is dropped at
/// the end of the run.
#[derive(Debug, Clone, Default)]
pub struct FlightStore {
    entities: BTreeMap<String, Entity>,
}

impl FlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Into<Entity>) -> DeriveResult<()> {
        let entity = entity.into();
        let name = entity.name().to_string();
        if self.entities.contains_key(&name) {
            return Err(DeriveError::AlreadyWritten(name));
        }
        self.entities.insert(name, entity);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(name, entity)| (name.as_str(), entity))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for FlightStore {
    /// Later duplicates are ignored so the first write wins.
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut store = FlightStore::new();
        for entity in iter {
            let _ = store.insert(entity);
        }
        store
    }
}
