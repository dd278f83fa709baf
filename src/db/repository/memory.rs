use std::sync::RwLock;

use crate::db::DatabaseError;

use super::{Entity, Repository};

/// Process-local backend. Contents vanish with the process.
pub struct MemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn get(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let items = self.items.read().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let items = self.items.read().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(items.clone())
    }

    fn save(&self, entity: &T) -> Result<(), DatabaseError> {
        let mut items = self.items.write().map_err(|_| DatabaseError::LockPoisoned)?;
        match items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(existing) => *existing = entity.clone(),
            None => items.push(entity.clone()),
        }
        Ok(())
    }
}
