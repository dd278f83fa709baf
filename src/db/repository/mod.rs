//! Repository layer: entity-scoped storage behind a single interface.
//!
//! The portal store only ever talks to `Repository<T>`, so the in-memory
//! backend and the SQLite document backend are interchangeable.

mod document;
mod memory;

use super::DatabaseError;

pub use document::*;
pub use memory::*;

/// A stored entity with a stable string identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Storage discriminator, unique per entity type.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Base repository operations for any entity
pub trait Repository<T: Entity>: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<T>, DatabaseError>;

    /// All entities in first-insertion order.
    fn list(&self) -> Result<Vec<T>, DatabaseError>;

    /// Insert, or replace the entity with the same id in place.
    fn save(&self, entity: &T) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::{Gender, Urgency};
    use crate::models::Patient;

    fn patient(id: &str, name: &str) -> Patient {
        Patient {
            id: id.into(),
            name: name.into(),
            patient_number: Some("PT-001".into()),
            gender: Some(Gender::Female),
            last_visit: Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(),
            reason: "Checkup".into(),
            priority: Urgency::Low,
            assigned_doctor: "dr-james".into(),
            chat_enabled: true,
            unread_messages: 0,
            medical_history: Vec::new(),
        }
    }

    fn backends() -> Vec<(&'static str, Box<dyn Repository<Patient>>)> {
        let conn = Arc::new(Mutex::new(open_memory_database().unwrap()));
        vec![
            (
                "memory",
                Box::new(MemoryRepository::<Patient>::new()) as Box<dyn Repository<Patient>>,
            ),
            ("sqlite", Box::new(SqliteRepository::<Patient>::new(conn))),
        ]
    }

    #[test]
    fn get_missing_returns_none() {
        for (name, repo) in backends() {
            assert!(repo.get("nope").unwrap().is_none(), "{name}");
        }
    }

    #[test]
    fn save_then_get() {
        for (name, repo) in backends() {
            repo.save(&patient("p1", "Sarah Wilson")).unwrap();
            let found = repo.get("p1").unwrap().unwrap();
            assert_eq!(found.name, "Sarah Wilson", "{name}");
        }
    }

    #[test]
    fn save_existing_replaces_in_place() {
        for (name, repo) in backends() {
            repo.save(&patient("p1", "First")).unwrap();
            repo.save(&patient("p2", "Second")).unwrap();
            let mut updated = patient("p1", "First");
            updated.chat_enabled = false;
            repo.save(&updated).unwrap();

            let all = repo.list().unwrap();
            assert_eq!(all.len(), 2, "{name}");
            assert_eq!(all[0].id, "p1", "{name}");
            assert!(!all[0].chat_enabled, "{name}");
            assert_eq!(all[1].id, "p2", "{name}");
        }
    }
}
