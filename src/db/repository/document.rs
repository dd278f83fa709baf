use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::DatabaseError;

use super::{Entity, Repository};

/// SQLite backend storing each entity as a JSON document in `entities`.
///
/// All repositories opened on the same connection share it through the
/// mutex; SQLite serializes writers anyway.
pub struct SqliteRepository<T> {
    conn: Arc<Mutex<Connection>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> SqliteRepository<T> {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

impl<T> Repository<T> for SqliteRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    fn get(&self, id: &str) -> Result<Option<T>, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM entities WHERE kind = ?1 AND id = ?2",
                params![T::KIND, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|b| serde_json::from_str(&b).map_err(DatabaseError::from))
            .transpose()
    }

    fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let mut stmt = conn.prepare("SELECT body FROM entities WHERE kind = ?1 ORDER BY seq")?;
        let rows = stmt.query_map(params![T::KIND], |row| row.get::<_, String>(0))?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(serde_json::from_str(&row?)?);
        }
        Ok(entities)
    }

    fn save(&self, entity: &T) -> Result<(), DatabaseError> {
        let body = serde_json::to_string(entity)?;
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO entities (kind, id, body, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT (kind, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at",
            params![T::KIND, entity.id(), body],
        )?;
        Ok(())
    }
}
