use rusqlite::{Connection, OptionalExtension, params};

use crate::draft::Draft;
use crate::error::StorageError;
use crate::keys::DraftKey;
use crate::traits::DraftStore;

/// SQLite-backed draft store. Each context key maps to a single row holding
/// the JSON body; saves replace the row atomically.
#[derive(Debug)]
pub struct SqliteDraftStore {
    conn: Connection,
}

impl SqliteDraftStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl DraftStore for SqliteDraftStore {
    fn load(&self, key: &DraftKey) -> Result<Option<Draft>, StorageError> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM drafts WHERE store_key = ?1",
                params![key.as_store_key()],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            None => Ok(None),
            Some(body) => {
                let draft = serde_json::from_str(&body)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(Some(draft))
            }
        }
    }

    fn save(&mut self, key: &DraftKey, draft: &Draft) -> Result<(), StorageError> {
        let body = serde_json::to_string(draft)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO drafts (store_key, body, saved_at) VALUES (?1, ?2, ?3)",
            params![key.as_store_key(), body, draft.saved_at as i64],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &DraftKey) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM drafts WHERE store_key = ?1",
            params![key.as_store_key()],
        )?;
        Ok(())
    }
}
