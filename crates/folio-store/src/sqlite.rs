//! SQLite-backed record store

use crate::StoreError;
use folio_domain::{Record, RecordSink, DEFAULT_PROVENANCE_KEY};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// A record as it was written to the database
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// The record's `id`
    pub id: String,

    /// Value of the provenance key, if it was a string
    pub source_name: Option<String>,

    /// The record as JSON text, keys in record order
    pub body: String,

    /// Unix timestamp (seconds) of the last write
    pub stored_at: u64,
}

impl StoredRecord {
    /// Parse the body
    pub fn json(&self) -> Result<serde_json::Value, StoreError> {
        serde_json::from_str(&self.body)
            .map_err(|e| StoreError::InvalidData(format!("Stored body is not JSON: {}", e)))
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            source_name: row.get(1)?,
            body: row.get(2)?,
            stored_at: row.get::<_, i64>(3)? as u64,
        })
    }
}

/// SQLite-based implementation of RecordSink
///
/// SQLite connections are not thread-safe. Share a store between tasks by
/// wrapping it in a mutex.
pub struct SqliteRecordStore {
    conn: Connection,
    provenance_key: String,
}

impl SqliteRecordStore {
    /// Open (or create) a store at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use folio_store::SqliteRecordStore;
    ///
    /// let store = SqliteRecordStore::new("folio.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            provenance_key: DEFAULT_PROVENANCE_KEY.to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Read the source name from `key` instead of the default provenance key
    pub fn with_provenance_key(mut self, key: impl Into<String>) -> Self {
        self.provenance_key = key.into();
        self
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Fetch a stored record by id
    pub fn get(&self, id: &str) -> Result<Option<StoredRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, source_name, body, stored_at FROM records WHERE id = ?1",
                params![id],
                StoredRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Fetch a stored record by id, failing if it is absent
    pub fn require(&self, id: &str) -> Result<StoredRecord, StoreError> {
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Records stored for a source name, most recent first
    pub fn find_by_source(&self, source_name: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, source_name, body, stored_at FROM records
             WHERE source_name = ?1 ORDER BY stored_at DESC, id DESC",
        )?;
        let records = stmt
            .query_map(params![source_name], StoredRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl RecordSink for SqliteRecordStore {
    type Error = StoreError;

    fn upsert(&mut self, record: &Record) -> Result<(), Self::Error> {
        let id = record.id().ok_or_else(|| {
            StoreError::InvalidData("record has no string 'id' to store it under".to_string())
        })?;
        let source_name = record
            .get(&self.provenance_key)
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let body = record
            .to_json_string()
            .map_err(|e| StoreError::InvalidData(format!("Failed to serialize record: {}", e)))?;

        self.conn.execute(
            "INSERT INTO records (id, source_name, body, stored_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
             source_name = excluded.source_name, body = excluded.body, stored_at = excluded.stored_at",
            params![id, source_name, body, unix_now() as i64],
        )?;

        debug!("Upserted record {} ({} bytes)", id, body.len());
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::Value;

    fn record(id: &str, source: &str) -> Record {
        [("id", Value::from(id)), ("invoiceFile", Value::from(source))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_store_initialization() {
        let store = SqliteRecordStore::new(":memory:");
        assert!(store.is_ok(), "Store should initialize successfully");
        assert_eq!(store.unwrap().count().unwrap(), 0);
    }

    #[test]
    fn test_record_without_string_id_is_rejected() {
        let mut store = SqliteRecordStore::new(":memory:").unwrap();
        let record: Record = [("id", Value::Int64(7))].into_iter().collect();
        assert!(matches!(store.upsert(&record), Err(StoreError::InvalidData(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_require_missing() {
        let store = SqliteRecordStore::new(":memory:").unwrap();
        assert!(matches!(store.require("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_custom_provenance_key() {
        let mut store = SqliteRecordStore::new(":memory:")
            .unwrap()
            .with_provenance_key("sourceFile");
        let custom: Record = [("id", Value::from("r")), ("sourceFile", Value::from("b.pdf"))]
            .into_iter()
            .collect();
        store.upsert(&custom).unwrap();
        assert_eq!(store.get("r").unwrap().unwrap().source_name.as_deref(), Some("b.pdf"));

        store.upsert(&record("s", "c.pdf")).unwrap();
        assert_eq!(store.get("s").unwrap().unwrap().source_name, None);
    }
}
