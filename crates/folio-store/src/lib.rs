//! Folio Storage Layer
//!
//! Implements the RecordSink trait on top of SQLite.
//!
//! # Architecture
//!
//! - One `records` table keyed by the record's `id`; writing an existing id
//!   replaces the stored document
//! - The record body is kept as JSON text, in the record's own key order
//! - [`MemorySink`] keeps records in memory for tests and dry runs
//!
//! # Examples
//!
//! ```
//! use folio_domain::{Record, RecordSink, Value};
//! use folio_store::SqliteRecordStore;
//!
//! let mut store = SqliteRecordStore::new(":memory:").unwrap();
//! let record: Record = [("id", Value::from("r-1")), ("invoiceFile", Value::from("a.pdf"))]
//!     .into_iter()
//!     .collect();
//! store.upsert(&record).unwrap();
//! assert_eq!(store.count().unwrap(), 1);
//! ```

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::MemorySink;
pub use sqlite::{SqliteRecordStore, StoredRecord};

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Record cannot be stored or read back
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
