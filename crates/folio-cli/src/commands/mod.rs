//! Command implementations.

pub mod convert;
pub mod ingest;
pub mod show;

pub use self::convert::execute_convert;
pub use self::ingest::execute_ingest;
pub use self::show::execute_show;

use crate::error::Result;
use folio_store::SqliteRecordStore;
use std::fs;
use std::path::Path;

/// Open the record store for writing, creating its directory if needed
pub(crate) fn open_store(db: &Path, provenance_key: &str) -> Result<SqliteRecordStore> {
    if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(SqliteRecordStore::new(db)?.with_provenance_key(provenance_key))
}
