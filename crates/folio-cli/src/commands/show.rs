//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::Result;
use crate::output::Formatter;
use folio_store::SqliteRecordStore;
use std::path::Path;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, db: &Path, formatter: &Formatter) -> Result<()> {
    let store = SqliteRecordStore::new(db)?;
    let stored = store.require(&args.id)?;
    println!("{}", formatter.stored_record(&stored)?);
    Ok(())
}
