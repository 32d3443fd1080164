//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the conversion core and the
//! infrastructure around it. Implementations live in other crates.

use crate::Record;

/// Trait for persisting finished records
///
/// Implemented by the infrastructure layer (folio-store)
pub trait RecordSink {
    /// Error type for sink operations
    type Error;

    /// Store a record, replacing any record with the same id
    fn upsert(&mut self, record: &Record) -> Result<(), Self::Error>;
}
