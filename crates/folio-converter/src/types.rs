//! Request and response types for ingestion

use folio_domain::{Record, RecordId};
use serde::Serialize;

/// Request to ingest one source document
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Display name of the source, recorded under the provenance key
    pub source_name: String,

    /// Raw document bytes
    pub content: Vec<u8>,
}

impl IngestRequest {
    /// Create a request
    pub fn new(source_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            source_name: source_name.into(),
            content: content.into(),
        }
    }
}

/// A field that contributed nothing because its kind was not recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    /// Path of the field, e.g. `Items[0].Phone`
    pub path: String,

    /// Type name the service reported
    pub type_name: String,
}

/// Result of converting one analysis result
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The finished record
    pub record: Record,

    /// Number of analyzed documents merged into the record
    pub documents: usize,

    /// Fields that were skipped
    pub skipped: Vec<SkippedField>,
}

/// Result of an ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    /// Identifier the record was stored under
    pub record_id: String,

    /// Display name of the source
    pub source_name: String,

    /// Number of analyzed documents merged
    pub documents: usize,

    /// Number of keys in the stored record, reserved keys included
    pub entries: usize,

    /// Fields that were skipped
    pub skipped: Vec<SkippedField>,

    /// The stored record
    pub record: Record,
}

impl IngestOutcome {
    /// Whether the record id is a generated one rather than a field's value
    pub fn has_generated_id(&self) -> bool {
        RecordId::from_string(&self.record_id).is_ok()
    }
}
