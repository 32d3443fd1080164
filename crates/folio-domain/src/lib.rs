//! Folio Domain Layer
//!
//! Core types shared by every other crate: the typed field trees that document
//! analysis produces, the generic values they convert into, and the flat records
//! that end up in the document store.
//!
//! ## Key Concepts
//!
//! - **DocumentField**: one typed, possibly composite, extracted value
//! - **Value**: a generic value as a schemaless store sees it
//! - **Record**: the flat output document, with reserved `id` and provenance keys
//!
//! ## Architecture
//!
//! - Pure data and small helpers only
//! - No I/O; persistence is reached through [`traits::RecordSink`]

#![warn(clippy::all)]

pub mod field;
pub mod record;
pub mod traits;
pub mod value;

// Re-exports for convenience
pub use field::{AddressValue, CurrencyValue, DocumentField, FieldKind, FieldValue};
pub use record::{Entry, Record, RecordId, DEFAULT_PROVENANCE_KEY, ID_KEY};
pub use traits::RecordSink;
pub use value::{Mapping, Value};
