//! Folio Converter
//!
//! Turns the typed field trees of a document analysis into flat records.
//!
//! # Overview
//!
//! Every analyzed document is a mapping from field name to a typed, possibly
//! nested field. Conversion walks each top-level field and folds what it yields
//! into one record per source document, seeded with a generated `id` and the
//! source's name under the provenance key.
//!
//! # Architecture
//!
//! ```text
//! bytes → DocumentAnalyzer → AnalyzeResult → lower → DocumentField
//!       → convert → entries → RecordBuilder → Record → RecordSink
//! ```
//!
//! # Key Features
//!
//! - **Flattening**: map children are hoisted to the record's top level
//! - **Lists**: collected under the list's own name, one mapping per item
//! - **Money**: currency amounts rendered as fixed two-digit display text
//! - **Reserved keys**: collisions with `id` and the provenance key follow an
//!   explicit [`ReservedKeyPolicy`]
//!
//! # Example Usage
//!
//! ```no_run
//! use folio_analysis::MockAnalyzer;
//! use folio_converter::{ConverterConfig, IngestRequest, Ingestor};
//! use folio_store::SqliteRecordStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = MockAnalyzer::from_json(r#"{"documents": []}"#)?;
//! let store = SqliteRecordStore::new("folio.db")?;
//! let ingestor = Ingestor::new(analyzer, store, ConverterConfig::default())?;
//!
//! let outcome = ingestor
//!     .ingest(IngestRequest::new("inv-001.pdf", std::fs::read("inv-001.pdf")?))
//!     .await?;
//!
//! println!("Stored {} with {} keys", outcome.record_id, outcome.entries);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod config;
mod converter;
mod error;
mod ingest;
pub mod lower;
mod types;


pub use builder::RecordBuilder;
pub use config::{ConverterConfig, DocumentSelection, ReservedKeyPolicy};
pub use converter::{address_mapping, convert, format_money};
pub use error::{ConvertError, IngestError};
pub use ingest::Ingestor;
pub use types::{Conversion, IngestOutcome, IngestRequest, SkippedField};
