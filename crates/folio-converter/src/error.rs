//! Error types for conversion and ingestion

use folio_analysis::AnalysisError;
use folio_domain::FieldKind;
use thiserror::Error;

/// Errors that fail the conversion of a whole document
///
/// Unrecognized field kinds are not errors; they contribute nothing and are
/// reported in [`crate::Conversion::skipped`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// A composite kind was declared without its payload
    #[error("Malformed {kind} field '{path}': declared {kind} but no value was provided")]
    MalformedCompositeValue {
        /// Dotted path of the field, e.g. `Items[0].Amount`
        path: String,
        /// Declared kind
        kind: FieldKind,
    },

    /// A scalar payload could not be read as its declared kind
    #[error("Invalid {kind} field '{path}': {reason}")]
    InvalidScalar {
        /// Dotted path of the field
        path: String,
        /// Declared kind
        kind: FieldKind,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors that can occur while ingesting a document
#[derive(Error, Debug)]
pub enum IngestError {
    /// The analysis collaborator failed
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// The analysis result could not be converted
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// The record could not be stored
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
