//! Folio Analysis Layer
//!
//! Talks to the external document analysis service and exposes its results in
//! a typed wire model.
//!
//! # Architecture
//!
//! This crate provides implementations of the [`DocumentAnalyzer`] trait:
//!
//! - `FormRecognizerClient`: the prebuilt-model REST API over `reqwest`
//! - `MockAnalyzer`: a canned result for tests and offline conversion
//!
//! # Examples
//!
//! ```
//! use folio_analysis::{DocumentAnalyzer, MockAnalyzer};
//!
//! let analyzer = MockAnalyzer::from_json(r#"{"documents": []}"#).unwrap();
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let result = runtime.block_on(analyzer.analyze(b"%PDF")).unwrap();
//! assert!(result.documents.is_empty());
//! assert_eq!(analyzer.call_count(), 1);
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
#[allow(missing_docs)]
pub mod wire;

use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use client::FormRecognizerClient;
pub use config::AnalysisConfig;
pub use wire::{AnalyzeResult, AnalyzedDocument, RawField};

/// Errors that can occur while analyzing a document
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A required setting is absent
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// A setting is present but unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service answered with an error status
    #[error("Service returned HTTP {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The analysis itself failed on the service side
    #[error("Analysis failed ({code}): {message}")]
    Failed {
        /// Service error code
        code: String,
        /// Service error message
        message: String,
    },

    /// The operation did not finish in time
    #[error("Analysis did not finish after {0} polls")]
    Timeout(u32),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("Analysis error: {0}")]
    Other(String),
}

/// Something that can turn document bytes into an analysis result
#[allow(async_fn_in_trait)]
pub trait DocumentAnalyzer {
    /// Analyze one document
    async fn analyze(&self, content: &[u8]) -> Result<AnalyzeResult, AnalysisError>;

    /// Identifier of the model producing the results
    fn model_id(&self) -> &str;
}

/// Mock analyzer for deterministic testing
///
/// Returns the same result for every document without any network calls.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    result: AnalyzeResult,
    failure: Option<String>,
    call_count: Arc<Mutex<usize>>,
}

impl MockAnalyzer {
    /// Create a mock that always returns `result`
    pub fn new(result: AnalyzeResult) -> Self {
        Self {
            result,
            failure: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock from service JSON (operation envelope or bare result)
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        AnalyzeResult::from_json(json)
            .map(Self::new)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))
    }

    /// Create a mock whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: AnalyzeResult::default(),
            failure: Some(message.into()),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `analyze` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentAnalyzer for MockAnalyzer {
    async fn analyze(&self, _content: &[u8]) -> Result<AnalyzeResult, AnalysisError> {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        match &self.failure {
            Some(message) => Err(AnalysisError::Other(message.clone())),
            None => Ok(self.result.clone()),
        }
    }

    fn model_id(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_result() {
        let analyzer = MockAnalyzer::from_json(
            r#"{"documents": [{"fields": {"Total": {"type": "number", "valueNumber": 3.5}}}]}"#,
        )
        .unwrap();

        let result = analyzer.analyze(b"bytes").await.unwrap();
        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.documents[0].fields[0].1.value_number, Some(3.5));
    }

    #[tokio::test]
    async fn test_mock_call_count_is_shared_by_clones() {
        let analyzer = MockAnalyzer::new(AnalyzeResult::default());
        let clone = analyzer.clone();

        analyzer.analyze(b"a").await.unwrap();
        clone.analyze(b"b").await.unwrap();

        assert_eq!(analyzer.call_count(), 2);
        assert_eq!(clone.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let analyzer = MockAnalyzer::failing("service down");
        let result = analyzer.analyze(b"a").await;
        assert!(matches!(result, Err(AnalysisError::Other(ref m)) if m == "service down"));
    }

    #[test]
    fn test_mock_rejects_bad_json() {
        assert!(matches!(
            MockAnalyzer::from_json("not json"),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::Service {
            status: 401,
            message: "Access denied".to_string(),
        };
        assert_eq!(err.to_string(), "Service returned HTTP 401: Access denied");
        assert_eq!(
            AnalysisError::MissingProperty("FR_KEY".into()).to_string(),
            "Missing property: FR_KEY"
        );
    }
}
