//! HTTP client for the document analysis service
//!
//! Analysis is a long-running operation: the document is submitted once, the
//! service answers `202 Accepted` with an `Operation-Location` URL, and that URL
//! is polled until the operation reaches a terminal state.
//!
//! # Examples
//!
//! ```no_run
//! use folio_analysis::{AnalysisConfig, DocumentAnalyzer, FormRecognizerClient};
//!
//! # async fn example() -> Result<(), folio_analysis::AnalysisError> {
//! let config = AnalysisConfig::from_env()?;
//! let client = FormRecognizerClient::new(config)?;
//! let result = client.analyze(&std::fs::read("invoice.pdf").unwrap()).await?;
//! println!("{} documents", result.documents.len());
//! # Ok(())
//! # }
//! ```

use crate::config::AnalysisConfig;
use crate::wire::{AnalyzeOperation, AnalyzeResult, OperationStatus};
use crate::{AnalysisError, DocumentAnalyzer};
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Header carrying the subscription key
const KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Header carrying the URL to poll
const OPERATION_LOCATION: &str = "operation-location";

/// Client for the prebuilt document models
pub struct FormRecognizerClient {
    config: AnalysisConfig,
    client: reqwest::Client,
}

impl FormRecognizerClient {
    /// Create a client; the configuration is validated eagerly
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AnalysisError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// The configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Submit a document, retrying throttled and server-side failures
    ///
    /// Returns the operation URL to poll.
    async fn submit(&self, content: &[u8]) -> Result<String, AnalysisError> {
        let url = self.config.analyze_url();

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self
                .client
                .post(&url)
                .header(KEY_HEADER, &self.config.key)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(content.to_vec())
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::ACCEPTED {
                        return operation_location(response.headers());
                    }

                    let retryable =
                        status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = AnalysisError::Service {
                        status: status.as_u16(),
                        message: body,
                    };
                    if !retryable {
                        return Err(error);
                    }
                    warn!("Analyze request returned HTTP {}, retrying", status);
                    last_error = Some(error);
                }
                Err(e) => {
                    warn!("Analyze request failed: {}", e);
                    last_error = Some(AnalysisError::Communication(format!(
                        "Request failed: {}",
                        e
                    )));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| AnalysisError::Communication("Max retries exceeded".to_string())))
    }

    /// Poll an operation until it succeeds, fails, or runs out of polls
    async fn poll(&self, operation_url: &str) -> Result<AnalyzeResult, AnalysisError> {
        for poll in 1..=self.config.max_polls {
            let response = self
                .client
                .get(operation_url)
                .header(KEY_HEADER, &self.config.key)
                .send()
                .await
                .map_err(|e| AnalysisError::Communication(format!("Poll failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(AnalysisError::Service {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let delay = retry_after(response.headers()).unwrap_or(self.config.poll_interval());
            let body = response
                .text()
                .await
                .map_err(|e| AnalysisError::Communication(format!("Failed to read body: {}", e)))?;
            let operation: AnalyzeOperation = serde_json::from_str(&body).map_err(|e| {
                AnalysisError::InvalidResponse(format!("Failed to parse operation: {}", e))
            })?;

            debug!("Poll {}: operation status {:?}", poll, operation.status);

            match operation.status {
                OperationStatus::Succeeded => return succeeded_result(&operation, &body),
                OperationStatus::Failed | OperationStatus::Canceled => {
                    let (code, message) = operation
                        .error
                        .map(|e| (e.code, e.message))
                        .unwrap_or_else(|| {
                            (format!("{:?}", operation.status), "no error detail".to_string())
                        });
                    return Err(AnalysisError::Failed { code, message });
                }
                OperationStatus::NotStarted | OperationStatus::Running => {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(AnalysisError::Timeout(self.config.max_polls))
    }
}

impl DocumentAnalyzer for FormRecognizerClient {
    async fn analyze(&self, content: &[u8]) -> Result<AnalyzeResult, AnalysisError> {
        info!(
            "Submitting {} bytes to model '{}'",
            content.len(),
            self.config.model_id
        );
        let operation_url = self.submit(content).await?;
        debug!("Polling operation at {}", operation_url);
        let result = self.poll(&operation_url).await?;
        info!("Analysis finished with {} documents", result.documents.len());
        Ok(result)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

fn operation_location(headers: &HeaderMap) -> Result<String, AnalysisError> {
    headers
        .get(OPERATION_LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            AnalysisError::InvalidResponse("Missing Operation-Location header".to_string())
        })
}

/// Result of a succeeded operation, re-parsed from text so field order is kept
fn succeeded_result(
    operation: &AnalyzeOperation,
    body: &str,
) -> Result<AnalyzeResult, AnalysisError> {
    if operation.analyze_result.is_none() {
        return Err(AnalysisError::InvalidResponse(
            "Operation succeeded without an analyzeResult".to_string(),
        ));
    }
    AnalyzeResult::from_json(body)
        .map_err(|e| AnalysisError::InvalidResponse(format!("Failed to parse result: {}", e)))
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_client_requires_valid_config() {
        let result = FormRecognizerClient::new(AnalysisConfig::new("", "key"));
        assert!(matches!(result, Err(AnalysisError::MissingProperty(_))));
    }

    #[test]
    fn test_client_creation() {
        let client =
            FormRecognizerClient::new(AnalysisConfig::new("https://example.com", "key")).unwrap();
        assert_eq!(client.model_id(), "prebuilt-invoice");
    }

    #[test]
    fn test_operation_location_header() {
        let mut headers = HeaderMap::new();
        assert!(operation_location(&headers).is_err());

        headers.insert(
            OPERATION_LOCATION,
            HeaderValue::from_static("https://example.com/operations/1"),
        );
        assert_eq!(
            operation_location(&headers).unwrap(),
            "https://example.com/operations/1"
        );
    }

    #[test]
    fn test_succeeded_operation_requires_result() {
        let body = r#"{"status": "succeeded"}"#;
        let operation: AnalyzeOperation = serde_json::from_str(body).unwrap();
        assert!(matches!(
            succeeded_result(&operation, body),
            Err(AnalysisError::InvalidResponse(_))
        ));

        let body = r#"{"status": "succeeded", "analyzeResult": {"documents": [{"fields": {}}]}}"#;
        let operation: AnalyzeOperation = serde_json::from_str(body).unwrap();
        assert_eq!(succeeded_result(&operation, body).unwrap().documents.len(), 1);
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(retry_after(&headers), None);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Nothing listens on port 9 locally
        let mut config = AnalysisConfig::new("http://127.0.0.1:9", "key");
        config.max_retries = 1;
        let client = FormRecognizerClient::new(config).unwrap();

        let result = client.analyze(b"%PDF-1.4").await;
        assert!(matches!(result, Err(AnalysisError::Communication(_))));
    }

    // Requires FR_ENDPOINT and FR_KEY pointing at a live resource
    #[tokio::test]
    #[ignore]
    async fn test_analyze_integration() {
        let client = FormRecognizerClient::new(AnalysisConfig::from_env().unwrap()).unwrap();
        let pdf = std::fs::read("tests/fixtures/invoice.pdf").unwrap();
        let result = client.analyze(&pdf).await.unwrap();
        assert!(!result.documents.is_empty());
    }
}
