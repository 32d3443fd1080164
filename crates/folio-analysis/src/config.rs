//! Configuration for the analysis client

use crate::AnalysisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the service endpoint
pub const ENDPOINT_VAR: &str = "FR_ENDPOINT";

/// Environment variable holding the subscription key
pub const KEY_VAR: &str = "FR_KEY";

/// Prebuilt model used for invoices
pub const DEFAULT_MODEL_ID: &str = "prebuilt-invoice";

/// Service API version the wire model follows
pub const DEFAULT_API_VERSION: &str = "2023-07-31";

/// Settings for talking to the document analysis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Service endpoint, e.g. `https://my-resource.cognitiveservices.azure.com`
    pub endpoint: String,

    /// Subscription key; never written back out
    #[serde(default, skip_serializing)]
    pub key: String,

    /// Model to analyze with
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// API version query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Delay between polls of a running operation (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Polls before giving up on an operation
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    /// Attempts for submitting a document
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout for a single HTTP request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl AnalysisConfig {
    /// Create a configuration with default tuning
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            model_id: default_model_id(),
            api_version: default_api_version(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Read endpoint and key from `FR_ENDPOINT` and `FR_KEY`
    ///
    /// Fails on the first missing variable, before any request is made.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let endpoint = required_env(ENDPOINT_VAR)?;
        let key = required_env(KEY_VAR)?;
        Ok(Self::new(endpoint, key))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.endpoint.trim().is_empty() {
            return Err(AnalysisError::MissingProperty(ENDPOINT_VAR.to_string()));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(AnalysisError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.key.trim().is_empty() {
            return Err(AnalysisError::MissingProperty(KEY_VAR.to_string()));
        }
        if self.model_id.is_empty() {
            return Err(AnalysisError::Config("model_id must not be empty".to_string()));
        }
        if self.max_polls == 0 {
            return Err(AnalysisError::Config("max_polls must be greater than 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(AnalysisError::Config("max_retries must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// URL that starts an analysis
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.model_id,
            self.api_version
        )
    }

    /// Delay between polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout for a single request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn required_env(name: &str) -> Result<String, AnalysisError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AnalysisError::MissingProperty(name.to_string())),
    }
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_max_polls() -> u32 {
    120
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}
