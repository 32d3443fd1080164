//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use folio_analysis::AnalysisConfig;
use folio_converter::ConverterConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Analysis service settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Record building settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Record store settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Analysis service settings; the key is never read from the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSettings {
    /// Service endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model to analyze with
    #[serde(default)]
    pub model_id: Option<String>,

    /// API version
    #[serde(default)]
    pub api_version: Option<String>,

    /// Delay between polls (milliseconds)
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// Polls before giving up
    #[serde(default)]
    pub max_polls: Option<u32>,

    /// Submission attempts
    #[serde(default)]
    pub max_retries: Option<u32>,
}

/// Record store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    /// Database path; defaults to `~/.folio/records.db`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Text format
    Text,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(format: crate::cli::CliFormat) -> Self {
        match format {
            crate::cli::CliFormat::Text => OutputFormat::Text,
            crate::cli::CliFormat::Json => OutputFormat::Json,
            crate::cli::CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl Config {
    /// Directory holding the default config file and database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".folio"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or the default path; missing files give defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config
                .converter
                .validate()
                .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Database path: the override, then the config file, then the default.
    pub fn database_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::dir()?.join("records.db")),
        }
    }

    /// Build the analysis client configuration.
    ///
    /// Flag values win over the file. The result is validated here so a missing
    /// endpoint or key fails before any document is read.
    pub fn analysis_config(
        &self,
        endpoint: Option<&str>,
        key: Option<&str>,
        model: Option<&str>,
    ) -> Result<AnalysisConfig> {
        let endpoint = endpoint
            .map(str::to_string)
            .or_else(|| self.analysis.endpoint.clone())
            .unwrap_or_default();
        let mut config = AnalysisConfig::new(endpoint, key.unwrap_or_default());

        let settings = &self.analysis;
        if let Some(model_id) = model.map(str::to_string).or_else(|| settings.model_id.clone()) {
            config.model_id = model_id;
        }
        if let Some(api_version) = &settings.api_version {
            config.api_version = api_version.clone();
        }
        if let Some(ms) = settings.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(polls) = settings.max_polls {
            config.max_polls = polls;
        }
        if let Some(retries) = settings.max_retries {
            config.max_retries = retries;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Text,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}
