//! Configuration for record building

use folio_domain::{DEFAULT_PROVENANCE_KEY, ID_KEY};
use serde::{Deserialize, Serialize};

/// What happens when a converted field is named like a reserved key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedKeyPolicy {
    /// Converted fields overwrite `id` and the provenance key
    #[default]
    LastWriteWins,
    /// Converted fields colliding with a reserved key are dropped
    Protect,
}

/// Which analyzed documents of a result feed the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSelection {
    /// Merge every document, in result order
    #[default]
    All,
    /// Only the first document
    First,
}

/// Configuration for the RecordBuilder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Reserved key that records the source document's name
    #[serde(default = "default_provenance_key")]
    pub provenance_key: String,

    /// Collision policy for reserved keys
    #[serde(default)]
    pub reserved_keys: ReservedKeyPolicy,

    /// Documents to merge into the record
    #[serde(default)]
    pub documents: DocumentSelection,
}

impl ConverterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.provenance_key.trim().is_empty() {
            return Err("provenance_key must not be empty".to_string());
        }
        if self.provenance_key == ID_KEY {
            return Err(format!("provenance_key cannot be '{}'", ID_KEY));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            provenance_key: default_provenance_key(),
            reserved_keys: ReservedKeyPolicy::default(),
            documents: DocumentSelection::default(),
        }
    }
}

fn default_provenance_key() -> String {
    DEFAULT_PROVENANCE_KEY.to_string()
}
