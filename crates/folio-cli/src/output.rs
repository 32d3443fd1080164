//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use folio_converter::{IngestOutcome, SkippedField};
use folio_domain::{Record, Value};
use folio_store::StoredRecord;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the outcome of one ingestion.
    pub fn ingest_outcome(&self, outcome: &IngestOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(outcome.record_id.clone()),
            OutputFormat::Text => {
                let mut out = self.success(&format!(
                    "{} → record {} ({} keys from {} document(s))",
                    outcome.source_name, outcome.record_id, outcome.entries, outcome.documents
                ));
                for line in self.skipped(&outcome.skipped) {
                    out.push('\n');
                    out.push_str(&line);
                }
                Ok(out)
            }
        }
    }

    /// Format a converted record.
    pub fn record(&self, record: &Record) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.id().unwrap_or_default().to_string()),
            OutputFormat::Text => Ok(self.record_lines(record.iter())),
        }
    }

    /// Format a record read back from the store.
    pub fn stored_record(&self, stored: &StoredRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(stored.body.clone()),
            OutputFormat::Quiet => Ok(stored.id.clone()),
            OutputFormat::Text => {
                let header = self.info(&format!(
                    "Record {} from {} (stored at {})",
                    stored.id,
                    stored.source_name.as_deref().unwrap_or("unknown source"),
                    stored.stored_at
                ));
                let body = stored.json()?;
                let lines = match &body {
                    serde_json::Value::Object(map) => map
                        .iter()
                        .map(|(k, v)| format!("{}: {}", self.colorize(k, "cyan"), v))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    other => other.to_string(),
                };
                Ok(format!("{}\n{}", header, lines))
            }
        }
    }

    /// Lines warning about skipped fields; empty outside text output.
    pub fn skipped(&self, skipped: &[SkippedField]) -> Vec<String> {
        if self.format != OutputFormat::Text {
            return Vec::new();
        }
        skipped
            .iter()
            .map(|s| self.warning(&format!("Skipped {} (type '{}')", s.path, s.type_name)))
            .collect()
    }

    fn record_lines<'a>(&self, entries: impl Iterator<Item = (&'a str, &'a Value)>) -> String {
        entries
            .map(|(k, v)| format!("{}: {}", self.colorize(k, "cyan"), v))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
