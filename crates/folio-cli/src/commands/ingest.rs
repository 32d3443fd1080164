//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_analysis::FormRecognizerClient;
use folio_converter::{IngestRequest, Ingestor};
use folio_store::SqliteRecordStore;
use std::fs;
use std::path::Path;
use tracing::error;

/// Execute the ingest command.
pub async fn execute_ingest(
    args: IngestArgs,
    config: &Config,
    db: &Path,
    formatter: &Formatter,
) -> Result<()> {
    // Fail on missing endpoint or key before touching any file
    let analysis = config.analysis_config(
        args.endpoint.as_deref(),
        args.key.as_deref(),
        args.model.as_deref(),
    )?;
    let client = FormRecognizerClient::new(analysis)?;

    let store = super::open_store(db, &config.converter.provenance_key)?;
    let ingestor = Ingestor::new(client, store, config.converter.clone())?;

    let total = args.files.len();
    let mut failed = 0;

    for path in &args.files {
        match ingest_file(&ingestor, path).await {
            Ok(outcome) => println!("{}", formatter.ingest_outcome(&outcome)?),
            Err(e) => {
                failed += 1;
                error!("Failed to ingest {}: {}", path.display(), e);
                eprintln!("{}", formatter.error(&format!("{}: {}", path.display(), e)));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Batch { failed, total });
    }
    Ok(())
}

async fn ingest_file(
    ingestor: &Ingestor<FormRecognizerClient, SqliteRecordStore>,
    path: &Path,
) -> Result<folio_converter::IngestOutcome> {
    let content = fs::read(path)?;
    let outcome = ingestor
        .ingest(IngestRequest::new(source_name(path)?, content))
        .await?;
    Ok(outcome)
}

/// Display name of a document: its file name
pub fn source_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput(format!("'{}' has no file name", path.display())))
}
