//! Convert command implementation.

use crate::cli::ConvertArgs;
use crate::commands::ingest::source_name;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_analysis::AnalyzeResult;
use folio_converter::{Conversion, RecordBuilder};
use folio_domain::RecordSink;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the convert command.
pub fn execute_convert(
    args: ConvertArgs,
    config: &Config,
    db: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => source_name(&args.result)?,
    };
    let conversion = convert_file(&args.result, &name, config)?;

    for line in formatter.skipped(&conversion.skipped) {
        eprintln!("{}", line);
    }

    if args.store {
        let mut store = super::open_store(db, &config.converter.provenance_key)?;
        store.upsert(&conversion.record)?;
        info!(
            "Stored record {} in {}",
            conversion.record.id().unwrap_or_default(),
            db.display()
        );
    }

    println!("{}", formatter.record(&conversion.record)?);
    Ok(())
}

/// Read a saved analysis result and convert it
pub fn convert_file(path: &Path, name: &str, config: &Config) -> Result<Conversion> {
    let json = fs::read_to_string(path)?;
    let result = AnalyzeResult::from_json(&json).map_err(|e| {
        CliError::InvalidInput(format!("{} is not an analysis result: {}", path.display(), e))
    })?;

    let builder = RecordBuilder::new(config.converter.clone()).map_err(CliError::Config)?;
    Ok(builder.build_result(name, &result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::Value;
    use folio_store::SqliteRecordStore;
    use tempfile::TempDir;

    fn write_result(dir: &TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("result.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_convert_saved_result() {
        let dir = TempDir::new().unwrap();
        let path = write_result(
            &dir,
            r#"{"status": "succeeded", "analyzeResult": {"documents": [{"fields": {
                "InvoiceTotal": {"type": "currency", "valueCurrency": {"amount": 1234.5, "currencySymbol": "$"}},
                "Vendor": {"type": "object", "valueObject": {"VendorName": {"type": "string", "valueString": "Acme"}}}
            }}]}}"#,
        );

        let conversion = convert_file(&path, "inv-001.pdf", &Config::default()).unwrap();
        let record = &conversion.record;
        assert_eq!(record.get("invoiceFile"), Some(&Value::from("inv-001.pdf")));
        assert_eq!(record.get("InvoiceTotal"), Some(&Value::Money("1234.50$".to_string())));
        assert_eq!(record.get("VendorName"), Some(&Value::from("Acme")));
    }

    #[test]
    fn test_convert_rejects_non_result() {
        let dir = TempDir::new().unwrap();
        let path = write_result(&dir, "not json at all");
        assert!(matches!(
            convert_file(&path, "x", &Config::default()),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_convert_rejects_json_that_is_not_a_result() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("records.db");

        for json in [
            r#"{"id": "x", "invoiceFile": "a.pdf", "Total": "1.00$"}"#,
            r#"{"status": "succeeded"}"#,
        ] {
            let args = ConvertArgs {
                result: write_result(&dir, json),
                name: Some("a.pdf".to_string()),
                store: true,
            };
            let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);
            assert!(matches!(
                execute_convert(args, &Config::default(), &db, &formatter),
                Err(CliError::InvalidInput(_))
            ));
        }
        assert!(!db.exists());
    }

    #[test]
    fn test_convert_reports_malformed_field() {
        let dir = TempDir::new().unwrap();
        let path = write_result(
            &dir,
            r#"{"documents": [{"fields": {"Items": {"type": "array"}}}]}"#,
        );
        assert!(matches!(
            convert_file(&path, "x", &Config::default()),
            Err(CliError::Convert(_))
        ));
    }

    #[test]
    fn test_convert_without_store_leaves_database_alone() {
        let dir = TempDir::new().unwrap();
        let path = write_result(
            &dir,
            r#"{"documents": [{"fields": {"InvoiceId": {"type": "string", "valueString": "INV-8"}}}]}"#,
        );
        let db = dir.path().join("folio").join("records.db");

        let args = ConvertArgs {
            result: path,
            name: None,
            store: false,
        };
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);
        execute_convert(args, &Config::default(), &db, &formatter).unwrap();
        assert!(!db.parent().unwrap().exists());
    }

    #[test]
    fn test_convert_and_store() {
        let dir = TempDir::new().unwrap();
        let path = write_result(
            &dir,
            r#"{"documents": [{"fields": {"InvoiceId": {"type": "string", "valueString": "INV-7"}}}]}"#,
        );
        let db = dir.path().join("records.db");

        let args = ConvertArgs {
            result: path,
            name: Some("inv-007.pdf".to_string()),
            store: true,
        };
        let formatter = Formatter::new(crate::config::OutputFormat::Quiet, false);
        execute_convert(args, &Config::default(), &db, &formatter).unwrap();

        let store = SqliteRecordStore::new(&db).unwrap();
        let stored = store.find_by_source("inv-007.pdf").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].json().unwrap()["InvoiceId"], "INV-7");
    }
}
