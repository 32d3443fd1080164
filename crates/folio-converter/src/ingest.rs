//! The ingestion pipeline: analyze, convert, store

use crate::builder::RecordBuilder;
use crate::config::ConverterConfig;
use crate::error::IngestError;
use crate::types::{IngestOutcome, IngestRequest};
use folio_analysis::{AnalyzeResult, DocumentAnalyzer};
use folio_domain::RecordSink;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Runs documents through analysis and conversion into a record sink
pub struct Ingestor<A, S>
where
    A: DocumentAnalyzer,
    S: RecordSink,
{
    analyzer: Arc<A>,
    sink: Arc<Mutex<S>>,
    builder: RecordBuilder,
}

impl<A, S> Ingestor<A, S>
where
    A: DocumentAnalyzer,
    S: RecordSink,
    S::Error: std::fmt::Display,
{
    /// Create a new Ingestor
    pub fn new(analyzer: A, sink: S, config: ConverterConfig) -> Result<Self, IngestError> {
        let builder = RecordBuilder::new(config).map_err(IngestError::Config)?;
        Ok(Self {
            analyzer: Arc::new(analyzer),
            sink: Arc::new(Mutex::new(sink)),
            builder,
        })
    }

    /// Shared handle to the sink
    pub fn sink(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.sink)
    }

    /// Ingest one document
    ///
    /// Nothing is stored unless analysis and conversion both succeed.
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome, IngestError> {
        info!(
            "Ingesting '{}' ({} bytes)",
            request.source_name,
            request.content.len()
        );

        let result = self.analyzer.analyze(&request.content).await?;
        debug!(
            "Model '{}' returned {} documents",
            self.analyzer.model_id(),
            result.documents.len()
        );

        self.store(&request.source_name, &result)
    }

    /// Convert an existing analysis result and store it
    pub fn ingest_result(
        &self,
        source_name: &str,
        result: &AnalyzeResult,
    ) -> Result<IngestOutcome, IngestError> {
        self.store(source_name, result)
    }

    fn store(&self, source_name: &str, result: &AnalyzeResult) -> Result<IngestOutcome, IngestError> {
        let conversion = self.builder.build_result(source_name, result)?;

        {
            let mut sink = self
                .sink
                .lock()
                .map_err(|e| IngestError::Store(format!("Failed to lock sink: {}", e)))?;
            sink.upsert(&conversion.record)
                .map_err(|e| IngestError::Store(e.to_string()))?;
        }

        let record_id = conversion.record.id().unwrap_or_default().to_string();
        info!(
            "Stored record {} for '{}' ({} entries, {} skipped)",
            record_id,
            source_name,
            conversion.record.len(),
            conversion.skipped.len()
        );

        Ok(IngestOutcome {
            record_id,
            source_name: source_name.to_string(),
            documents: conversion.documents,
            entries: conversion.record.len(),
            skipped: conversion.skipped,
            record: conversion.record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_analysis::MockAnalyzer;
    use folio_domain::{Record, Value};

    #[derive(Default)]
    struct VecSink {
        records: Vec<Record>,
        fail: bool,
    }

    impl RecordSink for VecSink {
        type Error = String;

        fn upsert(&mut self, record: &Record) -> Result<(), Self::Error> {
            if self.fail {
                return Err("disk full".to_string());
            }
            self.records.push(record.clone());
            Ok(())
        }
    }

    const RESULT: &str = r#"{"status": "succeeded", "analyzeResult": {"documents": [{"fields": {
        "VendorName": {"type": "string", "valueString": "Acme"},
        "InvoiceTotal": {"type": "currency", "valueCurrency": {"amount": 100, "currencySymbol": "$"}}
    }}]}}"#;

    #[tokio::test]
    async fn test_ingest_stores_record() {
        let analyzer = MockAnalyzer::from_json(RESULT).unwrap();
        let ingestor =
            Ingestor::new(analyzer.clone(), VecSink::default(), ConverterConfig::default()).unwrap();

        let outcome = ingestor
            .ingest(IngestRequest::new("inv-001.pdf", b"%PDF".to_vec()))
            .await
            .unwrap();

        assert_eq!(analyzer.call_count(), 1);
        assert_eq!(outcome.source_name, "inv-001.pdf");
        assert_eq!(outcome.documents, 1);
        assert_eq!(outcome.entries, 4);
        assert!(outcome.has_generated_id());

        let sink = ingestor.sink();
        let sink = sink.lock().unwrap();
        assert_eq!(sink.records.len(), 1);
        assert_eq!(sink.records[0].id(), Some(outcome.record_id.as_str()));
        assert_eq!(
            sink.records[0].get("InvoiceTotal"),
            Some(&Value::Money("100.00$".to_string()))
        );
    }

    #[tokio::test]
    async fn test_analysis_failure_stores_nothing() {
        let ingestor = Ingestor::new(
            MockAnalyzer::failing("service down"),
            VecSink::default(),
            ConverterConfig::default(),
        )
        .unwrap();

        let result = ingestor.ingest(IngestRequest::new("a.pdf", vec![1, 2])).await;
        assert!(matches!(result, Err(IngestError::Analysis(_))));
        assert!(ingestor.sink().lock().unwrap().records.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_result_stores_nothing() {
        let analyzer = MockAnalyzer::from_json(
            r#"{"documents": [{"fields": {"Vendor": {"type": "object"}}}]}"#,
        )
        .unwrap();
        let ingestor =
            Ingestor::new(analyzer, VecSink::default(), ConverterConfig::default()).unwrap();

        let result = ingestor.ingest(IngestRequest::new("a.pdf", vec![])).await;
        assert!(matches!(result, Err(IngestError::Convert(_))));
        assert!(ingestor.sink().lock().unwrap().records.is_empty());
    }

    #[tokio::test]
    async fn test_sink_failure_is_reported() {
        let sink = VecSink {
            fail: true,
            ..Default::default()
        };
        let ingestor = Ingestor::new(
            MockAnalyzer::from_json(RESULT).unwrap(),
            sink,
            ConverterConfig::default(),
        )
        .unwrap();

        let result = ingestor.ingest(IngestRequest::new("a.pdf", vec![])).await;
        assert!(matches!(result, Err(IngestError::Store(ref m)) if m == "disk full"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ConverterConfig {
            provenance_key: String::new(),
            ..Default::default()
        };
        let result = Ingestor::new(MockAnalyzer::failing("x"), VecSink::default(), config);
        assert!(matches!(result, Err(IngestError::Config(_))));
    }

    #[test]
    fn test_ingest_result_without_analyzer_call() {
        let analyzer = MockAnalyzer::failing("unused");
        let ingestor =
            Ingestor::new(analyzer.clone(), VecSink::default(), ConverterConfig::default()).unwrap();

        let result = AnalyzeResult::from_json(RESULT).unwrap();
        let outcome = ingestor.ingest_result("saved.json", &result).unwrap();

        assert_eq!(analyzer.call_count(), 0);
        assert_eq!(outcome.record.get("VendorName"), Some(&Value::from("Acme")));
    }
}
