//! Folding converted entries into output records

use crate::config::{ConverterConfig, DocumentSelection, ReservedKeyPolicy};
use crate::converter::convert;
use crate::error::ConvertError;
use crate::lower::lower_document;
use crate::types::{Conversion, SkippedField};
use folio_analysis::AnalyzeResult;
use folio_domain::{DocumentField, Entry, Record, RecordId, Value, ID_KEY};
use tracing::{debug, warn};

/// Builds one record per source document
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    config: ConverterConfig,
}

impl RecordBuilder {
    /// Create a builder; the configuration is validated eagerly
    pub fn new(config: ConverterConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The key holding the source document's name
    pub fn provenance_key(&self) -> &str {
        &self.config.provenance_key
    }

    /// The configuration in use
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// A fresh record holding only `id` and the provenance key
    pub fn seed(&self, source_name: &str) -> Record {
        let mut record = Record::new();
        record.insert(ID_KEY, Value::Str(RecordId::new().to_string()));
        record.insert(self.config.provenance_key.clone(), Value::from(source_name));
        record
    }

    fn is_reserved(&self, key: &str) -> bool {
        key == ID_KEY || key == self.config.provenance_key
    }

    /// Fold entries into `record`; later keys overwrite earlier ones
    ///
    /// Under [`ReservedKeyPolicy::Protect`] entries named like a reserved key
    /// are dropped instead.
    pub fn merge(&self, mut record: Record, entries: Vec<Entry>) -> Record {
        for (key, value) in entries {
            if self.config.reserved_keys == ReservedKeyPolicy::Protect && self.is_reserved(&key) {
                warn!("Dropping field '{}': the key is reserved", key);
                continue;
            }
            if record.insert(key.clone(), value).is_some() {
                debug!("Key '{}' overwritten", key);
            }
        }
        record
    }

    /// Seed a record and merge every top-level field into it, in order
    pub fn build_fields<'a, I>(&self, source_name: &str, fields: I) -> Record
    where
        I: IntoIterator<Item = (&'a str, &'a DocumentField)>,
    {
        fields
            .into_iter()
            .fold(self.seed(source_name), |record, (name, field)| {
                self.merge(record, convert(name, field))
            })
    }

    /// Convert an analysis result into a single record
    ///
    /// Every selected document is lowered before anything is merged, so a
    /// malformed field anywhere fails the whole conversion.
    pub fn build_result(
        &self,
        source_name: &str,
        result: &AnalyzeResult,
    ) -> Result<Conversion, ConvertError> {
        let selected = match self.config.documents {
            DocumentSelection::All => &result.documents[..],
            DocumentSelection::First => &result.documents[..result.documents.len().min(1)],
        };

        let documents = selected
            .iter()
            .map(lower_document)
            .collect::<Result<Vec<_>, _>>()?;

        let mut record = self.seed(source_name);
        let mut skipped = Vec::new();
        for fields in &documents {
            for (name, field) in fields {
                skipped.extend(
                    field
                        .unrecognized_paths(name)
                        .into_iter()
                        .map(|(path, type_name)| SkippedField { path, type_name }),
                );
                record = self.merge(record, convert(name, field));
            }
        }

        if documents.is_empty() {
            warn!("Analysis of '{}' found no documents", source_name);
        }

        Ok(Conversion {
            record,
            documents: documents.len(),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::DEFAULT_PROVENANCE_KEY;

    fn protect() -> RecordBuilder {
        RecordBuilder::new(ConverterConfig {
            reserved_keys: ReservedKeyPolicy::Protect,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_seed_has_exactly_reserved_keys() {
        let builder = RecordBuilder::default();
        let record = builder.seed("inv-001.pdf");

        assert_eq!(record.len(), 2);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec![ID_KEY, DEFAULT_PROVENANCE_KEY]);
        assert_eq!(record.get("invoiceFile"), Some(&Value::from("inv-001.pdf")));
        assert!(RecordId::from_string(record.id().unwrap()).is_ok());
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let builder = RecordBuilder::default();
        assert_ne!(builder.seed("a").id(), builder.seed("a").id());
    }

    #[test]
    fn test_custom_provenance_key() {
        let builder = RecordBuilder::new(ConverterConfig {
            provenance_key: "sourceFile".to_string(),
            ..Default::default()
        })
        .unwrap();
        let record = builder.seed("x.pdf");
        assert_eq!(builder.provenance_key(), "sourceFile");
        assert_eq!(record.get("sourceFile"), Some(&Value::from("x.pdf")));
        assert!(!record.contains_key("invoiceFile"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RecordBuilder::new(ConverterConfig {
            provenance_key: "id".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_last_write_wins() {
        let builder = RecordBuilder::default();
        let record = builder.seed("a.pdf");
        let record = builder.merge(
            record,
            vec![
                ("total".to_string(), Value::Int64(1)),
                ("total".to_string(), Value::Int64(2)),
            ],
        );
        assert_eq!(record.get("total"), Some(&Value::Int64(2)));
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_field_named_id_overwrites_generated_id() {
        let builder = RecordBuilder::default();
        let record = builder.build_fields("a.pdf", [("id", &DocumentField::string("X"))]);
        assert_eq!(record.id(), Some("X"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_protect_keeps_generated_id() {
        let builder = protect();
        let record = builder.build_fields(
            "a.pdf",
            [
                ("id", &DocumentField::string("X")),
                ("invoiceFile", &DocumentField::string("other.pdf")),
                ("total", &DocumentField::integer(3)),
            ],
        );
        assert_ne!(record.id(), Some("X"));
        assert_eq!(record.get("invoiceFile"), Some(&Value::from("a.pdf")));
        assert_eq!(record.get("total"), Some(&Value::Int64(3)));
    }

    #[test]
    fn test_build_result_collects_skipped_fields() {
        let result = AnalyzeResult::from_json(
            r#"{"documents": [{"fields": {
                "VendorName": {"type": "string", "valueString": "Acme"},
                "VendorPhone": {"type": "phoneNumber"}
            }}]}"#,
        )
        .unwrap();

        let conversion = RecordBuilder::default().build_result("a.pdf", &result).unwrap();
        assert_eq!(conversion.documents, 1);
        assert_eq!(conversion.record.len(), 3);
        assert_eq!(
            conversion.skipped,
            vec![SkippedField {
                path: "VendorPhone".to_string(),
                type_name: "phoneNumber".to_string()
            }]
        );
    }

    #[test]
    fn test_document_selection() {
        let result = AnalyzeResult::from_json(
            r#"{"documents": [
                {"fields": {"Total": {"type": "integer", "valueInteger": 1}}},
                {"fields": {"Total": {"type": "integer", "valueInteger": 2}, "Extra": {"type": "string", "valueString": "e"}}}
            ]}"#,
        )
        .unwrap();

        let all = RecordBuilder::default().build_result("a.pdf", &result).unwrap();
        assert_eq!(all.documents, 2);
        assert_eq!(all.record.get("Total"), Some(&Value::Int64(2)));
        assert!(all.record.contains_key("Extra"));

        let first = RecordBuilder::new(ConverterConfig {
            documents: DocumentSelection::First,
            ..Default::default()
        })
        .unwrap()
        .build_result("a.pdf", &result)
        .unwrap();
        assert_eq!(first.documents, 1);
        assert_eq!(first.record.get("Total"), Some(&Value::Int64(1)));
        assert!(!first.record.contains_key("Extra"));
    }

    #[test]
    fn test_no_documents_gives_seed_only() {
        let conversion = RecordBuilder::default()
            .build_result("empty.pdf", &AnalyzeResult::default())
            .unwrap();
        assert_eq!(conversion.documents, 0);
        assert_eq!(conversion.record.len(), 2);
    }

    #[test]
    fn test_malformed_field_fails_whole_conversion() {
        let result = AnalyzeResult::from_json(
            r#"{"documents": [{"fields": {
                "VendorName": {"type": "string", "valueString": "Acme"},
                "InvoiceTotal": {"type": "currency"}
            }}]}"#,
        )
        .unwrap();

        let err = RecordBuilder::default().build_result("a.pdf", &result).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedCompositeValue { ref path, .. } if path == "InvoiceTotal"
        ));
    }
}
