//! Wire model of the analysis service's JSON
//!
//! These types mirror the service's "analyze result" payload closely and are
//! deliberately loose: every typed value is optional, because the service omits
//! a value whenever it could not normalize what it read. Turning them into
//! strongly typed field trees is the converter's job.
//!
//! Object-valued fields keep the order the service sent them in.

use serde::Deserialize;

/// Status of a long-running analyze operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl OperationStatus {
    /// Whether polling can stop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Succeeded | OperationStatus::Failed | OperationStatus::Canceled
        )
    }
}

/// Envelope returned when polling an analyze operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: OperationStatus,

    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,

    #[serde(default)]
    pub error: Option<ServiceError>,
}

/// Error body reported by the service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
}

/// The finished analysis of one input file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub model_id: Option<String>,

    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

impl AnalyzeResult {
    /// Parse either a polled operation envelope or a bare result
    ///
    /// Parsing goes straight from text so field order survives.
    ///
    /// Fails when the JSON has neither an `analyzeResult` nor a `documents` key.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let loose: LooseResult = serde_json::from_str(json)?;
        match (loose.analyze_result, loose.documents) {
            (Some(result), _) => Ok(result),
            (None, Some(documents)) => Ok(AnalyzeResult {
                api_version: loose.api_version,
                model_id: loose.model_id,
                documents,
            }),
            (None, None) => Err(serde::de::Error::custom(
                "expected an `analyzeResult` or `documents` key",
            )),
        }
    }
}

/// Accepts both shapes `AnalyzeResult::from_json` understands
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseResult {
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,

    #[serde(default)]
    api_version: Option<String>,

    #[serde(default)]
    model_id: Option<String>,

    #[serde(default)]
    documents: Option<Vec<AnalyzedDocument>>,
}

/// One document found in the input, with its extracted fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: Option<String>,

    #[serde(default)]
    pub confidence: Option<f32>,

    #[serde(default, deserialize_with = "ordered::fields")]
    pub fields: Vec<(String, RawField)>,
}

/// A single extracted field as sent over the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    /// The service's type name (`string`, `date`, `object`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub confidence: Option<f32>,

    #[serde(default)]
    pub value_string: Option<String>,

    #[serde(default)]
    pub value_date: Option<String>,

    #[serde(default)]
    pub value_integer: Option<i64>,

    #[serde(default)]
    pub value_number: Option<f64>,

    #[serde(default)]
    pub value_currency: Option<RawCurrency>,

    #[serde(default)]
    pub value_address: Option<RawAddress>,

    #[serde(default, deserialize_with = "ordered::optional_fields")]
    pub value_object: Option<Vec<(String, RawField)>>,

    #[serde(default)]
    pub value_array: Option<Vec<RawField>>,
}

/// Currency payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCurrency {
    pub amount: f64,

    #[serde(default)]
    pub currency_symbol: Option<String>,

    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Address payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    #[serde(default)]
    pub house_number: Option<String>,
    #[serde(default)]
    pub po_box: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country_region: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub city_district: Option<String>,
    #[serde(default)]
    pub state_district: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Deserializers that read a JSON object into an ordered list of pairs
mod ordered {
    use super::RawField;
    use serde::de::{Deserializer, MapAccess, Visitor};
    use std::fmt;

    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<(String, RawField)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of field names to fields")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((name, field)) = access.next_entry::<String, RawField>()? {
                fields.push((name, field));
            }
            Ok(fields)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    pub fn fields<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, RawField)>, D::Error> {
        deserializer.deserialize_any(FieldsVisitor)
    }

    pub fn optional_fields<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<(String, RawField)>>, D::Error> {
        struct OptionalVisitor;

        impl<'de> Visitor<'de> for OptionalVisitor {
            type Value = Option<Vec<(String, RawField)>>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null or a map of field names to fields")
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                fields(d).map(Some)
            }
        }

        deserializer.deserialize_option(OptionalVisitor)
    }
}
