//! Lower the analysis wire model into typed field trees

use crate::error::ConvertError;
use chrono::NaiveDate;
use folio_analysis::wire::{RawAddress, RawCurrency};
use folio_analysis::{AnalyzeResult, AnalyzedDocument, RawField};
use folio_domain::{AddressValue, CurrencyValue, DocumentField, FieldKind, FieldValue};

/// Named top-level fields of one analyzed document, in result order
pub type DocumentFields = Vec<(String, DocumentField)>;

/// Lower every document of an analysis result
pub fn lower_result(result: &AnalyzeResult) -> Result<Vec<DocumentFields>, ConvertError> {
    result.documents.iter().map(lower_document).collect()
}

/// Lower the fields of one analyzed document
pub fn lower_document(document: &AnalyzedDocument) -> Result<DocumentFields, ConvertError> {
    document
        .fields
        .iter()
        .map(|(name, raw)| Ok((name.clone(), lower_field(name, raw)?)))
        .collect()
}

/// Lower a single wire field found at `path`
///
/// Composite kinds without their payload fail with
/// [`ConvertError::MalformedCompositeValue`]; scalar kinds without a value become
/// [`FieldValue::Missing`].
pub fn lower_field(path: &str, raw: &RawField) -> Result<DocumentField, ConvertError> {
    let value = match raw.kind.as_str() {
        "date" => match raw.value_date.as_deref() {
            Some(text) => FieldValue::Date(parse_date(path, text)?),
            None => FieldValue::Missing(FieldKind::Date),
        },
        "string" => match &raw.value_string {
            Some(text) => FieldValue::String(text.clone()),
            None => FieldValue::Missing(FieldKind::String),
        },
        "integer" => match raw.value_integer {
            Some(n) => FieldValue::Integer(n),
            None => FieldValue::Missing(FieldKind::Integer),
        },
        "number" => match raw.value_number {
            Some(f) => FieldValue::Float(f),
            None => FieldValue::Missing(FieldKind::Float),
        },
        "currency" => {
            let currency = raw
                .value_currency
                .as_ref()
                .ok_or_else(|| malformed(path, FieldKind::Currency))?;
            FieldValue::Currency(lower_currency(currency))
        }
        "address" => {
            let address = raw
                .value_address
                .as_ref()
                .ok_or_else(|| malformed(path, FieldKind::Address))?;
            FieldValue::Address(lower_address(address))
        }
        "object" => {
            let children = raw
                .value_object
                .as_ref()
                .ok_or_else(|| malformed(path, FieldKind::Map))?;
            let lowered = children
                .iter()
                .map(|(name, child)| {
                    let child_path = format!("{}.{}", path, name);
                    Ok((name.clone(), lower_field(&child_path, child)?))
                })
                .collect::<Result<Vec<_>, ConvertError>>()?;
            FieldValue::Map(lowered)
        }
        "array" => {
            let items = raw
                .value_array
                .as_ref()
                .ok_or_else(|| malformed(path, FieldKind::List))?;
            let lowered = items
                .iter()
                .enumerate()
                .map(|(idx, item)| lower_field(&format!("{}[{}]", path, idx), item))
                .collect::<Result<Vec<_>, ConvertError>>()?;
            FieldValue::List(lowered)
        }
        other => FieldValue::Unrecognized(other.to_string()),
    };

    Ok(DocumentField {
        value,
        confidence: raw.confidence,
        content: raw.content.clone(),
    })
}

fn malformed(path: &str, kind: FieldKind) -> ConvertError {
    ConvertError::MalformedCompositeValue {
        path: path.to_string(),
        kind,
    }
}

fn parse_date(path: &str, text: &str) -> Result<NaiveDate, ConvertError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| ConvertError::InvalidScalar {
        path: path.to_string(),
        kind: FieldKind::Date,
        reason: format!("'{}' is not a YYYY-MM-DD date: {}", text, e),
    })
}

/// Symbol falls back to the ISO code, then to nothing
fn lower_currency(raw: &RawCurrency) -> CurrencyValue {
    let symbol = raw
        .currency_symbol
        .clone()
        .or_else(|| raw.currency_code.clone())
        .unwrap_or_default();
    CurrencyValue {
        amount: raw.amount,
        symbol,
        code: raw.currency_code.clone(),
    }
}

fn lower_address(raw: &RawAddress) -> AddressValue {
    AddressValue {
        house_number: raw.house_number.clone(),
        po_box: raw.po_box.clone(),
        road: raw.road.clone(),
        city: raw.city.clone(),
        state: raw.state.clone(),
        postal_code: raw.postal_code.clone(),
        country_region: raw.country_region.clone(),
        street_address: raw.street_address.clone(),
        unit: raw.unit.clone(),
        city_district: raw.city_district.clone(),
        state_district: raw.state_district.clone(),
        suburb: raw.suburb.clone(),
        house: raw.house.clone(),
        level: raw.level.clone(),
    }
}
