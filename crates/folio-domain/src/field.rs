//! Typed field trees produced by document analysis
//!
//! A [`DocumentField`] is one extracted value from an analyzed document. Composite
//! fields (maps and lists) nest further fields, so a whole document is a tree.

use chrono::NaiveDate;
use std::fmt;

/// The declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Calendar date
    Date,
    /// Free text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Float,
    /// Monetary amount with a currency symbol
    Currency,
    /// Structured postal address
    Address,
    /// Named child fields
    Map,
    /// Ordered child fields
    List,
    /// Any kind the converter does not handle
    Unrecognized,
}

impl FieldKind {
    /// Lowercase name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Date => "date",
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Currency => "currency",
            FieldKind::Address => "address",
            FieldKind::Map => "map",
            FieldKind::List => "list",
            FieldKind::Unrecognized => "unrecognized",
        }
    }

    /// Whether this kind carries nested or structured payload
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            FieldKind::Currency | FieldKind::Address | FieldKind::Map | FieldKind::List
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monetary amount as read from the document
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyValue {
    /// Numeric amount
    pub amount: f64,

    /// Display symbol (e.g. "$", "€")
    pub symbol: String,

    /// ISO 4217 code when the service resolved one
    pub code: Option<String>,
}

impl CurrencyValue {
    /// Create a currency value without an ISO code
    pub fn new(amount: f64, symbol: impl Into<String>) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
            code: None,
        }
    }
}

/// A structured postal address
///
/// Every part is optional; the service fills in whatever it could read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressValue {
    pub house_number: Option<String>,
    pub po_box: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country_region: Option<String>,
    pub street_address: Option<String>,
    pub unit: Option<String>,
    pub city_district: Option<String>,
    pub state_district: Option<String>,
    pub suburb: Option<String>,
    pub house: Option<String>,
    pub level: Option<String>,
}

impl AddressValue {
    /// Present address parts as `(camelCaseName, value)` pairs
    pub fn parts(&self) -> Vec<(&'static str, &str)> {
        let all: [(&'static str, &Option<String>); 14] = [
            ("houseNumber", &self.house_number),
            ("poBox", &self.po_box),
            ("road", &self.road),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("countryRegion", &self.country_region),
            ("streetAddress", &self.street_address),
            ("unit", &self.unit),
            ("cityDistrict", &self.city_district),
            ("stateDistrict", &self.state_district),
            ("suburb", &self.suburb),
            ("house", &self.house),
            ("level", &self.level),
        ];
        all.into_iter()
            .filter_map(|(name, part)| part.as_deref().map(|v| (name, v)))
            .collect()
    }
}

/// Payload of a field, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Date(NaiveDate),
    String(String),
    Integer(i64),
    Float(f64),
    Currency(CurrencyValue),
    Address(AddressValue),
    /// Named children in document order
    Map(Vec<(String, DocumentField)>),
    /// Items; each item is itself a full field
    List(Vec<DocumentField>),
    /// A scalar kind was declared but the service produced no normalized value
    Missing(FieldKind),
    /// A kind outside the supported set; carries the service's type name
    Unrecognized(String),
}

/// One extracted field: its payload plus informational metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentField {
    /// The typed payload
    pub value: FieldValue,

    /// Extraction confidence in [0, 1]; never propagated to output
    pub confidence: Option<f32>,

    /// Raw text the service read for this field
    pub content: Option<String>,
}

impl DocumentField {
    /// Wrap a payload with no metadata
    pub fn new(value: FieldValue) -> Self {
        Self {
            value,
            confidence: None,
            content: None,
        }
    }

    pub fn date(date: NaiveDate) -> Self {
        Self::new(FieldValue::Date(date))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(FieldValue::String(text.into()))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(FieldValue::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(FieldValue::Float(value))
    }

    pub fn currency(amount: f64, symbol: impl Into<String>) -> Self {
        Self::new(FieldValue::Currency(CurrencyValue::new(amount, symbol)))
    }

    pub fn address(address: AddressValue) -> Self {
        Self::new(FieldValue::Address(address))
    }

    /// Build a map field from `(name, child)` pairs
    pub fn map<K: Into<String>>(children: impl IntoIterator<Item = (K, DocumentField)>) -> Self {
        Self::new(FieldValue::Map(
            children.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn list(items: impl IntoIterator<Item = DocumentField>) -> Self {
        Self::new(FieldValue::List(items.into_iter().collect()))
    }

    pub fn unrecognized(type_name: impl Into<String>) -> Self {
        Self::new(FieldValue::Unrecognized(type_name.into()))
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Attach the raw content text
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// The declared kind of this field
    pub fn kind(&self) -> FieldKind {
        match &self.value {
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Currency(_) => FieldKind::Currency,
            FieldValue::Address(_) => FieldKind::Address,
            FieldValue::Map(_) => FieldKind::Map,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Missing(kind) => *kind,
            FieldValue::Unrecognized(_) => FieldKind::Unrecognized,
        }
    }

    /// Paths of every unrecognized field in this subtree
    ///
    /// Map children are joined with `.`, list items with `[index]`.
    pub fn unrecognized_paths(&self, name: &str) -> Vec<(String, String)> {
        let mut found = Vec::new();
        collect_unrecognized(name, self, &mut found);
        found
    }
}

fn collect_unrecognized(path: &str, field: &DocumentField, found: &mut Vec<(String, String)>) {
    match &field.value {
        FieldValue::Unrecognized(type_name) => found.push((path.to_string(), type_name.clone())),
        FieldValue::Map(children) => {
            for (child_name, child) in children {
                collect_unrecognized(&format!("{}.{}", path, child_name), child, found);
            }
        }
        FieldValue::List(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_unrecognized(&format!("{}[{}]", path, idx), item, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_payload() {
        assert_eq!(DocumentField::string("x").kind(), FieldKind::String);
        assert_eq!(DocumentField::currency(1.0, "$").kind(), FieldKind::Currency);
        assert_eq!(
            DocumentField::new(FieldValue::Missing(FieldKind::Date)).kind(),
            FieldKind::Date
        );
        assert_eq!(
            DocumentField::unrecognized("phoneNumber").kind(),
            FieldKind::Unrecognized
        );
    }

    #[test]
    fn test_composite_kinds() {
        assert!(FieldKind::Map.is_composite());
        assert!(FieldKind::Currency.is_composite());
        assert!(!FieldKind::Date.is_composite());
        assert!(!FieldKind::Unrecognized.is_composite());
    }

    #[test]
    fn test_address_parts_skip_absent() {
        let address = AddressValue {
            road: Some("Main St".to_string()),
            city: Some("Redmond".to_string()),
            postal_code: Some("98052".to_string()),
            ..Default::default()
        };
        assert_eq!(
            address.parts(),
            vec![("road", "Main St"), ("city", "Redmond"), ("postalCode", "98052")]
        );
    }

    #[test]
    fn test_unrecognized_paths() {
        let field = DocumentField::map([
            ("phone", DocumentField::unrecognized("phoneNumber")),
            (
                "lines",
                DocumentField::list([
                    DocumentField::string("a"),
                    DocumentField::unrecognized("selectionMark"),
                ]),
            ),
        ]);

        let paths = field.unrecognized_paths("vendor");
        assert_eq!(
            paths,
            vec![
                ("vendor.phone".to_string(), "phoneNumber".to_string()),
                ("vendor.lines[1]".to_string(), "selectionMark".to_string()),
            ]
        );
    }

    #[test]
    fn test_builder_metadata() {
        let field = DocumentField::integer(3)
            .with_confidence(0.91)
            .with_content("3");
        assert_eq!(field.confidence, Some(0.91));
        assert_eq!(field.content.as_deref(), Some("3"));
    }
}
