//! Typed field trees to generic record entries
//!
//! [`convert`] walks one named field and returns the entries it contributes to
//! the enclosing record:
//!
//! - scalars, currency and addresses give exactly one entry under the field's name
//! - a map is flattened: each child is re-emitted under its own name and the
//!   map's name disappears
//! - a list gives one entry under its own name whose elements are the mappings
//!   each item converted to
//! - unrecognized kinds give nothing

use folio_domain::{AddressValue, DocumentField, Entry, FieldValue, Mapping, Value};
use tracing::debug;

/// Convert one named field into record entries
///
/// Pure: the same field always yields the same entries.
///
/// # Examples
///
/// ```
/// use folio_converter::convert;
/// use folio_domain::{DocumentField, Value};
///
/// let vendor = DocumentField::map([
///     ("name", DocumentField::string("Acme")),
///     ("taxId", DocumentField::string("123")),
/// ]);
///
/// assert_eq!(
///     convert("vendor", &vendor),
///     vec![
///         ("name".to_string(), Value::from("Acme")),
///         ("taxId".to_string(), Value::from("123")),
///     ]
/// );
/// ```
pub fn convert(name: &str, field: &DocumentField) -> Vec<Entry> {
    let entries = match &field.value {
        FieldValue::Date(date) => single(name, Value::Date(*date)),
        FieldValue::String(text) => single(name, Value::Str(text.clone())),
        FieldValue::Integer(n) => single(name, Value::Int64(*n)),
        FieldValue::Float(f) => single(name, Value::Float64(*f)),
        FieldValue::Currency(currency) => single(
            name,
            Value::Money(format_money(currency.amount, &currency.symbol)),
        ),
        FieldValue::Address(address) => single(name, Value::Address(address_mapping(address))),
        FieldValue::Map(children) => children
            .iter()
            .filter_map(|(child_name, child)| {
                convert(child_name, child)
                    .into_iter()
                    .rev()
                    .find(|(key, _)| key == child_name)
            })
            .collect(),
        FieldValue::List(items) => {
            let values = items
                .iter()
                .map(|item| Value::Map(convert(name, item).into_iter().collect()))
                .collect();
            single(name, Value::List(values))
        }
        FieldValue::Missing(kind) => {
            debug!("Field '{}' declared {} without a value", name, kind);
            single(name, Value::Null)
        }
        FieldValue::Unrecognized(type_name) => {
            debug!("Skipping field '{}' of unrecognized type '{}'", name, type_name);
            Vec::new()
        }
    };

    for (key, value) in &entries {
        debug!(
            field = name,
            confidence = ?field.confidence,
            "Field '{}' resolved to {} {}",
            key,
            value.type_name(),
            value
        );
    }

    entries
}

fn single(name: &str, value: Value) -> Vec<Entry> {
    vec![(name.to_string(), value)]
}

/// Address parts as a generic mapping, absent parts omitted
pub fn address_mapping(address: &AddressValue) -> Mapping {
    address
        .parts()
        .into_iter()
        .map(|(part, text)| (part.to_string(), Value::Str(text.to_string())))
        .collect()
}

/// Render an amount with two fractional digits followed by its symbol
///
/// The amount is rounded half-up on its shortest decimal form, so `1.005`
/// renders as `1.01` even though the nearest double is slightly below it.
///
/// # Examples
///
/// ```
/// use folio_converter::format_money;
///
/// assert_eq!(format_money(1234.5, "$"), "1234.50$");
/// assert_eq!(format_money(19.5, "€"), "19.50€");
/// assert_eq!(format_money(19.999, "€"), "20.00€");
/// ```
pub fn format_money(amount: f64, symbol: &str) -> String {
    if amount.is_nan() {
        return format!("NaN{}", symbol);
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}Infinity{}", sign, symbol);
    }

    // Display for f64 never uses exponent notation
    let repr = amount.to_string();
    let (negative, digits) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut kept: Vec<u8> = int_part.bytes().collect();
    let frac = frac_part.as_bytes();
    kept.extend((0..2).map(|i| frac.get(i).copied().unwrap_or(b'0')));

    if frac.get(2).is_some_and(|&d| d >= b'5') {
        round_up(&mut kept);
    }

    let split = kept.len() - 2;
    let mut out = String::with_capacity(kept.len() + symbol.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&kept[..split]).unwrap_or("0"));
    out.push('.');
    out.push_str(std::str::from_utf8(&kept[split..]).unwrap_or("00"));
    out.push_str(symbol);
    out
}

/// Add one unit in the last place to a string of ASCII digits
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
