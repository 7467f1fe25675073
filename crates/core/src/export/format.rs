//! The wire format shared by the export writer and the import reader.
//!
//! One entry per line, five pipe-delimited fields:
//!
//! ```text
//! <product_code>|<product_name>|<quantity>|<unit_cost>|<rfc3339 timestamp>
//! ```
//!
//! Unit cost is rendered with two decimals. Every line ends with `\n`,
//! including the last one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entries::Entry;
use crate::errors::{Error, Result};

/// Field delimiter of the canonical line format.
pub const FIELD_DELIMITER: char = '|';

/// Exact number of fields per line.
pub const LINE_FIELD_COUNT: usize = 5;

/// A successfully parsed import line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub product_code: String,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    /// None when the timestamp field is not valid RFC 3339; callers fall
    /// back to the import time.
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Render one entry as a wire line (without the trailing newline).
pub fn render_line(entry: &Entry) -> String {
    format!(
        "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{:.2}{FIELD_DELIMITER}{}",
        entry.product_code,
        sanitize_field(&entry.product_name),
        entry.quantity.normalize(),
        entry.unit_cost,
        entry.created_at.to_rfc3339(),
    )
}

/// Render a whole export file, newline-terminated.
pub fn render_file(entries: &[Entry]) -> String {
    let mut content = String::new();
    for entry in entries {
        content.push_str(&render_line(entry));
        content.push('\n');
    }
    content
}

/// Parse one wire line. Rejections are `Error::Format` with a message that
/// names the offending field.
pub fn parse_line(line: &str) -> Result<ParsedLine> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != LINE_FIELD_COUNT {
        return Err(Error::format(format!(
            "expected {LINE_FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let product_code = fields[0].trim();
    if product_code.is_empty() {
        return Err(Error::format("product code is empty"));
    }
    let product_name = fields[1].trim();
    if product_name.is_empty() {
        return Err(Error::format("product name is empty"));
    }

    let quantity: Decimal = fields[2]
        .trim()
        .parse()
        .map_err(|_| Error::format(format!("quantity '{}' is not a number", fields[2].trim())))?;
    if quantity <= Decimal::ZERO {
        return Err(Error::format(format!("quantity must be positive, got {quantity}")));
    }

    let unit_cost: Decimal = fields[3]
        .trim()
        .parse()
        .map_err(|_| Error::format(format!("unit cost '{}' is not a number", fields[3].trim())))?;
    if unit_cost < Decimal::ZERO {
        return Err(Error::format(format!(
            "unit cost must not be negative, got {unit_cost}"
        )));
    }

    let recorded_at = DateTime::parse_from_rfc3339(fields[4].trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc));

    Ok(ParsedLine {
        product_code: product_code.to_string(),
        product_name: product_name.to_string(),
        quantity,
        unit_cost,
        recorded_at,
    })
}

// The name snapshot is free text; strip anything that would break the line
// structure.
fn sanitize_field(value: &str) -> String {
    value.replace([FIELD_DELIMITER, '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn entry(quantity: Decimal, unit_cost: Decimal) -> Entry {
        Entry {
            id: 1,
            product_code: "7891234567890".to_string(),
            product_name: "Rice 5kg".to_string(),
            reason_id: "1".to_string(),
            quantity,
            unit_cost,
            notes: None,
            is_synchronized: false,
            created_at: Utc.with_ymd_and_hms(2026, 8, 7, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_five_fields_with_two_decimal_cost() {
        let line = render_line(&entry(dec!(5), dec!(2)));
        assert_eq!(
            line,
            "7891234567890|Rice 5kg|5|2.00|2026-08-07T12:30:00+00:00"
        );
    }

    #[test]
    fn render_parse_round_trip() {
        let original = entry(dec!(1.5), dec!(4.99));
        let parsed = parse_line(&render_line(&original)).unwrap();
        assert_eq!(parsed.product_code, original.product_code);
        assert_eq!(parsed.product_name, original.product_name);
        assert_eq!(parsed.quantity, original.quantity);
        assert_eq!(parsed.unit_cost, original.unit_cost);
        assert_eq!(parsed.recorded_at, Some(original.created_at));
    }

    #[test]
    fn file_rendering_is_newline_terminated() {
        let content = render_file(&[entry(dec!(1), dec!(0)), entry(dec!(2), dec!(0))]);
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn delimiter_in_name_is_sanitized() {
        let mut e = entry(dec!(1), dec!(1));
        e.product_name = "Half|half\ncream".to_string();
        let parsed = parse_line(&render_line(&e)).unwrap();
        assert_eq!(parsed.product_name, "Half half cream");
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        let err = parse_line("123|name|1|0.50").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(err.to_string().contains("found 4"));
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        assert!(parse_line("123|name|abc|0.50|2026-08-07T00:00:00Z").is_err());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(parse_line("123|name|0|0.50|2026-08-07T00:00:00Z").is_err());
    }

    #[test]
    fn negative_cost_is_rejected() {
        assert!(parse_line("123|name|1|-2|2026-08-07T00:00:00Z").is_err());
    }

    #[test]
    fn unparseable_timestamp_becomes_none() {
        let parsed = parse_line("123|name|1|0.50|yesterday").unwrap();
        assert_eq!(parsed.recorded_at, None);
    }
}
