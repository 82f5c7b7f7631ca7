//! Numeric view of extracted amounts.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount as printed on an invoice (e.g., "1 234,56", "1,234.56",
/// "118.00").
///
/// When both separators are present the last one is the decimal separator;
/// a lone comma is treated as a decimal separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(_), None) => cleaned.replace(',', "."),
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        _ => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}
