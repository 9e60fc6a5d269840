//! Money formatting and parsing
//!
//! All amounts are integer centavos. Display uses the Brazilian Real format
//! (`R$ 1.234,56`). Operator input is parsed with `rust_decimal` so no
//! floating point rounding ever reaches an amount.

use chrono::NaiveDate;
use rust_decimal::prelude::*;

/// Format centavos as Brazilian Real: `R$ 1.234,56`
///
/// Negative amounts get a leading minus: `-R$ 1,00`.
pub fn format_brl(centavos: i64) -> String {
    let negative = centavos < 0;
    let abs = centavos.unsigned_abs();

    let reais = group_thousands(abs / 100);
    let formatted = format!("R$ {},{:02}", reais, abs % 100);

    if negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format centavos as BRL, right-aligned to `width` columns.
///
/// Wider values are returned unpadded, never truncated.
pub fn format_brl_padded(centavos: i64, width: usize) -> String {
    format!("{:>width$}", format_brl(centavos), width = width)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Parse operator currency input into centavos.
///
/// Accepts either `,` or `.` as the decimal separator (`"10,50"`, `"10.50"`)
/// and ignores any other non-digit characters. Fractions beyond the centavo
/// are truncated. Empty, malformed, zero or negative input yields `None`.
pub fn parse_brl(text: &str) -> Option<i64> {
    let sanitized: String = text
        .chars()
        .filter_map(|c| match c {
            ',' => Some('.'),
            '0'..='9' | '.' => Some(c),
            _ => None,
        })
        .collect();

    if sanitized.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&sanitized).ok()?;
    if value <= Decimal::ZERO {
        return None;
    }

    (value * Decimal::ONE_HUNDRED).trunc().to_i64()
}

/// Convert an ISO date (`2026-02-05`) to `05/02/2026`.
///
/// Input that is not an ISO date is returned unchanged.
pub fn format_date_br(iso_date: &str) -> String {
    match NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => iso_date.to_string(),
    }
}
