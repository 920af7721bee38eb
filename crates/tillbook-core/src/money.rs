//! Money parsing and display formatting
//!
//! Amounts travel as plain decimal strings ("1234567.50"). The shop UI shows
//! them grouped with locale separators ("1.234.567,50"); both forms are
//! accepted on input and the display form is produced for output.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separators used when displaying amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

/// Parse a canonical decimal string ("1234567.50")
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    Decimal::from_str(trimmed)
        .map_err(|_| Error::InvalidData(format!("Invalid amount '{}'", trimmed)))
}

/// Strip display grouping and return the canonical digit string
pub fn normalize_display(s: &str, fmt: &NumberFormat) -> Result<String> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let mut out = String::with_capacity(body.len() + 1);
    if negative {
        out.push('-');
    }
    let mut seen_decimal = false;
    for c in body.chars() {
        if c == fmt.thousands_separator || c == ' ' {
            if seen_decimal {
                return Err(Error::InvalidData(format!("Invalid amount '{}'", trimmed)));
            }
            continue;
        }
        if c == fmt.decimal_separator {
            if seen_decimal {
                return Err(Error::InvalidData(format!("Invalid amount '{}'", trimmed)));
            }
            seen_decimal = true;
            out.push('.');
        } else if c.is_ascii_digit() {
            out.push(c);
        } else {
            return Err(Error::InvalidData(format!("Invalid amount '{}'", trimmed)));
        }
    }

    if !out.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidData(format!("Invalid amount '{}'", trimmed)));
    }
    Ok(out)
}

/// Parse a display-formatted amount ("1.234.567,50")
pub fn parse_display_amount(s: &str, fmt: &NumberFormat) -> Result<Decimal> {
    parse_amount(&normalize_display(s, fmt)?)
}

/// Parse user input: canonical form first, then the display form.
///
/// An input valid in both forms ("1.234" with '.' grouping) is read as canonical.
pub fn parse_amount_input(s: &str, fmt: &NumberFormat) -> Result<Decimal> {
    parse_amount(s).or_else(|_| parse_display_amount(s, fmt))
}

/// Format an amount with thousands grouping, keeping its stored scale
pub fn format_amount(amount: Decimal, fmt: &NumberFormat) -> String {
    let digits = amount.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(fmt.thousands_separator);
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(fmt.decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Format with a currency symbol prefix ("Rp 1.234.567")
pub fn format_money(amount: Decimal, currency: &str, fmt: &NumberFormat) -> String {
    format!("{} {}", currency, format_amount(amount, fmt))
}

/// Largest magnitude accepted for a single amount or quantity (10^15)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Most decimal places accepted on input
pub const MAX_AMOUNT_SCALE: u32 = 4;

fn out_of_range() -> Error {
    Error::InvalidData("Amount out of range".to_string())
}

/// Addition that reports overflow as `InvalidData` instead of panicking
pub fn add_exact(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(out_of_range)
}

pub fn sub_exact(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(out_of_range)
}

pub fn mul_exact(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(out_of_range)
}

pub fn div_exact(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_div(b).ok_or_else(out_of_range)
}
