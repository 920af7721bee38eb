//! Field-level request validation
//!
//! Checks accumulate into a list of [`FieldError`]s so a form can show every
//! problem at once instead of failing on the first one.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::money::{parse_amount_input, NumberFormat, MAX_AMOUNT, MAX_AMOUNT_SCALE};
use crate::period::{MAX_YEAR, MIN_YEAR};

/// A validation failure on one named field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.]{3,32}$").expect("valid username regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9]{6,15}$").expect("valid phone regex"))
}

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Collects field errors for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Require a non-blank string
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.error(field, "is required");
        }
        self
    }

    /// Require a non-blank string when the value is present (partial updates)
    pub fn not_blank(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.error(field, message);
        }
        self
    }

    pub fn month(&mut self, field: &str, month: u32) -> &mut Self {
        self.check((1..=12).contains(&month), field, "must be between 1 and 12")
    }

    pub fn year(&mut self, field: &str, year: i32) -> &mut Self {
        self.check(
            (MIN_YEAR..=MAX_YEAR).contains(&year),
            field,
            "must be a four-digit year",
        )
    }

    pub fn percentage(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(
            value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED,
            field,
            "must be between 0 and 100",
        )
    }

    pub fn username(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            username_re().is_match(value),
            field,
            "must be 3-32 letters, digits, '_' or '.'",
        )
    }

    pub fn phone(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            phone_re().is_match(value),
            field,
            "must be 6-15 digits, optionally prefixed with '+'",
        )
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            value.chars().count() >= MIN_PASSWORD_LEN,
            field,
            "must be at least 8 characters",
        )
    }

    /// Parse a money amount, recording a field error on failure.
    /// Negative, oversized and over-precise amounts are rejected.
    pub fn amount(&mut self, field: &str, raw: &str, fmt: &NumberFormat) -> Option<Decimal> {
        if raw.trim().is_empty() {
            self.error(field, "is required");
            return None;
        }
        match parse_amount_input(raw, fmt) {
            Ok(value) => {
                let before = self.errors.len();
                self.quantity(field, value);
                (self.errors.len() == before).then_some(value)
            }
            Err(_) => {
                self.error(field, "is not a valid amount");
                None
            }
        }
    }

    /// Bounds shared by amounts and stock quantities: non-negative, at most
    /// [`MAX_AMOUNT`] and [`MAX_AMOUNT_SCALE`] decimal places
    pub fn quantity(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value.is_sign_negative() && !value.is_zero() {
            self.error(field, "must not be negative")
        } else if value > MAX_AMOUNT {
            self.error(field, "must not exceed 1000000000000000")
        } else if value.normalize().scale() > MAX_AMOUNT_SCALE {
            self.error(field, "must have at most 4 decimal places")
        } else {
            self
        }
    }

    /// Like [`Validator::amount`] but for optional (partial update) fields
    pub fn optional_amount(
        &mut self,
        field: &str,
        raw: Option<&str>,
        fmt: &NumberFormat,
    ) -> Option<Decimal> {
        raw.and_then(|r| self.amount(field, r, fmt))
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation: `Ok` when no field failed
    pub fn finish(&mut self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(std::mem::take(&mut self.errors)))
        }
    }
}
