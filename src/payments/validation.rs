//! Request field validation
//!
//! Collects every violation so a rejected request reports all of its problems at once.

use std::str::FromStr;

use rust_decimal::Decimal;
use url::Url;

use crate::error::{FieldViolation, GatewayError, GatewayResult};

#[derive(Debug, Default)]
pub struct Violations {
    violations: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn invalid(&mut self, field: &str, reason: impl Into<String>) {
        self.push(FieldViolation::invalid(field, reason));
    }

    pub fn require<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(FieldViolation::missing(field));
        }
        value
    }

    /// Blank strings count as missing.
    pub fn require_text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => Some(text.to_string()),
            _ => {
                self.push(FieldViolation::missing(field));
                None
            }
        }
    }

    pub fn require_parsed<T>(&mut self, field: &str, value: Option<&str>) -> Option<T>
    where
        T: FromStr<Err = String>,
    {
        let text = self.require_text(field, value)?;
        match text.parse() {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                self.invalid(field, reason);
                None
            }
        }
    }

    /// Returns the URL text exactly as given once it parses as an absolute http(s) URL.
    pub fn require_url(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let text = self.require_text(field, value)?;
        self.check_url(field, &text)
    }

    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value.map(str::trim) {
            Some(text) if !text.is_empty() => self.check_url(field, text),
            _ => None,
        }
    }

    fn check_url(&mut self, field: &str, text: &str) -> Option<String> {
        match Url::parse(text) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(text.to_string()),
            Ok(url) => {
                self.invalid(field, format!("unsupported URL scheme '{}'", url.scheme()));
                None
            }
            Err(e) => {
                self.invalid(field, format!("must be an absolute URL ({})", e));
                None
            }
        }
    }

    /// Positive, and no finer than the currency's minor unit.
    pub fn require_amount(&mut self, field: &str, value: Option<Decimal>) -> Option<Decimal> {
        let amount = self.require(field, value)?;
        if amount <= Decimal::ZERO {
            self.invalid(field, "must be greater than zero");
            return None;
        }
        if amount.normalize().scale() > 2 {
            self.invalid(field, "must not have more than 2 decimal places");
            return None;
        }
        Some(amount)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn into_error(self) -> GatewayError {
        GatewayError::validation(self.violations)
    }

    pub fn finish(self) -> GatewayResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}
