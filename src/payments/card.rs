//! Card checks run before a direct purchase is sent

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::payments::types::CardDetails;
use crate::payments::validation::Violations;

fn card_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{12,19}$").expect("valid card number pattern"))
}

fn cvv_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{3,4}$").expect("valid cvv pattern"))
}

/// Luhn mod-10 checksum over a digit string.
pub fn luhn_valid(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Validates the card against today's UTC date.
pub fn validate_card(card: &CardDetails, violations: &mut Violations) {
    validate_card_at(card, Utc::now().date_naive(), violations)
}

/// A card stays valid through the last day of its expiry month.
pub fn validate_card_at(card: &CardDetails, today: NaiveDate, violations: &mut Violations) {
    let number = card.normalized_number();
    if number.is_empty() {
        violations.invalid("card.number", "is required");
    } else if !card_number_pattern().is_match(&number) {
        violations.invalid("card.number", "must contain 12 to 19 digits");
    } else if !luhn_valid(&number) {
        violations.invalid("card.number", "failed checksum");
    }

    let month_ok = (1..=12).contains(&card.expiry_month);
    if !month_ok {
        violations.invalid("card.expiryMonth", "must be between 1 and 12");
    }
    let year = card.full_expiry_year();
    if card.expiry_year <= 0 {
        violations.invalid("card.expiryYear", "is required");
    } else if (100..1000).contains(&card.expiry_year) {
        violations.invalid("card.expiryYear", "must have 2 or 4 digits");
    } else if month_ok && (year, card.expiry_month) < (today.year(), today.month()) {
        violations.invalid("card.expiryYear", "card has expired");
    }

    if !cvv_pattern().is_match(card.cvv.trim()) {
        violations.invalid("card.cvv", "must contain 3 or 4 digits");
    }
}
