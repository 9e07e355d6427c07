//! LiqPay types and data structures
//!
//! Values exchanged with the processor: request field enums, card details, signed payloads
//! and the raw result bag returned by the API or pushed through a callback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// ISO 4217 currency code, stored upper-cased
///
/// Any three-letter code is accepted; the processor decides which ones it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const USD: Currency = Currency(*b"USD");
    pub const EUR: Currency = Currency(*b"EUR");
    pub const RUB: Currency = Currency(*b"RUB");
    pub const UAH: Currency = Currency(*b"UAH");
    pub const BYN: Currency = Currency(*b"BYN");
    pub const KZT: Currency = Currency(*b"KZT");

    pub fn code(&self) -> &str {
        // Only ASCII letters ever get stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    /// Codes are matched case-insensitively; callers commonly pass `usd`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        match <[u8; 3]>::try_from(code.as_bytes()) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_uppercase) => Ok(Currency(bytes)),
            _ => Err(format!("'{}' is not a three-letter currency code", code)),
        }
    }
}

impl Serialize for Currency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Checkout page language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    En,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Transaction type sent in the `action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Pay,
}

/// Card data for the direct purchase flow
///
/// Never logged; `Debug` masks everything except the last four digits.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CardDetails {
    pub fn new(
        number: impl Into<String>,
        expiry_month: u32,
        expiry_year: i32,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry_month,
            expiry_year,
            cvv: cvv.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Card number with separators removed
    pub fn normalized_number(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Four-digit expiry year; two-digit years are taken as 20xx.
    pub fn full_expiry_year(&self) -> i32 {
        if (0..100).contains(&self.expiry_year) {
            2000 + self.expiry_year
        } else {
            self.expiry_year
        }
    }

    pub fn last_four(&self) -> String {
        let digits = self.normalized_number();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format!("****{}", self.last_four()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// Encoded payload plus its signature, as posted to the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedPayload {
    pub encoded_data: String,
    pub signature: String,
}

impl SignedPayload {
    /// Form fields in the shape the processor expects
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("data", &self.encoded_data), ("signature", &self.signature)]
    }
}

/// Server-to-server status notification, as received in the callback form body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundNotification {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl InboundNotification {
    pub fn new(data: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            signature: Some(signature.into()),
        }
    }
}

/// Decoded processor output
///
/// Only `status`, `payment_id`, `order_id`, `redirect_to` and the error fields are
/// interpreted; everything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub err_code: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub err_description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// LiqPay sends numeric ids and error codes as JSON numbers; callers only ever see strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// A null or missing status classifies as unknown instead of failing the decode.
fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(deserializer)?.unwrap_or_default())
}

/// Gateway operations, including the ones this gateway refuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Purchase,
    CompletePurchase,
    Authorize,
    CompleteAuthorize,
    Capture,
    Refund,
    Void,
    CreateCard,
    UpdateCard,
    DeleteCard,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Purchase => "purchase",
            Operation::CompletePurchase => "completePurchase",
            Operation::Authorize => "authorize",
            Operation::CompleteAuthorize => "completeAuthorize",
            Operation::Capture => "capture",
            Operation::Refund => "refund",
            Operation::Void => "void",
            Operation::CreateCard => "createCard",
            Operation::UpdateCard => "updateCard",
            Operation::DeleteCard => "deleteCard",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
