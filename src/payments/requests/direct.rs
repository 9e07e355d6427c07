//! Direct card purchase
//!
//! Card data goes server-to-server to the `payment/pay` API method
//! (https://www.liqpay.com/en/doc/pay). Cards enrolled in 3-D Secure come back with
//! `3ds_verify` and a redirect; other cards are charged in one step.

use std::net::IpAddr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;
use crate::payments::card::validate_card;
use crate::payments::providers::liqpay::LiqPayConfig;
use crate::payments::types::{CardDetails, Currency};
use crate::payments::validation::Violations;

/// API method path, relative to the API base URL
pub const API_METHOD: &str = "payment/pay";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(default)]
    pub card: Option<CardDetails>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub notify_url: Option<String>,
}

impl PurchaseRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(mut self, card: CardDetails) -> Self {
        self.card = Some(card);
        self
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    pub fn validate(&self) -> GatewayResult<ValidatedPurchase> {
        let mut violations = Violations::new();

        let card = violations.require("card", self.card.clone());
        if let Some(card) = &card {
            validate_card(card, &mut violations);
        }
        let amount = violations.require_amount("amount", self.amount);
        let currency = violations.require_parsed::<Currency>("currency", self.currency.as_deref());
        let description = violations.require_text("description", self.description.as_deref());
        let transaction_id =
            violations.require_text("transactionId", self.transaction_id.as_deref());
        let client_ip = violations.require_parsed::<IpAddrText>("clientIp", self.client_ip.as_deref());
        let notify_url = violations.optional_url("notifyUrl", self.notify_url.as_deref());

        match (card, amount, currency, description, transaction_id, client_ip) {
            (
                Some(card),
                Some(amount),
                Some(currency),
                Some(description),
                Some(transaction_id),
                Some(client_ip),
            ) if violations.is_empty() => Ok(ValidatedPurchase {
                card,
                amount,
                currency,
                description,
                transaction_id,
                client_ip: client_ip.0,
                notify_url,
            }),
            _ => Err(violations.into_error()),
        }
    }
}

// Keeps the caller's spelling of the address while checking it parses.
struct IpAddrText(String);

impl std::str::FromStr for IpAddrText {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IpAddr>()
            .map(|_| IpAddrText(s.to_string()))
            .map_err(|_| format!("'{}' is not an IP address", s))
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedPurchase {
    pub card: CardDetails,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub transaction_id: String,
    pub client_ip: String,
    pub notify_url: Option<String>,
}

impl ValidatedPurchase {
    pub fn build(&self, config: &LiqPayConfig) -> DirectPayload {
        DirectPayload {
            public_key: config.public_key.clone(),
            purchase: PurchaseBody {
                version: config.version,
                phone: self.card.phone.clone(),
                amount: self.amount,
                currency: self.currency,
                description: self.description.clone(),
                order_id: self.transaction_id.clone(),
                card: self.card.normalized_number(),
                card_exp_month: format!("{:02}", self.card.expiry_month),
                card_exp_year: self.card.full_expiry_year().to_string(),
                card_cvv: self.card.cvv.trim().to_string(),
                browser_ip: self.client_ip.clone(),
                server_url: self.notify_url.clone(),
                sandbox: config.test_mode.then_some(1),
            },
        }
    }
}

/// Envelope posted to `payment/pay`
#[derive(Clone, Serialize)]
pub struct DirectPayload {
    pub public_key: String,
    pub purchase: PurchaseBody,
}

/// Purchase fields; `server_url` and `sandbox` are left out entirely when unset.
#[derive(Clone, Serialize)]
pub struct PurchaseBody {
    pub version: u32,
    pub phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub order_id: String,
    pub card: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    pub card_cvv: String,
    pub browser_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<u8>,
}
