//! Checkout form request
//!
//! Nothing is sent to LiqPay here. The signed payload is handed back so the payer's browser
//! can post it to the checkout page (https://www.liqpay.com/en/doc/checkout).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;
use crate::payments::providers::liqpay::LiqPayConfig;
use crate::payments::types::{Action, Currency, Language};
use crate::payments::validation::Violations;

/// Checkout fields as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub notify_url: Option<String>,
}

impl CheckoutRequest {
    pub fn new() -> Self {
        Self::default()
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

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    /// Every field is required for the checkout page.
    pub fn validate(&self) -> GatewayResult<ValidatedCheckout> {
        let mut violations = Violations::new();

        let amount = violations.require_amount("amount", self.amount);
        let currency = violations.require_parsed::<Currency>("currency", self.currency.as_deref());
        let description = violations.require_text("description", self.description.as_deref());
        let transaction_id =
            violations.require_text("transactionId", self.transaction_id.as_deref());
        let language = violations.require_parsed::<Language>("language", self.language.as_deref());
        let return_url = violations.require_url("returnUrl", self.return_url.as_deref());
        let notify_url = violations.require_url("notifyUrl", self.notify_url.as_deref());

        match (
            amount,
            currency,
            description,
            transaction_id,
            language,
            return_url,
            notify_url,
        ) {
            (
                Some(amount),
                Some(currency),
                Some(description),
                Some(transaction_id),
                Some(language),
                Some(return_url),
                Some(notify_url),
            ) if violations.is_empty() => Ok(ValidatedCheckout {
                amount,
                currency,
                description,
                transaction_id,
                language,
                return_url,
                notify_url,
            }),
            _ => Err(violations.into_error()),
        }
    }
}

/// Checkout fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCheckout {
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub transaction_id: String,
    pub language: Language,
    pub return_url: String,
    pub notify_url: String,
}

impl ValidatedCheckout {
    pub fn build(&self, config: &LiqPayConfig) -> CheckoutPayload {
        CheckoutPayload {
            version: config.version,
            public_key: config.public_key.clone(),
            action: Action::Pay,
            amount: format!("{:.2}", self.amount),
            currency: self.currency,
            description: self.description.clone(),
            order_id: self.transaction_id.clone(),
            language: self.language,
            result_url: self.return_url.clone(),
            server_url: self.notify_url.clone(),
            sandbox: u8::from(config.test_mode),
        }
    }
}

/// Checkout payload; field order here is the encoding order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPayload {
    pub version: u32,
    pub public_key: String,
    pub action: Action,
    pub amount: String,
    pub currency: Currency,
    pub description: String,
    pub order_id: String,
    pub language: Language,
    pub result_url: String,
    pub server_url: String,
    pub sandbox: u8,
}
