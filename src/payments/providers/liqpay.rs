//! LiqPay gateway implementations
//!
//! Two flavours share one configuration and signature codec:
//! - [`ExpressGateway`] only prepares signed checkout form data for the payer's browser.
//! - [`DirectGateway`] charges card data server-to-server through a [`Transport`].
//!
//! Both verify the callbacks LiqPay posts to the notify URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::payments::requests::direct::API_METHOD;
use crate::payments::requests::{CheckoutRequest, CompletePurchaseRequest, PurchaseRequest};
use crate::payments::response::{CheckoutResponse, PurchaseResponse, CHECKOUT_URL};
use crate::payments::signature::SignatureCodec;
use crate::payments::traits::{PaymentGateway, Transport};
use crate::payments::transport::HttpTransport;
use crate::payments::types::{InboundNotification, RawResult};

pub const API_VERSION: u32 = 3;
pub const DEFAULT_API_URL: &str = "https://www.liqpay.ua/api/";

/// LiqPay gateway configuration
#[derive(Debug, Clone)]
pub struct LiqPayConfig {
    /// API version sent with every payload
    pub version: u32,
    pub public_key: String,
    /// Only ever used to sign; never logged or sent
    pub private_key: SecretString,
    /// Sandbox payments, reported with the `sandbox` status
    pub test_mode: bool,
    /// Base URL for server-to-server API methods
    pub api_url: String,
    pub checkout_url: String,
    /// Request timeout in seconds for the default HTTP transport
    pub timeout_secs: u64,
}

impl Default for LiqPayConfig {
    fn default() -> Self {
        Self {
            version: API_VERSION,
            public_key: String::new(),
            private_key: SecretString::new(String::new()),
            test_mode: false,
            api_url: DEFAULT_API_URL.to_string(),
            checkout_url: CHECKOUT_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl LiqPayConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: SecretString::new(private_key.into()),
            ..Self::default()
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Create config from environment variables
    pub fn from_env() -> GatewayResult<Self> {
        let public_key = std::env::var("LIQPAY_PUBLIC_KEY").map_err(|_| {
            GatewayError::config("LIQPAY_PUBLIC_KEY environment variable is required")
        })?;

        let private_key = std::env::var("LIQPAY_PRIVATE_KEY").map_err(|_| {
            GatewayError::config("LIQPAY_PRIVATE_KEY environment variable is required")
        })?;

        let version = match std::env::var("LIQPAY_VERSION") {
            Ok(v) => v
                .parse()
                .map_err(|_| GatewayError::config("LIQPAY_VERSION must be a positive integer"))?,
            Err(_) => API_VERSION,
        };

        let test_mode = std::env::var("LIQPAY_SANDBOX")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let api_url =
            std::env::var("LIQPAY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let checkout_url =
            std::env::var("LIQPAY_CHECKOUT_URL").unwrap_or_else(|_| CHECKOUT_URL.to_string());

        let timeout_secs = std::env::var("LIQPAY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let config = Self {
            version,
            public_key,
            private_key: SecretString::new(private_key),
            test_mode,
            api_url,
            checkout_url,
            timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if self.public_key.trim().is_empty() {
            return Err(GatewayError::config("public key cannot be empty"));
        }
        if self.private_key.expose_secret().is_empty() {
            return Err(GatewayError::config("private key cannot be empty"));
        }
        if self.version == 0 {
            return Err(GatewayError::config("API version must be greater than 0"));
        }
        Url::parse(&self.api_url)
            .map_err(|e| GatewayError::config(format!("invalid API URL '{}': {}", self.api_url, e)))?;
        Url::parse(&self.checkout_url).map_err(|e| {
            GatewayError::config(format!("invalid checkout URL '{}': {}", self.checkout_url, e))
        })?;
        Ok(())
    }

    /// Endpoint for an API method such as `payment/pay`
    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), method)
    }
}

/// Parameters a freshly created gateway starts from
pub fn default_parameters() -> LiqPayConfig {
    LiqPayConfig::default()
}

// Configuration and codec are fixed once the gateway exists.
struct GatewayCore {
    config: LiqPayConfig,
    codec: SignatureCodec,
}

impl GatewayCore {
    fn new(config: LiqPayConfig) -> GatewayResult<Self> {
        config.validate()?;
        let codec = SignatureCodec::new(config.private_key.clone())?;
        Ok(Self { config, codec })
    }

    fn complete_purchase(
        &self,
        notification: &InboundNotification,
    ) -> GatewayResult<PurchaseResponse> {
        let request = CompletePurchaseRequest::from_notification(notification)?;
        let (raw, is_authentic) = request.verify_and_decode(&self.codec)?;
        let response = PurchaseResponse::new(raw, is_authentic, self.config.test_mode);

        info!(
            "LiqPay callback processed: order_id={:?}, status={}, authentic={}",
            response.transaction_id(),
            response.status(),
            is_authentic
        );

        Ok(response)
    }
}

/// Checkout-form gateway (`LiqPay_Express`)
pub struct ExpressGateway {
    core: GatewayCore,
}

impl ExpressGateway {
    pub fn new(config: LiqPayConfig) -> GatewayResult<Self> {
        Ok(Self {
            core: GatewayCore::new(config)?,
        })
    }

    pub fn from_env() -> GatewayResult<Self> {
        Self::new(LiqPayConfig::from_env()?)
    }

    pub fn config(&self) -> &LiqPayConfig {
        &self.core.config
    }

    /// Validates, shapes and signs checkout form data. Performs no I/O.
    pub fn checkout(&self, request: &CheckoutRequest) -> GatewayResult<CheckoutResponse> {
        let validated = request.validate().map_err(|e| {
            warn!("Rejected LiqPay checkout request: {}", e);
            e
        })?;
        let payload = validated.build(&self.core.config);
        let signed = self.core.codec.seal(&payload)?;

        info!(
            "LiqPay checkout prepared: order_id={}, amount={} {}, sandbox={}",
            payload.order_id, payload.amount, payload.currency, payload.sandbox
        );

        Ok(CheckoutResponse::new(signed, &self.core.config.checkout_url))
    }
}

#[async_trait]
impl PaymentGateway for ExpressGateway {
    type Purchase = CheckoutRequest;
    type PurchaseOutcome = CheckoutResponse;

    fn name(&self) -> &'static str {
        "LiqPay_Express"
    }

    async fn purchase(&self, request: CheckoutRequest) -> GatewayResult<CheckoutResponse> {
        self.checkout(&request)
    }

    fn complete_purchase(
        &self,
        notification: &InboundNotification,
    ) -> GatewayResult<PurchaseResponse> {
        self.core.complete_purchase(notification)
    }
}

/// Server-to-server card gateway (`LiqPay`)
pub struct DirectGateway {
    core: GatewayCore,
    transport: Arc<dyn Transport>,
}

impl DirectGateway {
    pub fn new(config: LiqPayConfig, transport: Arc<dyn Transport>) -> GatewayResult<Self> {
        Ok(Self {
            core: GatewayCore::new(config)?,
            transport,
        })
    }

    /// Gateway using the reqwest transport with the configured timeout
    pub fn with_http_transport(config: LiqPayConfig) -> GatewayResult<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::new(config, Arc::new(transport))
    }

    pub fn config(&self) -> &LiqPayConfig {
        &self.core.config
    }

    async fn send_purchase(&self, request: &PurchaseRequest) -> GatewayResult<PurchaseResponse> {
        let validated = request.validate().map_err(|e| {
            warn!("Rejected LiqPay purchase request: {}", e);
            e
        })?;
        let payload = validated.build(&self.core.config);
        let signed = self.core.codec.seal(&payload)?;

        info!(
            "Sending LiqPay purchase: order_id={}, amount={} {}, card=****{}",
            validated.transaction_id,
            validated.amount,
            validated.currency,
            validated.card.last_four()
        );

        let url = self.core.config.endpoint(API_METHOD);
        let body = self
            .transport
            .post_form(&url, &signed.form_fields())
            .await
            .map_err(|e| {
                error!(
                    "LiqPay purchase request failed: order_id={}, error={}",
                    validated.transaction_id, e
                );
                e
            })?;

        let raw: RawResult = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse LiqPay response: {}", e);
            GatewayError::malformed(format!("Invalid response format: {}", e))
        })?;

        // Synchronous answers are taken as authentic; only callbacks are signature-checked.
        debug!("Trusting synchronous LiqPay response without signature check");
        let response = PurchaseResponse::new(raw, true, self.core.config.test_mode);

        info!(
            "LiqPay purchase answered: order_id={}, payment_id={:?}, status={}",
            validated.transaction_id,
            response.transaction_reference(),
            response.status()
        );

        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for DirectGateway {
    type Purchase = PurchaseRequest;
    type PurchaseOutcome = PurchaseResponse;

    fn name(&self) -> &'static str {
        "LiqPay"
    }

    async fn purchase(&self, request: PurchaseRequest) -> GatewayResult<PurchaseResponse> {
        self.send_purchase(&request).await
    }

    fn complete_purchase(
        &self,
        notification: &InboundNotification,
    ) -> GatewayResult<PurchaseResponse> {
        self.core.complete_purchase(notification)
    }
}
