//! LiqPay responses
//!
//! [`PurchaseResponse`] covers both the direct purchase answer and decoded callbacks;
//! [`CheckoutResponse`] carries the signed form data for the checkout page.

use serde::Serialize;

use crate::error::{GatewayError, GatewayResult};
use crate::payments::status::{PaymentStatus, StatusFlags};
use crate::payments::types::{RawResult, SignedPayload};

/// Checkout page the signed form is posted to
pub const CHECKOUT_URL: &str = "https://www.liqpay.ua/api/3/checkout";

/// Outcome of a request once its status has been classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseVerdict {
    pub successful: bool,
    pub redirect_required: bool,
    pub cancelled: bool,
    pub pending: bool,
    pub under_review: bool,
    pub is_authentic: bool,
}

impl ResponseVerdict {
    pub fn new(flags: StatusFlags, is_authentic: bool) -> Self {
        Self {
            successful: flags.successful,
            redirect_required: flags.redirect_required,
            cancelled: flags.cancelled,
            pending: flags.pending,
            under_review: flags.under_review,
            is_authentic,
        }
    }
}

/// Response to a direct purchase or a completed-purchase callback
#[derive(Debug, Clone)]
pub struct PurchaseResponse {
    raw: RawResult,
    status: PaymentStatus,
    verdict: ResponseVerdict,
    test_mode: bool,
}

impl PurchaseResponse {
    pub fn new(raw: RawResult, is_authentic: bool, test_mode: bool) -> Self {
        let status = PaymentStatus::parse(&raw.status);
        let verdict = ResponseVerdict::new(status.flags(test_mode), is_authentic);
        Self {
            raw,
            status,
            verdict,
            test_mode,
        }
    }

    /// Callers must check [`is_authentic`](Self::is_authentic) before trusting this.
    pub fn is_successful(&self) -> bool {
        self.verdict.successful
    }

    pub fn is_redirect(&self) -> bool {
        self.verdict.redirect_required
    }

    pub fn is_cancelled(&self) -> bool {
        self.verdict.cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.verdict.pending
    }

    pub fn is_under_review(&self) -> bool {
        self.verdict.under_review
    }

    pub fn is_authentic(&self) -> bool {
        self.verdict.is_authentic
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn verdict(&self) -> ResponseVerdict {
        self.verdict
    }

    pub fn status(&self) -> &PaymentStatus {
        &self.status
    }

    /// 3-D Secure page to send the payer to, only while a redirect is required
    pub fn redirect_url(&self) -> Option<&str> {
        if self.is_redirect() {
            self.raw.redirect_to.as_deref()
        } else {
            None
        }
    }

    pub fn redirect_method(&self) -> &'static str {
        "GET"
    }

    /// LiqPay's own payment id
    pub fn transaction_reference(&self) -> Option<&str> {
        self.raw.payment_id.as_deref()
    }

    /// Merchant order id echoed back by LiqPay
    pub fn transaction_id(&self) -> Option<&str> {
        self.raw.order_id.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.raw.err_description.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.raw.err_code.as_deref()
    }

    pub fn raw(&self) -> &RawResult {
        &self.raw
    }

    pub fn require_authentic(self) -> GatewayResult<Self> {
        if self.is_authentic() {
            Ok(self)
        } else {
            Err(GatewayError::AuthenticityFailure)
        }
    }
}

/// Signed checkout form data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    payload: SignedPayload,
    checkout_url: String,
}

impl CheckoutResponse {
    pub fn new(payload: SignedPayload, checkout_url: impl Into<String>) -> Self {
        Self {
            payload,
            checkout_url: checkout_url.into(),
        }
    }

    /// The form is ready to post; the payment outcome arrives later via callback.
    pub fn is_successful(&self) -> bool {
        true
    }

    pub fn encoded_data(&self) -> &str {
        &self.payload.encoded_data
    }

    pub fn signature(&self) -> &str {
        &self.payload.signature
    }

    pub fn checkout_url(&self) -> &str {
        &self.checkout_url
    }

    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        self.payload.form_fields()
    }
}
