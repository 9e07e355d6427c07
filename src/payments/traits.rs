//! Gateway and transport trait definitions
//!
//! Defines the interface both LiqPay gateways implement and the HTTP seam the direct
//! purchase sends through.

use std::convert::Infallible;

use async_trait::async_trait;

use crate::error::{GatewayError, GatewayResult};
use crate::payments::response::PurchaseResponse;
use crate::payments::types::{InboundNotification, Operation};

/// Trait for LiqPay gateway flavours
///
/// Only purchase and purchase completion exist. Every other operation fails with
/// [`GatewayError::UnsupportedOperation`] before any payload is built or any request sent.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fields the caller supplies to start a purchase
    type Purchase: Send + 'static;
    /// What a purchase produces (signed form data or a processor response)
    type PurchaseOutcome: Send;

    /// Gateway name, e.g. `LiqPay_Express`
    fn name(&self) -> &'static str;

    /// Start a payment
    ///
    /// # Arguments
    /// * `request` - Unvalidated purchase fields; every missing or invalid one is reported
    ///
    /// # Returns
    /// * `Self::PurchaseOutcome` - Result of the flavour's purchase flow
    async fn purchase(&self, request: Self::Purchase) -> GatewayResult<Self::PurchaseOutcome>;

    /// Interpret a server-to-server status notification
    ///
    /// The response is returned even when the signature does not match; check
    /// `is_authentic` before acting on it.
    fn complete_purchase(
        &self,
        notification: &InboundNotification,
    ) -> GatewayResult<PurchaseResponse>;

    fn authorize(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::Authorize))
    }

    fn complete_authorize(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::CompleteAuthorize))
    }

    fn capture(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::Capture))
    }

    fn refund(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::Refund))
    }

    fn void(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::Void))
    }

    fn create_card(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::CreateCard))
    }

    fn update_card(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::UpdateCard))
    }

    fn delete_card(&self) -> GatewayResult<Infallible> {
        Err(GatewayError::unsupported(Operation::DeleteCard))
    }
}

/// Raw HTTP seam used by the direct purchase
///
/// Implementations post url-encoded form fields and return the response body. They own
/// timeouts; the gateway neither retries nor cancels.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> GatewayResult<String>;
}
