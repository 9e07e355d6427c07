//! LiqPay request variants
//!
//! Each request goes through the same steps: the caller fills an unvalidated request,
//! `validate` turns it into a validated value (or reports every bad field), and the
//! validated value shapes the payload that gets signed.

pub mod callback;
pub mod checkout;
pub mod direct;

pub use callback::{verify_and_decode, CompletePurchaseRequest};
pub use checkout::{CheckoutPayload, CheckoutRequest, ValidatedCheckout};
pub use direct::{DirectPayload, PurchaseBody, PurchaseRequest, ValidatedPurchase};
