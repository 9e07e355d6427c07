//! Payment gateway implementations
//!
//! Concrete implementations of the PaymentGateway trait for LiqPay.

pub mod liqpay;

pub use liqpay::{DirectGateway, ExpressGateway, LiqPayConfig};
