//! LiqPay payment gateway adapter
//!
//! Checkout form signing, direct card purchases and callback verification for the LiqPay
//! processor.

pub mod error;
pub mod payments;

pub use error::{FieldViolation, GatewayError, GatewayResult};
pub use payments::providers::{DirectGateway, ExpressGateway, LiqPayConfig};
pub use payments::requests::{CheckoutRequest, PurchaseRequest};
pub use payments::response::{CheckoutResponse, PurchaseResponse, ResponseVerdict};
pub use payments::status::{classify, PaymentStatus, StatusFlags};
pub use payments::traits::{PaymentGateway, Transport};
pub use payments::types::{CardDetails, InboundNotification, Operation, RawResult};
