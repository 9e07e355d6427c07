//! LiqPay payment integration module
//!
//! Builds signed requests toward LiqPay, interprets its answers and authenticates the
//! server-to-server callbacks it sends when a payment changes status.

pub mod card;
pub mod providers;
pub mod requests;
pub mod response;
pub mod signature;
pub mod status;
pub mod traits;
pub mod transport;
pub mod types;
pub mod validation;
