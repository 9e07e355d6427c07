//! Server-to-server callback
//!
//! LiqPay posts `data` and `signature` to the notify URL whenever a payment changes status
//! (https://www.liqpay.com/en/doc/callback). The signature is recomputed over the raw
//! `data` string as received, not over a re-encoding of the decoded payload.

use tracing::{debug, warn};

use crate::error::GatewayResult;
use crate::payments::signature::{self, SignatureCodec};
use crate::payments::types::{InboundNotification, RawResult};
use crate::payments::validation::Violations;

/// A notification whose required fields are present
#[derive(Debug, Clone)]
pub struct CompletePurchaseRequest {
    data: String,
    signature: String,
}

impl CompletePurchaseRequest {
    pub fn from_notification(notification: &InboundNotification) -> GatewayResult<Self> {
        let mut violations = Violations::new();
        // `data` is base64 and may legitimately end in '=', so it is not trimmed.
        let data = violations.require(
            "data",
            notification.data.clone().filter(|d| !d.is_empty()),
        );
        let signature = violations.require_text("signature", notification.signature.as_deref());

        match (data, signature) {
            (Some(data), Some(signature)) if violations.is_empty() => Ok(Self { data, signature }),
            _ => Err(violations.into_error()),
        }
    }

    pub fn verify_and_decode(&self, codec: &SignatureCodec) -> GatewayResult<(RawResult, bool)> {
        verify_and_decode(codec, &self.data, &self.signature)
    }
}

/// Decodes a notification and reports whether its signature holds.
///
/// A forged notification still decodes so its status can be inspected, but nothing may be
/// acted upon unless the returned flag is `true`.
pub fn verify_and_decode(
    codec: &SignatureCodec,
    data: &str,
    claimed_signature: &str,
) -> GatewayResult<(RawResult, bool)> {
    let is_authentic = codec.verify(data, claimed_signature)?;
    let raw: RawResult = signature::decode(data)?;

    if is_authentic {
        debug!(
            "LiqPay callback verified: order_id={:?}, status={}",
            raw.order_id, raw.status
        );
    } else {
        warn!(
            "LiqPay callback signature mismatch: order_id={:?}, status={}",
            raw.order_id, raw.status
        );
    }

    Ok((raw, is_authentic))
}
