use axum::{extract::State, Form, Json};
use liqpay_gateway::{
    CheckoutRequest, CheckoutResponse, InboundNotification, PaymentGateway, ResponseVerdict,
};
use serde::Serialize;
use tracing::{info, warn};

use super::{ApiError, AppState};

/// Signs checkout form data for the payer's browser.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let response = state.gateway.purchase(request).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct CallbackReceipt {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: String,
    pub verdict: ResponseVerdict,
}

/// LiqPay status callback. Forged notifications are logged and refused.
pub async fn handle_callback(
    State(state): State<AppState>,
    Form(notification): Form<InboundNotification>,
) -> Result<Json<CallbackReceipt>, ApiError> {
    let response = state.gateway.complete_purchase(&notification)?;

    if !response.is_authentic() {
        warn!(
            "Refusing LiqPay callback with bad signature: order_id={:?}, status={}",
            response.transaction_id(),
            response.status()
        );
    }
    let response = response.require_authentic()?;

    info!(
        "LiqPay callback accepted: order_id={:?}, successful={}, pending={}",
        response.transaction_id(),
        response.is_successful(),
        response.is_pending()
    );

    Ok(Json(CallbackReceipt {
        order_id: response.transaction_id().map(String::from),
        payment_id: response.transaction_reference().map(String::from),
        status: response.status().to_string(),
        verdict: response.verdict(),
    }))
}
