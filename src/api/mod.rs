pub mod checkout;
pub mod health;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use liqpay_gateway::{ExpressGateway, GatewayError};
use serde::Serialize;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ExpressGateway>,
    pub environment: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/liqpay/checkout", post(checkout::create_checkout))
        .route("/liqpay/callback", post(checkout::handle_callback))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GatewayError::Validation { .. }
            | GatewayError::MalformedPayload { .. }
            | GatewayError::AuthenticityFailure => StatusCode::BAD_REQUEST,
            GatewayError::UnsupportedOperation { .. } => StatusCode::NOT_IMPLEMENTED,
            GatewayError::Transport { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.to_string(),
            fields: self
                .0
                .violated_fields()
                .into_iter()
                .map(String::from)
                .collect(),
        };
        (status, Json(body)).into_response()
    }
}
