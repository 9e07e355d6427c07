use axum::{extract::State, Json};
use liqpay_gateway::PaymentGateway;
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub gateway: String,
    pub sandbox: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let version = env!("CARGO_PKG_VERSION").to_string();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version,
        environment: state.environment.clone(),
        gateway: state.gateway.name().to_string(),
        sandbox: state.gateway.config().test_mode,
    })
}
