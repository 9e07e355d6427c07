//! reqwest-backed [`Transport`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::error::{GatewayError, GatewayResult};
use crate::payments::traits::Transport;

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("liqpay-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> GatewayResult<String> {
        debug!("POST {}", url);

        let response = self.client.post(url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("LiqPay API returned HTTP {}", status);
            return Err(GatewayError::transport(
                format!("HTTP {}: {}", status, body),
                Some(status.as_u16()),
            ));
        }

        Ok(body)
    }
}
