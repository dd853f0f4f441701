//! SMS channel over an HTTP gateway.

use async_trait::async_trait;
use serde_json::json;

use super::SmsSender;
use licreg_common::config::GatewayConfig;
use licreg_common::{AppError, AppResult};

/// SMS sender posting to a JSON gateway endpoint.
#[derive(Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpSmsSender {
    /// Create a sender for the given gateway.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, phone: &str, body: &str) -> AppResult<()> {
        let mut request = self.client.post(&self.config.url).json(&json!({
            "to": phone,
            "message": body,
        }));

        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::DeliveryFailure(format!("SMS gateway request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::DeliveryFailure(format!(
                "SMS gateway returned {status}: {text}"
            )));
        }

        Ok(())
    }
}
