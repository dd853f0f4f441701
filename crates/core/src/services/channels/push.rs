//! Push channel over an HTTP gateway.

use async_trait::async_trait;
use serde_json::json;

use super::PushSender;
use licreg_common::config::GatewayConfig;
use licreg_common::{AppError, AppResult};

/// Push sender posting to a JSON gateway endpoint, addressed by user id.
#[derive(Clone)]
pub struct HttpPushSender {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpPushSender {
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
impl PushSender for HttpPushSender {
    async fn send(&self, user_id: &str, body: &str) -> AppResult<()> {
        let mut request = self.client.post(&self.config.url).json(&json!({
            "userId": user_id,
            "message": body,
        }));

        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::DeliveryFailure(format!("push gateway request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::DeliveryFailure(format!(
                "push gateway returned {status}: {text}"
            )));
        }

        Ok(())
    }
}
