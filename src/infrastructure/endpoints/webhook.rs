#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Endpoint;
use crate::domain::models::EndpointError;
use crate::domain::models::EndpointRequest;

pub const DEFAULT_TIMEOUT_MS: u64 = 60000;

/// A chat webhook reached with a single JSON POST per message.
pub struct Webhook {
    url: String,
    token: String,
    timeout_ms: u64,
}

impl Default for Webhook {
    fn default() -> Webhook {
        let timeout_ms = Config::get(ConfigKey::RequestTimeout)
            .parse::<u64>()
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        return Webhook {
            url: Config::get(ConfigKey::WebhookURL),
            token: Config::get(ConfigKey::WebhookToken),
            timeout_ms,
        };
    }
}

impl Webhook {
    pub fn new(url: &str, token: &str, timeout_ms: u64) -> Webhook {
        return Webhook {
            url: url.to_string(),
            token: token.to_string(),
            timeout_ms,
        };
    }
}

#[async_trait]
impl Endpoint for Webhook {
    #[allow(clippy::implicit_return)]
    async fn send(&self, request: &EndpointRequest) -> Result<Value, EndpointError> {
        let mut req = reqwest::Client::new()
            .post(&self.url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .json(request);

        if !self.token.is_empty() {
            req = req.bearer_auth(&self.token);
        }

        let res = req.send().await.map_err(|err| {
            tracing::error!(error = ?err, url = self.url.as_str(), "Webhook is not reachable");
            return EndpointError::Transport(err.to_string());
        })?;

        let status = res.status();
        if !status.is_success() {
            let mut body = res.text().await.unwrap_or_default();
            if body.trim().is_empty() {
                body = status.canonical_reason().unwrap_or("Unknown").to_string();
            }
            tracing::error!(status = status.as_u16(), body = body.as_str(), "Webhook request failed");
            return Err(EndpointError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await.map_err(|err| {
            return EndpointError::Transport(err.to_string());
        })?;

        tracing::debug!(status = status.as_u16(), "Webhook responded");

        return serde_json::from_str::<Value>(&body).map_err(|err| {
            tracing::error!(error = ?err, "Webhook returned invalid JSON");
            return EndpointError::Decode(err.to_string());
        });
    }
}
