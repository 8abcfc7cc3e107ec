pub mod webhook;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::EndpointBox;

pub struct EndpointManager {}

impl EndpointManager {
    pub fn get() -> Result<EndpointBox> {
        if Config::get(ConfigKey::WebhookURL).is_empty() {
            bail!("No webhook URL configured. Set it with --webhook-url, HOOKCHAT_WEBHOOK_URL, or in the config file");
        }

        return Ok(Box::<webhook::Webhook>::default());
    }
}
