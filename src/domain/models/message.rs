#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

use super::Reply;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Name shown above a message bubble.
    pub fn display_name(&self) -> String {
        match self {
            Sender::User => {
                let username = Config::get(ConfigKey::Username);
                if username.is_empty() {
                    return "You".to_string();
                }
                return username;
            }
            Sender::Bot => return "Bot".to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Chart,
}

fn is_false(value: &bool) -> bool {
    return !value;
}

/// One turn of a conversation. The serialized layout is shared with the
/// history file, so field names are part of the on-disk format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(rename = "config", default)]
    pub chart_config: Option<Value>,
    /// Milliseconds since the Unix epoch. Zero means not yet assigned.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
}

impl Message {
    fn text(sender: Sender, text: &str) -> Message {
        return Message {
            sender,
            content: Some(text.to_string()),
            kind: MessageKind::Text,
            chart_config: None,
            timestamp: 0,
            error: false,
        };
    }

    pub fn user(text: &str) -> Message {
        return Message::text(Sender::User, text);
    }

    pub fn bot(text: &str) -> Message {
        return Message::text(Sender::Bot, text);
    }

    /// A synthetic bot message describing a failed exchange.
    pub fn error(text: &str) -> Message {
        let mut msg = Message::text(Sender::Bot, text);
        msg.error = true;
        return msg;
    }

    pub fn from_reply(reply: Reply) -> Message {
        return Message {
            sender: Sender::Bot,
            content: reply.content,
            kind: reply.kind,
            chart_config: reply.config,
            timestamp: 0,
            error: false,
        };
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Message {
        self.timestamp = timestamp;
        return self;
    }

    pub fn content_str(&self) -> &str {
        return self.content.as_deref().unwrap_or("");
    }

    /// Charts need a config, and only charts may go without content.
    pub fn is_valid(&self) -> bool {
        match self.kind {
            MessageKind::Chart => return self.chart_config.is_some(),
            MessageKind::Text => return self.content.is_some(),
        }
    }
}
