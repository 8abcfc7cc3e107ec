use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

use super::EndpointError;
use super::SessionId;

/// Body posted to the endpoint for every user message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRequest {
    pub chat_input: String,
    pub session_id: SessionId,
}

impl EndpointRequest {
    pub fn new(chat_input: &str, session_id: &SessionId) -> EndpointRequest {
        return EndpointRequest {
            chat_input: chat_input.to_string(),
            session_id: session_id.clone(),
        };
    }
}

#[async_trait]
pub trait Endpoint {
    /// Posts a single message and returns the decoded response body. The body
    /// is returned as-is; making sense of its shape is left to
    /// [`super::Reply::normalize`].
    async fn send(&self, request: &EndpointRequest) -> Result<Value, EndpointError>;
}

pub type EndpointBox = Box<dyn Endpoint + Send + Sync>;
