#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use serde_json::Value;

use super::SessionStore;
use crate::domain::models::ChatError;
use crate::domain::models::EndpointBox;
use crate::domain::models::EndpointError;
use crate::domain::models::EndpointRequest;
use crate::domain::models::Message;
use crate::domain::models::Reply;
use crate::domain::models::SessionId;

pub const RESPONSE_SHAPE_ERROR: &str = "Sorry, I received an unexpected response format.";
pub const ENDPOINT_ERROR_PREFIX: &str = "Sorry, an error occurred: ";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SendState {
    #[default]
    Idle,
    Sending {
        session_id: SessionId,
        text: String,
    },
}

/// How a send cycle ended. Either way exactly one bot message was appended to
/// the session the cycle began in.
#[derive(Debug)]
pub enum SendOutcome {
    Completed,
    Failed(ChatError),
}

/// Drives one send at a time: the user message goes in on `begin`, the bot
/// reply (or an error message standing in for it) on `complete`.
#[derive(Debug, Default)]
pub struct Conversation {
    state: SendState,
}

impl Conversation {
    pub fn state(&self) -> &SendState {
        return &self.state;
    }

    pub fn is_sending(&self) -> bool {
        return self.state != SendState::Idle;
    }

    /// Session the in-flight request belongs to, if any.
    pub fn sending_to(&self) -> Option<&SessionId> {
        match &self.state {
            SendState::Sending { session_id, .. } => return Some(session_id),
            SendState::Idle => return None,
        }
    }

    pub async fn begin(
        &mut self,
        store: &mut SessionStore,
        session_id: &SessionId,
        text: &str,
    ) -> Result<Option<EndpointRequest>, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if self.is_sending() {
            return Err(ChatError::Busy);
        }

        store.append_message(session_id, Message::user(text)).await?;
        self.state = SendState::Sending {
            session_id: session_id.clone(),
            text: text.to_string(),
        };

        tracing::debug!(id = session_id.as_str(), "Sending message");
        return Ok(Some(EndpointRequest::new(text, session_id)));
    }

    pub async fn complete(
        &mut self,
        store: &mut SessionStore,
        response: Result<Value, EndpointError>,
    ) -> Result<SendOutcome, ChatError> {
        let (session_id, text) = match std::mem::take(&mut self.state) {
            SendState::Sending { session_id, text } => (session_id, text),
            SendState::Idle => return Err(ChatError::NotSending),
        };

        let reply = match response {
            Ok(body) => Reply::normalize(&body).map_err(|err| {
                tracing::error!(error = ?err, body = %body, "Unexpected response format");
                return ChatError::ResponseShape(err);
            }),
            Err(err) => {
                tracing::error!(error = ?err, "Endpoint request failed");
                Err(ChatError::Endpoint(err))
            }
        };

        match reply {
            Ok(reply) => {
                store
                    .append_message(&session_id, Message::from_reply(reply))
                    .await?;
                store.derive_title_if_eligible(&session_id, &text).await;
                return Ok(SendOutcome::Completed);
            }
            Err(err) => {
                let message = match &err {
                    ChatError::ResponseShape(_) => Message::error(RESPONSE_SHAPE_ERROR),
                    _ => Message::error(&format!("{ENDPOINT_ERROR_PREFIX}{err}")),
                };
                store.append_message(&session_id, message).await?;
                return Ok(SendOutcome::Failed(err));
            }
        }
    }

    /// One whole cycle against `endpoint`. `Ok(None)` means there was nothing
    /// to send.
    pub async fn send(
        &mut self,
        store: &mut SessionStore,
        endpoint: &EndpointBox,
        session_id: &SessionId,
        text: &str,
    ) -> Result<Option<SendOutcome>, ChatError> {
        let request = match self.begin(store, session_id, text).await? {
            Some(request) => request,
            None => return Ok(None),
        };

        let response = endpoint.send(&request).await;
        let outcome = self.complete(store, response).await?;

        return Ok(Some(outcome));
    }
}
