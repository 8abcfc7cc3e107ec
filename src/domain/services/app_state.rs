#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use ratatui::prelude::Rect;
use serde_json::Value;
use tokio::sync::mpsc;

use super::view;
use super::view::SidebarEntry;
use super::BubbleList;
use super::Conversation;
use super::Scroll;
use super::SendOutcome;
use super::SendState;
use super::SessionStore;
use crate::domain::models::Action;
use crate::domain::models::ChatError;
use crate::domain::models::EndpointError;
use crate::domain::models::Session;
use crate::domain::models::SessionId;

pub struct AppState {
    pub active: SessionId,
    pub bubble_list: BubbleList,
    pub conversation: Conversation,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub scroll: Scroll,
    pub store: SessionStore,
}

impl AppState {
    pub async fn new(mut store: SessionStore, requested: Option<&SessionId>) -> AppState {
        let active = store.resolve(requested).await;

        return AppState {
            active,
            bubble_list: BubbleList::default(),
            conversation: Conversation::default(),
            last_known_height: 0,
            last_known_width: 0,
            scroll: Scroll::default(),
            store,
        };
    }

    pub fn is_waiting(&self) -> bool {
        return self.conversation.is_sending();
    }

    pub fn active_session(&self) -> Option<&Session> {
        return self.store.get(&self.active);
    }

    pub fn active_title(&self) -> String {
        return self
            .active_session()
            .map(|e| return e.title.to_string())
            .unwrap_or_default();
    }

    /// Title of the session a reply is pending for, if any.
    pub fn pending_title(&self) -> Option<String> {
        match self.conversation.state() {
            SendState::Sending { session_id, .. } => {
                return self.store.get(session_id).map(|e| return e.title.to_string());
            }
            SendState::Idle => return None,
        }
    }

    pub fn sidebar(&self) -> Vec<SidebarEntry> {
        return view::project_sidebar(&self.store, Some(&self.active));
    }

    /// Starts a send from the input box. Returns whether a request went out.
    pub async fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        let mut res = self.conversation.begin(&mut self.store, &self.active, text).await;
        if let Err(ChatError::SessionNotFound(_)) = res {
            self.active = self.store.resolve(Some(&self.active)).await;
            res = self.conversation.begin(&mut self.store, &self.active, text).await;
        }

        let request = match res {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(false),
            Err(ChatError::Busy) => {
                tracing::debug!("Ignoring input while a reply is pending");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        if tx.send(Action::EndpointRequest(request)).is_err() {
            self.handle_response(Err(EndpointError::Transport(
                "the request could not be dispatched".to_string(),
            )))
            .await;
            bail!("Background worker has stopped, cannot send messages");
        }

        self.sync_dependants();
        self.scroll.last();

        return Ok(true);
    }

    pub async fn handle_response(&mut self, response: Result<Value, EndpointError>) {
        match self.conversation.complete(&mut self.store, response).await {
            Ok(SendOutcome::Completed) => {
                tracing::debug!("Reply received");
            }
            Ok(SendOutcome::Failed(err)) => {
                tracing::error!(error = ?err, "Send failed");
            }
            Err(err) => {
                tracing::error!(error = ?err, "Dropping endpoint response");
            }
        }

        self.sync_dependants();
        self.scroll.last();
    }

    pub async fn new_session(&mut self) {
        self.active = self.store.create_session().await;
        self.sync_dependants();
        self.scroll.last();
    }

    pub async fn open_session(&mut self, id: &SessionId) {
        self.active = self.store.resolve(Some(id)).await;
        self.sync_dependants();
        self.scroll.last();
    }

    fn step(&mut self, forward: bool) -> Option<SessionId> {
        let entries = self.sidebar();
        if entries.is_empty() {
            return None;
        }

        let current = entries.iter().position(|e| return e.active).unwrap_or(0);
        let next = if forward {
            (current + 1) % entries.len()
        } else {
            (current + entries.len() - 1) % entries.len()
        };

        return Some(entries[next].id.clone());
    }

    pub async fn select_next(&mut self) {
        if let Some(id) = self.step(true) {
            self.open_session(&id).await;
        }
    }

    pub async fn select_previous(&mut self) {
        if let Some(id) = self.step(false) {
            self.open_session(&id).await;
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn sync_dependants(&mut self) {
        let pending = self.conversation.sending_to() == Some(&self.active);
        let instructions = match self.store.get(&self.active) {
            Some(session) => view::project(&session.messages, pending),
            None => vec![],
        };

        self.bubble_list
            .set_instructions(&instructions, self.last_known_width.into());

        self.scroll.set_state(
            u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX),
            self.last_known_height,
        );

        if pending {
            self.scroll.last();
        }
    }
}
