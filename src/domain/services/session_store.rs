#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use std::path;

use chrono::Utc;

use super::HistoryFile;
use super::HistorySnapshot;
use crate::domain::models::derive_title;
use crate::domain::models::ChatError;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::SessionId;
use crate::domain::models::SessionMap;
use crate::domain::models::StorageError;

/// In-memory authority over every chat session. Each mutation writes the whole
/// map back through the history file; a failed write is logged and the
/// in-memory state is kept.
pub struct SessionStore {
    history: HistoryFile,
    sessions: SessionMap,
    next_id: u64,
    greeting: String,
}

impl SessionStore {
    pub async fn open(history: HistoryFile, greeting: &str) -> SessionStore {
        let snapshot = history.load().await;
        return SessionStore::from_snapshot(history, snapshot, greeting);
    }

    /// Builds the store from what was read off disk. New ids continue above
    /// every key the file held, including entries that are skipped here.
    pub fn from_snapshot(history: HistoryFile, snapshot: HistorySnapshot, greeting: &str) -> SessionStore {
        let mut sessions = SessionMap::new();
        for (key, mut session) in snapshot.sessions {
            if let Err(reason) = session.validate(&key) {
                tracing::warn!(id = key.as_str(), reason = reason.as_str(), "Skipping invalid session");
                continue;
            }
            session.repair();
            sessions.insert(key, session);
        }

        let next_id = sessions
            .keys()
            .filter_map(|e| return e.numeric())
            .chain(snapshot.highest_id)
            .max()
            .map(|e| return e + 1)
            .unwrap_or(1);

        tracing::debug!(
            sessions = sessions.len(),
            next_id,
            path = ?history.path(),
            "Opened session store"
        );

        return SessionStore {
            history,
            sessions,
            next_id,
            greeting: greeting.to_string(),
        };
    }

    pub fn now() -> i64 {
        return Utc::now().timestamp_millis();
    }

    pub fn history_path(&self) -> &path::Path {
        return self.history.path();
    }

    pub fn len(&self) -> usize {
        return self.sessions.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.sessions.is_empty();
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        return self.sessions.get(id);
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        return self.sessions.contains_key(id);
    }

    pub async fn create_session(&mut self) -> SessionId {
        let id = SessionId::from(self.next_id);
        self.next_id += 1;

        let now = SessionStore::now();
        let mut session = Session::new(id.clone(), now);
        if !self.greeting.is_empty() {
            session
                .messages
                .push(Message::bot(&self.greeting).with_timestamp(now + 1));
            session.last_updated = now + 1;
        }

        tracing::debug!(id = id.as_str(), "Created session");
        self.sessions.insert(id.clone(), session);
        self.persist().await;

        return id;
    }

    pub fn select_most_recent(&self) -> Option<SessionId> {
        return self
            .sessions
            .values()
            .max_by(|a, b| return a.recency_cmp(b))
            .map(|e| return e.id.clone());
    }

    pub fn list_by_recency(&self) -> Vec<&Session> {
        let mut sessions = self.sessions.values().collect::<Vec<&Session>>();
        sessions.sort_by(|a, b| return b.recency_cmp(a));
        return sessions;
    }

    /// Appends to the end of a session. Timestamps never go backwards within a
    /// session, whatever order replies arrive in.
    pub async fn append_message(
        &mut self,
        id: &SessionId,
        mut message: Message,
    ) -> Result<(), ChatError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| return ChatError::SessionNotFound(id.clone()))?;

        if message.timestamp <= 0 {
            message.timestamp = SessionStore::now();
        }
        if let Some(last) = session.last_timestamp() {
            message.timestamp = message.timestamp.max(last);
        }

        session.last_updated = session.last_updated.max(message.timestamp);
        session.messages.push(message);
        self.persist().await;

        return Ok(());
    }

    /// Replaces the default title with one built from `candidate`, but only
    /// while the session holds no more than its first exchange.
    pub async fn derive_title_if_eligible(&mut self, id: &SessionId, candidate: &str) -> bool {
        let session = match self.sessions.get_mut(id) {
            Some(session) => session,
            None => return false,
        };

        if session.exchange_len() > 2 || !session.has_default_title() {
            return false;
        }

        let title = derive_title(id, candidate);
        if title == session.title {
            return false;
        }

        session.title = title;
        self.persist().await;

        return true;
    }

    /// The requested session when it exists, else the most recent one, else a
    /// freshly created one.
    pub async fn resolve(&mut self, requested: Option<&SessionId>) -> SessionId {
        if let Some(id) = requested {
            if self.contains(id) {
                return id.clone();
            }
            tracing::warn!(id = id.as_str(), "Requested session not found, falling back");
        }

        if let Some(id) = self.select_most_recent() {
            return id;
        }

        return self.create_session().await;
    }

    pub async fn delete_session(&mut self, id: &SessionId) -> bool {
        if self.sessions.remove(id).is_none() {
            return false;
        }

        tracing::debug!(id = id.as_str(), "Deleted session");
        self.persist().await;

        return true;
    }

    pub async fn delete_all(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        self.persist().await;

        return count;
    }

    pub async fn flush(&self) -> Result<(), StorageError> {
        return self.history.save(&self.sessions).await;
    }

    async fn persist(&self) {
        if let Err(err) = self.flush().await {
            tracing::error!(error = ?err, "Failed to save chat history");
        }
    }
}
