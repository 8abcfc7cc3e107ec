#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;
use super::Sender;

pub const TITLE_MAX_CHARS: usize = 35;

/// Opaque session token. Ids handed out by the store are decimal counters;
/// numeric ids order numerically and sort after any non-numeric ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: &str) -> SessionId {
        return SessionId(id.to_string());
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    pub fn numeric(&self) -> Option<u64> {
        return self.0.parse::<u64>().ok();
    }
}

impl From<u64> for SessionId {
    fn from(id: u64) -> SessionId {
        return SessionId(id.to_string());
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

impl Ord for SessionId {
    fn cmp(&self, other: &SessionId) -> Ordering {
        return self
            .numeric()
            .cmp(&other.numeric())
            .then_with(|| return self.0.cmp(&other.0));
    }
}

impl PartialOrd for SessionId {
    fn partial_cmp(&self, other: &SessionId) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

pub type SessionMap = BTreeMap<SessionId, Session>;

pub fn default_title(id: &SessionId) -> String {
    return format!("Chat {id}");
}

/// Builds a sidebar title from the first thing the user said.
pub fn derive_title(id: &SessionId, candidate: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return default_title(id);
    }

    let mut title = trimmed.chars().take(TITLE_MAX_CHARS).collect::<String>();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        title += "...";
    }

    return title;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_updated: i64,
}

impl Session {
    pub fn new(id: SessionId, now: i64) -> Session {
        return Session {
            title: default_title(&id),
            id,
            messages: vec![],
            created_at: now,
            last_updated: now,
        };
    }

    pub fn has_default_title(&self) -> bool {
        return self.title == default_title(&self.id);
    }

    /// Number of messages from the first user message onward. A greeting
    /// seeded before the user speaks is not part of the exchange.
    pub fn exchange_len(&self) -> usize {
        return self
            .messages
            .iter()
            .position(|e| return e.sender == Sender::User)
            .map(|idx| return self.messages.len() - idx)
            .unwrap_or(0);
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        return self.messages.last().map(|e| return e.timestamp);
    }

    /// Key used for every "most recent first" ordering.
    pub fn recency_cmp(&self, other: &Session) -> Ordering {
        return self
            .last_updated
            .cmp(&other.last_updated)
            .then_with(|| return self.created_at.cmp(&other.created_at))
            .then_with(|| return self.id.cmp(&other.id));
    }

    /// Checks a session read back from disk under `key`.
    pub fn validate(&self, key: &SessionId) -> Result<(), String> {
        if &self.id != key {
            return Err(format!("id {} does not match its key {key}", self.id));
        }

        if let Some(idx) = self.messages.iter().position(|e| return !e.is_valid()) {
            return Err(format!("message {idx} is missing its content or chart config"));
        }

        return Ok(());
    }

    /// Restores ordering invariants on a session read back from disk.
    pub fn repair(&mut self) {
        for message in self.messages.iter_mut() {
            if message.timestamp <= 0 {
                message.timestamp = self.created_at;
            }
        }
        self.messages.sort_by_key(|e| return e.timestamp);

        let newest = self.last_timestamp().unwrap_or(self.created_at);
        self.last_updated = self.last_updated.max(self.created_at).max(newest);
    }
}
