#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use std::io;
use std::path;

use serde_json::Map;
use serde_json::Value;
use tokio::fs;

use crate::domain::models::Session;
use crate::domain::models::SessionId;
use crate::domain::models::SessionMap;
use crate::domain::models::StorageError;

/// What a history file held when it was read.
#[derive(Debug, Default, PartialEq)]
pub struct HistorySnapshot {
    pub sessions: SessionMap,
    /// Highest numeric session key in the file, skipped entries included.
    pub highest_id: Option<u64>,
}

/// The JSON file holding every session. It is always rewritten whole.
pub struct HistoryFile {
    path: path::PathBuf,
}

impl HistoryFile {
    pub fn new(path: path::PathBuf) -> HistoryFile {
        return HistoryFile { path };
    }

    pub fn default_path() -> path::PathBuf {
        return dirs::cache_dir()
            .unwrap_or_else(env_temp_dir)
            .join("hookchat/history.json");
    }

    pub fn path(&self) -> &path::Path {
        return &self.path;
    }

    /// Reads every session that can be decoded. A missing or unreadable file
    /// loads as empty, and undecodable entries are skipped one by one.
    pub async fn load(&self) -> HistorySnapshot {
        let mut snapshot = HistorySnapshot::default();

        let payload = match fs::read_to_string(&self.path).await {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return snapshot,
            Err(err) => {
                tracing::error!(path = ?self.path, error = ?err, "Failed to read chat history");
                return snapshot;
            }
        };

        if payload.trim().is_empty() {
            return snapshot;
        }

        let entries = match serde_json::from_str::<Map<String, Value>>(&payload) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::error!(path = ?self.path, error = ?err, "Failed to parse chat history, starting fresh");
                return snapshot;
            }
        };

        for (key, value) in entries {
            let id = SessionId::new(&key);
            snapshot.highest_id = snapshot.highest_id.max(id.numeric());

            match serde_json::from_value::<Session>(value) {
                Ok(session) => {
                    snapshot.sessions.insert(id, session);
                }
                Err(err) => {
                    tracing::warn!(id = key.as_str(), error = ?err, "Skipping undecodable session");
                }
            }
        }

        return snapshot;
    }

    pub async fn save(&self, sessions: &SessionMap) -> Result<(), StorageError> {
        let payload = serde_json::to_string(sessions)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| {
                        return StorageError::Io {
                            path: parent.to_path_buf(),
                            source,
                        };
                    })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, payload).await.map_err(|source| {
            return StorageError::Io {
                path: tmp_path.to_path_buf(),
                source,
            };
        })?;
        fs::rename(&tmp_path, &self.path).await.map_err(|source| {
            return StorageError::Io {
                path: self.path.to_path_buf(),
                source,
            };
        })?;

        return Ok(());
    }
}

fn env_temp_dir() -> path::PathBuf {
    return std::env::temp_dir();
}
