use std::io;
use std::path;

use thiserror::Error;

use super::SessionId;

/// Failures talking to the remote endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The endpoint answered, but with nothing a reply can be built from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseShapeError {
    #[error("response does not match any known shape")]
    Unrecognized,
    #[error("response has neither content nor config")]
    Empty,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write chat history to {path}: {source}")]
    Io {
        path: path::PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode chat history: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no session found for id {0}")]
    SessionNotFound(SessionId),
    #[error("a message is already being sent")]
    Busy,
    #[error("no message is being sent")]
    NotSending,
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error(transparent)]
    ResponseShape(#[from] ResponseShapeError),
}
