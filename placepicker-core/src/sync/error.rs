//! Error types for the remote store and the sync engine.

use std::fmt;

use thiserror::Error;

/// Message used when a failed write carries no explanation of its own.
pub const DEFAULT_SYNC_MESSAGE: &str = "Failed to update places.";

/// Message used when a failed fetch carries no explanation of its own.
pub const DEFAULT_FETCH_MESSAGE: &str = "Could not fetch places, please try again later.";

/// Machine-readable classification of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a response (connect, timeout, TLS...).
    Network,
    /// The store answered with a non-success status.
    Rejected { status: u16 },
    /// The store answered, but the body was not what we expected.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network failure"),
            ErrorKind::Rejected { status } => write!(f, "rejected with status {}", status),
            ErrorKind::Decode => write!(f, "malformed response"),
        }
    }
}

/// A failed exchange with the remote store.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}{}", .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
pub struct RemoteError {
    pub kind: ErrorKind,
    /// Human-readable text from the store or the transport, when there is any.
    pub detail: Option<String>,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, detail: Option<String>) -> Self {
        Self { kind, detail }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, Some(detail.into()))
    }

    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        Self::new(ErrorKind::Rejected { status }, detail)
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, Some(detail.into()))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::decode(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteError::rejected(status.as_u16(), None)
        } else {
            RemoteError::network(e.to_string())
        }
    }
}

/// A read of the catalog or the user's list failed. Terminal for that load.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to fetch {resource}: {source}")]
pub struct FetchError {
    /// Which collection was being read (`places` or `user-places`).
    pub resource: &'static str,
    #[source]
    pub source: RemoteError,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind
    }

    /// Text suitable for an error view.
    pub fn user_message(&self) -> &str {
        match self.source.kind {
            ErrorKind::Rejected { .. } => self
                .source
                .detail
                .as_deref()
                .unwrap_or(DEFAULT_FETCH_MESSAGE),
            _ => DEFAULT_FETCH_MESSAGE,
        }
    }
}

/// A write of the user's list failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct SyncError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        let message = e
            .detail
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYNC_MESSAGE.to_string());
        SyncError {
            kind: e.kind,
            message,
        }
    }
}

/// Rejections raised by the engine before any I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Place has no id and cannot be selected")]
    InvalidPlace,
}
