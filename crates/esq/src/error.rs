//! 💀 Errors — the five stages of bulk ingestion grief.
//!
//! Validation (denial), Transport (anger), Http (bargaining), ItemErrors (depression),
//! Parse (acceptance that the cluster speaks a dialect we never learned).
//!
//! Everything outside the pipeline rides on `anyhow`. The pipeline gets a real enum,
//! because callers need to tell "the network is down" apart from "document 37 has a
//! date field that says 'yesterday-ish'". 🦆

use thiserror::Error;

/// 🏷️ Which flavor of failure a batch ran into. The label on the jar, not the jam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Transport,
    Http,
    ItemErrors,
    Parse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Transport => "transport",
            FailureKind::Http => "http",
            FailureKind::ItemErrors => "item-errors",
            FailureKind::Parse => "parse",
        }
    }
}

/// 💀 Everything that can go wrong between "here are some documents" and "they are indexed".
///
/// None of these are retried. None are swallowed. They bubble up to whoever asked,
/// with enough detail to write a post-mortem that doesn't start with "unclear".
#[derive(Debug, Error)]
pub enum IngestError {
    /// 🚫 Blank index name. Caught before a single packet leaves the building.
    #[error("invalid index name {0:?}: must not be empty or whitespace-only")]
    Validation(String),

    /// 📡 Could not build the client or could not reach the backend.
    #[error("transport failure: {0}")]
    Transport(String),

    /// 🧱 The backend answered, with a status code that was not a 2xx.
    #[error("bulk request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 📄 The request was accepted but some documents were not. One message per document.
    #[error("bulk item errors:\n{}", .0.join("\n"))]
    ItemErrors(Vec<String>),

    /// 🧩 The response body was not the shape a bulk response is supposed to have.
    #[error("failed to parse bulk response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl IngestError {
    pub fn kind(&self) -> FailureKind {
        match self {
            IngestError::Validation(_) => FailureKind::Validation,
            IngestError::Transport(_) => FailureKind::Transport,
            IngestError::Http { .. } => FailureKind::Http,
            IngestError::ItemErrors(_) => FailureKind::ItemErrors,
            IngestError::Parse(_) => FailureKind::Parse,
        }
    }

    /// 🔧 Flattens a reqwest error and its whole cause chain into one transport message.
    /// reqwest's top-level Display is "error sending request" and the juicy part
    /// ("connection refused") hides three `source()` calls deep.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        IngestError::Transport(message)
    }
}
