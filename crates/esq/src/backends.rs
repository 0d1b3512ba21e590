//! 🔌 Backends — where the real I/O happens.
//!
//! 🚰 The pipeline builds NDJSON, a [`BulkTransport`] ships it, and what comes back
//! is handed over raw for the interpreter to read tea leaves from.
//!
//! 🎭 Two transports live here:
//! - [`elasticsearch::ElasticsearchClient`] — the real one, HTTP over reqwest.
//! - `in_mem::InMemoryTransport` — a scripted stand-in for tests. No network, no heartbeat.
//!
//! 🦆 The duck is here because every file must have one. This is law.

use async_trait::async_trait;

use crate::common::IndexName;
use crate::error::IngestError;

pub mod elasticsearch;
#[cfg(test)]
pub(crate) mod in_mem;

pub use elasticsearch::ElasticsearchClient;

/// 📬 What the backend said about one bulk request, before anyone interprets it.
///
/// Status and body, nothing else. The interpreter decides whether this is good news.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkResponse {
    pub status: u16,
    pub body: String,
}

impl BulkResponse {
    /// 🧱 Anything above 2xx counts as an HTTP-level error.
    pub fn is_error(&self) -> bool {
        self.status > 299
    }
}

/// 📡 Ships one rendered `_bulk` body and returns the backend's raw answer.
///
/// # Contract 📜
/// - One call, one network round trip. No retries, no buffering, no opinions.
/// - `Err` is reserved for transport failures: unreachable backend, broken connection,
///   unreadable response. An HTTP 500 is *not* an `Err` here. It's a response.
#[async_trait]
pub trait BulkTransport: std::fmt::Debug {
    async fn send_bulk(&mut self, index: &IndexName, body: String)
    -> Result<BulkResponse, IngestError>;
}
