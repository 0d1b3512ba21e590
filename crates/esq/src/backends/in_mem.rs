//! # Previously, on esq...
//!
//! 🎬 The cluster was down. Or it was up but nobody wanted to spin one up for a
//! unit test. Someone had to stand in. Someone had to pretend to be Elasticsearch,
//! convincingly enough to fool a pipeline, cheaply enough to run ten thousand times.
//!
//! That someone was this module.
//!
//! [`InMemoryTransport`] records every body it is handed and answers from a script.
//! Run out of script and it keeps saying "all good". Build it `unreachable()` and it
//! fails every call like a router that has given up on life.
//!
//! ⚠️ Tests only. If you're deploying this to prod, please also deploy a therapist. 🦆

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::json;

use crate::backends::{BulkResponse, BulkTransport};
use crate::common::IndexName;
use crate::error::IngestError;

/// 📦 A transport that never forgets what it was sent.
#[derive(Debug, Default)]
pub(crate) struct InMemoryTransport {
    /// 📜 answers to hand out, first in first out
    script: VecDeque<BulkResponse>,
    /// 🔒 every body we were asked to send, in order
    sent: Vec<String>,
    /// 💀 when set, every call is a transport failure
    unreachable: bool,
    attempts: usize,
}

impl InMemoryTransport {
    /// ✅ Says yes to everything. The golden retriever of transports.
    pub(crate) fn accepting_everything() -> Self {
        Self::default()
    }

    /// 📜 Answers from the script, then falls back to yes.
    pub(crate) fn scripted(responses: Vec<BulkResponse>) -> Self {
        Self {
            script: responses.into(),
            ..Self::default()
        }
    }

    /// 💀 Every call fails before reaching anything.
    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub(crate) fn ok_response() -> BulkResponse {
        BulkResponse {
            status: 200,
            body: json!({ "took": 1, "errors": false, "items": [] }).to_string(),
        }
    }

    /// 📄 A 200 OK that is also a list of rejections. One item per error payload.
    pub(crate) fn item_errors_response(errors: &[&str]) -> BulkResponse {
        let items: Vec<serde_json::Value> = errors
            .iter()
            .map(|raw| {
                let error: serde_json::Value =
                    serde_json::from_str(raw).unwrap_or_else(|_| json!({ "reason": raw }));
                json!({ "index": { "status": 400, "error": error } })
            })
            .collect();
        BulkResponse {
            status: 200,
            body: json!({ "took": 1, "errors": true, "items": items }).to_string(),
        }
    }

    pub(crate) fn sent_bodies(&self) -> &[String] {
        &self.sent
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts
    }
}

#[async_trait]
impl BulkTransport for InMemoryTransport {
    async fn send_bulk(
        &mut self,
        _index: &IndexName,
        body: String,
    ) -> Result<BulkResponse, IngestError> {
        self.attempts += 1;
        if self.unreachable {
            return Err(IngestError::Transport(
                "error sending request: tcp connect error: Connection refused".to_string(),
            ));
        }
        self.sent.push(body);
        Ok(self.script.pop_front().unwrap_or_else(Self::ok_response))
    }
}
