//! 🔮 The ResponseInterpreter — reading the tea leaves of a `_bulk` response.
//!
//! A bulk response can be a 200 OK that is also, simultaneously, a list of
//! documents the cluster refused. Schrödinger's success. This module opens the box.
//!
//! ```text
//! status > 299                      → Failure(Http { body })      (body not parsed)
//! body is not the expected shape    → Failure(Parse)
//! "errors": false / missing         → Success                     (items ignored)
//! "errors": true + item errors      → Failure(ItemErrors([...]))  (item order kept)
//! "errors": true + no item errors   → Success + a warning         (flag and content disagree)
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::backends::BulkResponse;
use crate::error::IngestError;

/// 🎯 How one batch went.
#[derive(Debug)]
pub enum BatchOutcome {
    Success,
    Failure(IngestError),
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Success)
    }
}

/// 📄 First look at a bulk response: the flag, and the items left untyped.
/// `took`, `_shards` and friends are left on the floor by serde.
///
/// Items stay a raw [`Value`] here so an `"errors": false` response is a Success
/// no matter what shape its items come in. They only get typed once they matter.
#[derive(Debug, Deserialize)]
struct BulkResponseBody {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Option<Value>,
}

/// 📦 One item: `{"index": {...}}`, `{"create": {...}}`, ... keyed by operation type.
/// In practice exactly one key. BTreeMap so that, if there ever are two, the order holds still.
type BulkItem = BTreeMap<String, BulkItemResult>;

#[derive(Debug, Deserialize)]
struct BulkItemResult {
    #[serde(default)]
    error: Option<Value>,
}

/// 🔮 Turn one raw bulk response into a [`BatchOutcome`].
pub fn interpret(response: &BulkResponse) -> BatchOutcome {
    if response.is_error() {
        return BatchOutcome::Failure(IngestError::Http {
            status: response.status,
            body: response.body.clone(),
        });
    }

    let parsed: BulkResponseBody = match serde_json::from_str(&response.body) {
        Ok(parsed) => parsed,
        Err(err) => return BatchOutcome::Failure(IngestError::Parse(err)),
    };

    if !parsed.errors {
        return BatchOutcome::Success;
    }

    // -- the flag is up, now the items have to make sense
    let items: Vec<BulkItem> = match parsed.items {
        Some(items) => match serde_json::from_value(items) {
            Ok(items) => items,
            Err(err) => return BatchOutcome::Failure(IngestError::Parse(err)),
        },
        None => Vec::new(),
    };

    let messages: Vec<String> = items
        .iter()
        .flat_map(|item| item.values())
        .filter_map(|result| result.error.as_ref())
        .map(Value::to_string)
        .collect();

    if messages.is_empty() {
        // -- ⚠️ the flag says errors, the items say nothing. We believe the items,
        // -- but we say so out loud in case the items are the ones lying.
        warn!(
            "⚠️ Bulk response has \"errors\": true but none of its {} items carries an error. Treating the batch as successful.",
            items.len()
        );
        return BatchOutcome::Success;
    }

    BatchOutcome::Failure(IngestError::ItemErrors(messages))
}
