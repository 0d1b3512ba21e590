//! 📡 The BulkRequestBuilder — formatting a batch for the `_bulk` API's peculiar tastes.
//!
//! The bulk API has rules:
//!
//! Rule 1: Two lines per document. Action metadata, then document source. Always.
//! Rule 2: Newline-delimited. Not comma-separated. Not an array. NEWLINES.
//! Rule 3: The trailing newline on the whole body matters. It MATTERS.
//!
//! ```text
//! {"index":{"_index":"wiki"}}
//! {"title":"Rust","content":"..."}
//! {"index":{"_index":"wiki"}}
//! {"title":"Ferris","content":"..."}
//! ```
//!
//! The document line is passed through byte for byte. If it's broken JSON, the
//! backend will tell us in the item errors. We are couriers, not editors. 🦆

use serde_json::json;

use super::planner::Batch;

/// 🏗️ Render the action line for an index operation targeting `index`.
///
/// Goes through `serde_json` so an index name with a quote in it becomes escaped JSON
/// instead of a syntax error with extra steps.
fn action_line(index: &str) -> String {
    json!({ "index": { "_index": index } }).to_string()
}

/// 🎼 Render one batch as an NDJSON `_bulk` body: action line, document line, repeat,
/// every line `\n`-terminated (the last one included).
pub fn build_bulk_body(batch: &Batch<'_>) -> String {
    // -- the action line is identical for every doc in the batch, render it once
    let action = action_line(batch.index.as_str());

    // 🧮 Pre-allocate: every doc gets its own copy of the action line plus two newlines
    let estimated_size: usize = batch
        .documents
        .iter()
        .map(|doc| doc.len() + action.len() + 2)
        .sum();
    let mut payload = String::with_capacity(estimated_size);

    for doc in batch.documents {
        payload.push_str(&action);
        payload.push('\n');
        payload.push_str(doc.as_str());
        payload.push('\n');
    }

    payload
}
