//! 🏷️ `--fields title=Rust,body=Ferris` → JSON. Two flavors:
//!
//! - strict ([`parse_fields`], [`fields_to_document`]): a pair without `=` is an error,
//!   because we're about to index this as a document and "body" with no value is a typo.
//! - lenient ([`fields_to_query`]): pairs without `=` are skipped, keys and values trimmed,
//!   and the survivors become a `match` query.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::common::Document;

/// 🔧 Parse `k=v,k2=v2` into a map. Each item is trimmed and split on the first `=`.
pub fn parse_fields(raw: &str) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();
    for item in raw.split(',') {
        let item = item.trim();
        let Some((key, value)) = item.split_once('=') else {
            anyhow::bail!("💀 invalid field '{item}': expected key=value");
        };
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

/// 📄 Build a single document (compact JSON object) from `--fields`.
pub fn fields_to_document(raw: &str) -> Result<Document> {
    let fields = parse_fields(raw)?;
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Ok(Document::new(Value::Object(object).to_string()))
}

/// 🔎 Build `{"query":{"match":{...}}}` from `--fields`. `None` when there's nothing to build.
pub fn fields_to_query(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let matches: Map<String, Value> = raw
        .split(',')
        .filter_map(|item| item.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                Value::String(value.trim().to_string()),
            )
        })
        .collect();
    Some(json!({ "query": { "match": matches } }).to_string())
}
