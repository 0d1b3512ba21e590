//! 🍽️ Tables for humans. `_cat/indices` and ingestion reports, served on comfy-table.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use serde_json::Value;

use crate::bulk::IngestionReport;
use crate::progress::format_number;

// -- the columns worth a glance, in the order a human scans them
const INDEX_COLUMNS: [&str; 7] = [
    "health",
    "status",
    "index",
    "docs.count",
    "docs.deleted",
    "store.size",
    "pri",
];

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// 📋 Render a `_cat/indices?format=json` body as a table, sorted by index name.
///
/// Anything that isn't a JSON array of objects comes back untouched, because showing
/// the raw body beats showing nothing.
pub fn render_indices(raw: &str) -> String {
    let Ok(Value::Array(rows)) = serde_json::from_str::<Value>(raw) else {
        return raw.to_string();
    };

    let mut rows: Vec<&serde_json::Map<String, Value>> =
        rows.iter().filter_map(Value::as_object).collect();
    rows.sort_by(|a, b| {
        let name = |row: &serde_json::Map<String, Value>| {
            row.get("index").and_then(Value::as_str).unwrap_or_default().to_string()
        };
        name(a).cmp(&name(b))
    });

    let mut table = new_table(INDEX_COLUMNS.to_vec());
    for row in rows {
        table.add_row(INDEX_COLUMNS.iter().map(|column| {
            let text = match row.get(*column) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            Cell::new(text)
        }));
    }
    table.to_string()
}

/// 📊 Summarize a bulk ingestion run.
pub fn render_ingestion(report: &IngestionReport) -> String {
    let outcome = match &report.failure {
        None => "✅ success".to_string(),
        Some(failure) => format!(
            "💀 batch {} failed ({})",
            failure.batch,
            failure.error.kind().as_str()
        ),
    };

    let mut table = new_table(vec!["bulk ingest", ""]);
    let rows = [
        ("index", report.index.to_string()),
        ("documents", format_number(report.documents_total as u64)),
        ("documents indexed", format_number(report.documents_indexed as u64)),
        ("batches planned", report.batches_planned.to_string()),
        ("batches attempted", report.batches_attempted.to_string()),
        ("batches completed", report.batches_completed.to_string()),
        ("outcome", outcome),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}
