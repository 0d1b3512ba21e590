//! 🚚 Bulk ingestion — getting a pile of documents into an index, 500 at a time.
//!
//! 🧠 Knowledge graph:
//! - [`planner`]: documents → batches (`plan_batches`)
//! - [`builder`]: batch → NDJSON `_bulk` body (`build_bulk_body`)
//! - [`crate::backends::BulkTransport`]: body → raw response
//! - [`interpreter`]: raw response → `BatchOutcome`
//! - [`pipeline`]: the loop that strings them together and stops at the first failure
//!
//! [`bulk_index`] is the front door: validate, short-circuit on nothing-to-do,
//! build a fresh client, run the pipeline.

pub mod builder;
pub mod interpreter;
pub mod pipeline;
pub mod planner;

pub use interpreter::BatchOutcome;
pub use pipeline::{BatchFailure, IngestionReport, run_pipeline};
pub use planner::{Batch, plan_batches};

use tracing::info;

use crate::app_config::AppConfig;
use crate::backends::ElasticsearchClient;
use crate::common::{Document, IndexName};
use crate::error::IngestError;
use crate::progress::BatchProgress;

/// 🚀 Bulk-index `documents` into `index` using the cluster and batch size in `config`.
///
/// Order of business:
/// 1. 🔒 validate the index name (no network yet, and none at all if this fails)
/// 2. 💤 zero documents → report success without building a client or sending anything
/// 3. 🏗️ build a fresh [`ElasticsearchClient`] — a bad URL is a `Transport` error here
/// 4. 🚂 run the pipeline; batch failures land in the returned report
pub async fn bulk_index(
    config: &AppConfig,
    index: &str,
    documents: &[Document],
    show_progress: bool,
) -> Result<IngestionReport, IngestError> {
    let index = IndexName::new(index)?;
    let max_batch_size = config.bulk.max_batch_size_docs;

    if documents.is_empty() {
        info!("💤 No documents to ingest into '{}'. That was easy.", index);
        return Ok(IngestionReport {
            index,
            documents_total: 0,
            documents_indexed: 0,
            batches_planned: 0,
            batches_attempted: 0,
            batches_completed: 0,
            failure: None,
        });
    }

    let mut client = ElasticsearchClient::new(&config.elasticsearch)?;

    let total_batches = documents.len().div_ceil(max_batch_size.get()) as u64;
    let mut progress = if show_progress {
        BatchProgress::visible(index.as_str(), total_batches)
    } else {
        BatchProgress::hidden(index.as_str(), total_batches)
    };

    let report = run_pipeline(&mut client, &index, documents, max_batch_size, &mut progress).await;

    info!(
        "📋 Bulk ingest into '{}' finished: {}/{} batch(es) completed, {} document(s) indexed",
        report.index, report.batches_completed, report.batches_planned, report.documents_indexed
    );
    Ok(report)
}
