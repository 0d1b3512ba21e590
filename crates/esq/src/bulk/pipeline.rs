//! 🚂 The ingestion pipeline — plan, build, ship, interpret, repeat. Then stop.
//!
//! ```text
//! documents ──► plan_batches ──► build_bulk_body ──► BulkTransport ──► interpret
//!                   │                                                     │
//!                   └──────────── next batch, only if this one ◄──────────┘
//!                                 came back Success
//! ```
//!
//! Strictly one batch in flight. The first batch that isn't a clean Success ends
//! the run: later batches are never built, never sent, never even thought about.
//! The report tells you which batch broke and how many made it before it did.
//!
//! Want "ingest everything and tell me all the failures"? That's a different
//! contract, and it would get its own function rather than a flag on this one.

use std::num::NonZeroUsize;

use thiserror::Error;
use tracing::{debug, info, trace};

use super::builder::build_bulk_body;
use super::interpreter::{BatchOutcome, interpret};
use super::planner::plan_batches;
use crate::backends::BulkTransport;
use crate::common::{Document, IndexName};
use crate::error::IngestError;
use crate::progress::BatchProgress;

/// 💀 The batch that ended the run, and why.
#[derive(Debug, Error)]
#[error("batch {batch} failed: {error}")]
pub struct BatchFailure {
    /// 🔢 Zero-based position of the failing batch.
    pub batch: usize,
    #[source]
    pub error: IngestError,
}

/// 📋 What happened during one bulk ingest.
#[derive(Debug)]
pub struct IngestionReport {
    pub index: IndexName,
    pub documents_total: usize,
    /// 📄 documents in batches that came back Success
    pub documents_indexed: usize,
    pub batches_planned: usize,
    pub batches_attempted: usize,
    pub batches_completed: usize,
    /// 💀 `None` means every planned batch went through.
    pub failure: Option<BatchFailure>,
}

impl IngestionReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// 🎁 Unwrap the report into a `Result`, for callers who only care about pass/fail.
    pub fn into_result(self) -> Result<IngestionReport, BatchFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self),
        }
    }
}

/// 🚂 Runs the bulk pipeline for already-validated inputs over any [`BulkTransport`].
///
/// Never returns early with an `Err`: every failure after validation ends up in
/// [`IngestionReport::failure`] next to the batch counts.
pub async fn run_pipeline<T: BulkTransport + ?Sized>(
    transport: &mut T,
    index: &IndexName,
    documents: &[Document],
    max_batch_size: NonZeroUsize,
    progress: &mut BatchProgress,
) -> IngestionReport {
    let batches = plan_batches(index, documents, max_batch_size);
    let batches_planned = batches.len();
    let mut report = IngestionReport {
        index: index.clone(),
        documents_total: documents.len(),
        documents_indexed: 0,
        batches_planned,
        batches_attempted: 0,
        batches_completed: 0,
        failure: None,
    };

    info!(
        "🚀 Ingesting {} documents into '{}' as {} batch(es) of up to {}",
        documents.len(),
        index,
        batches_planned,
        max_batch_size
    );

    for batch in batches {
        let body = build_bulk_body(&batch);
        let body_len = body.len();
        trace!(
            "📦 Batch {}/{} rendered: {} docs, {} bytes",
            batch.ordinal + 1,
            batches_planned,
            batch.len(),
            body_len
        );

        report.batches_attempted += 1;
        let outcome = match transport.send_bulk(index, body).await {
            Ok(response) => interpret(&response),
            Err(err) => BatchOutcome::Failure(err),
        };

        match outcome {
            BatchOutcome::Success => {
                debug!(
                    "✅ Batch {}/{} accepted ({} docs)",
                    batch.ordinal + 1,
                    batches_planned,
                    batch.len()
                );
                report.batches_completed += 1;
                report.documents_indexed += batch.len();
                progress.batch_completed(batch.len() as u64, body_len as u64);
            }
            BatchOutcome::Failure(error) => {
                debug!(
                    "💀 Batch {}/{} failed ({}); {} later batch(es) will not be sent",
                    batch.ordinal + 1,
                    batches_planned,
                    error.kind().as_str(),
                    batches_planned - batch.ordinal - 1
                );
                report.failure = Some(BatchFailure {
                    batch: batch.ordinal,
                    error,
                });
                break;
            }
        }
    }

    if report.is_success() {
        progress.finish();
    } else {
        progress.abandon();
    }
    report
}
