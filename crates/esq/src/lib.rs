//! 🔎 esq — a small client for Elasticsearch-compatible clusters.
//!
//! Index lifecycle, single documents and searches are one HTTP call each.
//! Bulk ingestion is the part with moving pieces; see [`bulk`].

pub mod app_config;
pub mod backends;
pub mod bulk;
pub mod common;
pub mod documents;
pub mod error;
pub mod fields;
pub mod progress;
pub mod report;

pub use app_config::{AppConfig, load_config};
pub use backends::ElasticsearchClient;
pub use bulk::{BatchFailure, IngestionReport, bulk_index};
pub use common::{Document, IndexName};
pub use error::{FailureKind, IngestError};
