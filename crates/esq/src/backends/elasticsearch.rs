//! # 📡 THE ELASTICSEARCH BACKEND
//!
//! 🎬 COLD OPEN — INT. SERVER ROOM — 3:47 AM
//!
//! The monitoring dashboard glows amber in the dark. Somebody just ran
//! `esq index bulk wiki dump.ndjson` against a cluster that was, in fairness,
//! warned. The cluster responds with a 200 OK and four hundred item errors.
//! Both of these things are true at the same time. Welcome to `_bulk`.
//!
//! 🚀 This module is the only place in the crate that speaks HTTP.
//! [`ElasticsearchClient`] is built fresh from an [`ElasticsearchConfig`] per command
//! (no connection is kept around between unrelated invocations), and offers:
//!
//! - the [`BulkTransport`] the ingestion pipeline ships batches through
//! - pass-through calls for everything else: create/delete/list indices,
//!   index a single document, run a search
//!
//! Pass-through calls are `anyhow` all the way: they either worked, or here is
//! the status code and body explaining why not.
//!
//! 🦆 (mandatory duck, no context provided, none shall be requested)

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use tracing::{debug, trace};

use crate::app_config::ElasticsearchConfig;
use crate::backends::{BulkResponse, BulkTransport};
use crate::common::{Document, IndexName};
use crate::error::IngestError;

/// 📡 An HTTP client pointed at one cluster, with auth baked in.
///
/// Cheap to build, cheap to drop. Construction fails (with
/// [`IngestError::Transport`]) if the URL is malformed or the HTTP client can't be
/// born, and never panics about it.
#[derive(Debug)]
pub struct ElasticsearchClient {
    client: reqwest::Client,
    config: ElasticsearchConfig,
}

impl ElasticsearchClient {
    /// 🏗️ The client factory. Validates the base URL and builds the reqwest client.
    ///
    /// The timeout is only set when configured. No config, no deadline, and we wait
    /// as long as the TCP stack is willing to.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, IngestError> {
        let url = Url::parse(&config.url).map_err(|err| {
            IngestError::Transport(format!(
                "invalid backend address '{}': {}",
                config.url, err
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(IngestError::Transport(format!(
                "invalid backend address '{}': scheme must be http or https, not '{}'",
                config.url,
                url.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(IngestError::transport)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// 🔧 Build a request against `path` with auth applied.
    /// API key beats basic auth. This is not a democracy.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url(), path.trim_start_matches('/'));
        let request = self.client.request(method, url);
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("ApiKey {}", api_key))
        } else if let Some(ref username) = self.config.username {
            request.basic_auth(username, self.config.password.as_ref())
        } else {
            request
        }
    }

    /// 📬 Send a pass-through request; anything but a 2xx is an error carrying the body.
    async fn send_checked(&self, request: RequestBuilder, what: &str) -> Result<String> {
        let response = request
            .send()
            .await
            .with_context(|| format!("💀 {what}: the request never made it to Elasticsearch"))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("💀 {what}: the response body got lost on the way back"))?;
        if !status.is_success() {
            anyhow::bail!("💀 {what}: Elasticsearch answered {status}: {body}");
        }
        Ok(body)
    }

    /// 🏗️ `PUT /<index>` with optional settings/mappings JSON as the body.
    pub async fn create_index(&self, index: &IndexName, mappings: Option<&str>) -> Result<String> {
        let mut request = self.request(Method::PUT, index.as_str());
        if let Some(mappings) = mappings.filter(|m| !m.trim().is_empty()) {
            request = request
                .header("Content-Type", "application/json")
                .body(mappings.to_string());
        }
        self.send_checked(request, &format!("creating index '{index}'"))
            .await
    }

    /// 🗑️ `DELETE /<index>`.
    pub async fn delete_index(&self, index: &IndexName) -> Result<String> {
        let request = self.request(Method::DELETE, index.as_str());
        self.send_checked(request, &format!("deleting index '{index}'"))
            .await
    }

    /// 📋 `GET /_cat/indices?format=json` — the raw JSON array, rendering is someone else's job.
    pub async fn list_indices(&self) -> Result<String> {
        let request = self.request(Method::GET, "_cat/indices?format=json&pretty");
        self.send_checked(request, "listing indices").await
    }

    /// 📄 `POST /<index>/_doc` — one document, no batching, no ceremony.
    pub async fn index_document(&self, index: &IndexName, document: &Document) -> Result<String> {
        let request = self
            .request(Method::POST, &format!("{}/_doc", index.as_str()))
            .header("Content-Type", "application/json")
            .body(document.as_str().to_string());
        self.send_checked(request, &format!("indexing a document into '{index}'"))
            .await
    }

    /// 🔎 `POST /<index>/_search` with the query DSL as the body. Returns the raw response.
    pub async fn search(&self, index: &IndexName, query: &str) -> Result<String> {
        let mut request = self.request(Method::POST, &format!("{}/_search", index.as_str()));
        if !query.trim().is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(query.to_string());
        }
        self.send_checked(request, &format!("searching '{index}'"))
            .await
    }
}

#[async_trait]
impl BulkTransport for ElasticsearchClient {
    /// 📡 `POST /_bulk` with the NDJSON body. Status and body come back raw; only a
    /// failure to talk to the cluster at all is an `Err`.
    ///
    /// 🔄 This function does not retry. Retries are the caller's problem. Good luck.
    async fn send_bulk(
        &mut self,
        index: &IndexName,
        body: String,
    ) -> Result<BulkResponse, IngestError> {
        debug!(
            "📡 Sending {} bytes to /_bulk for '{}'",
            body.len(),
            index
        );
        let response = self
            .request(Method::POST, "_bulk")
            // ⚠️ application/x-ndjson, not application/json. Elasticsearch cares. Deeply.
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(IngestError::transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(IngestError::transport)?;
        trace!("📬 /_bulk answered {} with {} bytes", status, body.len());
        Ok(BulkResponse { status, body })
    }
}
