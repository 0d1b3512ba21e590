//! 🔧 App Configuration — the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." — every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.
//!
//! There is no global "current backend" anywhere in this crate. You load an
//! [`AppConfig`] once and pass it by reference to whoever needs it. Like a baton.
//! Nobody gets to keep the baton.

use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

/// 📦 The AppConfig: one struct to rule them all, one struct to find them,
/// one struct to bring them all, and in the Figment bind them.
///
/// Every field has a default, so an empty file (or no file at all) is a valid config
/// that points at `http://localhost:9200` and batches by 500.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
}

/// 📡 Where the cluster lives and how to convince it we're allowed in.
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticsearchConfig {
    /// 📡 Base URL, scheme and port included. Yes, all of it.
    #[serde(default = "default_url")]
    pub url: String,
    /// 🔒 Username for basic auth. Optional, like flossing.
    #[serde(default)]
    pub username: Option<String>,
    /// 🔒 Password. If this is in plaintext in your config file, we're not mad, just disappointed.
    #[serde(default)]
    pub password: Option<String>,
    /// 🔒 API key — wins over basic auth when both are set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// ⏱️ Per-request timeout. Absent means we wait as long as reqwest waits, which is forever-ish.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            api_key: None,
            request_timeout_secs: None,
        }
    }
}

/// 📦 Bulk ingestion knobs.
#[derive(Debug, Deserialize, Clone)]
pub struct BulkConfig {
    /// 📦 Documents per `_bulk` request. `NonZeroUsize` because a batch size of zero
    /// is not a batch size, it's a koan.
    #[serde(default = "default_max_batch_size_docs")]
    pub max_batch_size_docs: NonZeroUsize,
}

// 📦 500 docs per request, a size most clusters digest without reaching for the antacids.
fn default_max_batch_size_docs() -> NonZeroUsize {
    NonZeroUsize::new(500).unwrap_or(NonZeroUsize::MIN)
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_batch_size_docs: default_max_batch_size_docs(),
        }
    }
}

/// 🚀 Load the config — from a file, from env vars, or from the sheer power of defaults.
///
/// 🔧 Merges environment variables (`ESQ_*`, nested keys split on `__`, so
/// `ESQ_ELASTICSEARCH__URL` lands in `elasticsearch.url`) with an optional TOML file.
/// TOML wins on conflicts.
///
/// 💀 Returns an error if the config is unparseable, or if the file was named explicitly
/// but isn't there. Silently ignoring a typo'd `--config` path is how you end up indexing
/// into localhost at 3am wondering where your cluster went.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("ESQ_").split("__"));

    let config = match config_file_name {
        Some(file_name) => {
            let exists = file_name.try_exists().with_context(|| {
                format!(
                    "💀 Couldn't even check whether the config file exists: '{}'",
                    file_name.display()
                )
            })?;
            if !exists {
                anyhow::bail!(
                    "💀 Configuration file '{}' does not exist. Double check the path, or use an absolute one to be absolutely certain.",
                    file_name.display()
                );
            }
            config.merge(Toml::file(file_name))
        }
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (ESQ_*).",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (ESQ_*). \
                 No file was provided — this one's all on the environment."
            .to_string(),
    };

    config.extract().context(context_msg)
}
