//! 🚀 esq-cli — the front door, the bouncer, the maitre d' of esq.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 This binary crate is the thin CLI wrapper that parses flags, loads config,
//! sets up logging, and then lets the library do the heavy lifting.
//! Like a manager. 🦆

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use esq::{AppConfig, Document, ElasticsearchClient, IndexName};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 🔎 A small CLI for Elasticsearch: create, delete and list indices, index documents
/// (one at a time or in bulk), and search.
#[derive(Debug, Parser)]
#[command(name = "esq", version, about)]
struct Cli {
    /// 📋 TOML config file. ESQ_* environment variables are read either way.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 📡 Override the cluster URL from the config.
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Index operations
    Index {
        #[command(subcommand)]
        command: IndexCommand,
    },
    /// Search documents in an index
    Search(SearchArgs),
    /// Inspect the effective configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum IndexCommand {
    /// Create an index, optionally with a mappings/settings JSON body
    Create {
        name: String,
        #[arg(long)]
        mappings: Option<String>,
    },
    /// Delete an index
    Delete { name: String },
    /// List indices
    #[command(visible_alias = "list")]
    Ls,
    /// Index one document from --fields, or every file under --path
    Document {
        name: String,
        /// key=value pairs, e.g. title="Some Title",body="Some Body"
        #[arg(long, conflicts_with = "path", required_unless_present = "path")]
        fields: Option<String>,
        /// A file, or a directory walked recursively; each file becomes {"title","content"}
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<NonZeroUsize>,
    },
    /// Bulk-index an NDJSON file, one document per line
    Bulk {
        name: String,
        file: PathBuf,
        #[arg(long)]
        batch_size: Option<NonZeroUsize>,
    },
}

#[derive(Debug, Args)]
struct SearchArgs {
    index: String,
    /// Query DSL JSON, e.g. '{"query":{"match_all":{}}}'
    query: Option<String>,
    /// key=value pairs turned into a match query; wins over the positional query
    #[arg(long)]
    fields: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration (secrets masked)
    Show,
}

/// 🚀 main() — where it all begins. The genesis. The big bang.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Run the thing (send it and pray 🙏)
/// 4. Handle errors (cry, then print hints)
#[tokio::main]
async fn main() -> Result<()> {
    // 📡 Logs go to stderr so stdout stays clean for search results and tables
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        let mut the_vibes_are_giving_connection_issues = false;
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        for cause in err.chain() {
            let cause_str = cause.to_string();
            if cause_str.contains("error sending request")
                || cause_str.contains("onnection refused")
                || cause_str.contains("tcp connect error")
                || cause_str.contains("dns error")
            {
                the_vibes_are_giving_connection_issues = true;
            }
        }

        if the_vibes_are_giving_connection_issues {
            error!(
                "🔧 hint: looks like Elasticsearch isn't reachable. \
                Check that it's running and that the URL is right (--url, ESQ_ELASTICSEARCH__URL, \
                or [elasticsearch] url in the config file). If you're using Docker, try \
                `docker ps` to see what's up. ☕"
            );
        }

        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut app_config = esq::load_config(cli.config.as_deref())
        .context("💀 Couldn't load the configuration. Take a look at the file and the ESQ_* variables.")?;
    if let Some(url) = cli.url {
        app_config.elasticsearch.url = url;
    }

    match cli.command {
        Command::Index { command } => run_index(&app_config, command).await,
        Command::Search(args) => run_search(&app_config, args).await,
        Command::Config {
            command: ConfigCommand::Show,
        } => {
            println!("{}", render_config(&app_config));
            Ok(())
        }
    }
}

async fn run_index(app_config: &AppConfig, command: IndexCommand) -> Result<()> {
    match command {
        IndexCommand::Create { name, mappings } => {
            let index = IndexName::new(name)?;
            let client = ElasticsearchClient::new(&app_config.elasticsearch)?;
            client.create_index(&index, mappings.as_deref()).await?;
            info!("✅ Index '{}' created", index);
        }
        IndexCommand::Delete { name } => {
            let index = IndexName::new(name)?;
            let client = ElasticsearchClient::new(&app_config.elasticsearch)?;
            client.delete_index(&index).await?;
            info!("🗑️ Index '{}' deleted", index);
        }
        IndexCommand::Ls => {
            let client = ElasticsearchClient::new(&app_config.elasticsearch)?;
            let raw = client.list_indices().await?;
            println!("{}", esq::report::render_indices(&raw));
        }
        IndexCommand::Document {
            name,
            fields,
            path,
            batch_size,
        } => match (fields, path) {
            (_, Some(path)) => {
                // -- a bad name should fail fast, not after reading the whole tree
                let index = IndexName::new(name)?;
                let documents = esq::documents::load_path(&path).await?;
                ingest(app_config, index.as_str(), &documents, batch_size).await?;
            }
            (Some(fields), None) => {
                let index = IndexName::new(name)?;
                let document = esq::fields::fields_to_document(&fields)?;
                let client = ElasticsearchClient::new(&app_config.elasticsearch)?;
                client.index_document(&index, &document).await?;
                info!("✅ Document indexed into '{}'", index);
            }
            (None, None) => anyhow::bail!("💀 Nothing to index: pass --fields or --path"),
        },
        IndexCommand::Bulk {
            name,
            file,
            batch_size,
        } => {
            let index = IndexName::new(name)?;
            let documents = esq::documents::load_ndjson(&file).await?;
            ingest(app_config, index.as_str(), &documents, batch_size).await?;
        }
    }
    Ok(())
}

/// 🚚 Run the bulk pipeline, print the summary, and turn a failed batch into an error.
async fn ingest(
    app_config: &AppConfig,
    index: &str,
    documents: &[Document],
    batch_size: Option<NonZeroUsize>,
) -> Result<()> {
    let mut app_config = app_config.clone();
    if let Some(batch_size) = batch_size {
        app_config.bulk.max_batch_size_docs = batch_size;
    }

    let report = esq::bulk_index(&app_config, index, documents, true).await?;
    println!("{}", esq::report::render_ingestion(&report));

    let completed = report.batches_completed;
    report.into_result().with_context(|| {
        format!("💀 Bulk ingest into '{index}' stopped after {completed} completed batch(es)")
    })?;
    Ok(())
}

async fn run_search(app_config: &AppConfig, args: SearchArgs) -> Result<()> {
    let index = IndexName::new(args.index)?;
    let query = match args.fields.as_deref().and_then(esq::fields::fields_to_query) {
        Some(query) => {
            info!("🔎 Built query from --fields: {}", query);
            query
        }
        None => args.query.unwrap_or_default(),
    };
    let client = ElasticsearchClient::new(&app_config.elasticsearch)?;
    let result = client.search(&index, &query).await?;
    println!("{}", result);
    Ok(())
}

fn render_config(app_config: &AppConfig) -> String {
    let es = &app_config.elasticsearch;
    let mask = |secret: &Option<String>| match secret {
        Some(_) => "********".to_string(),
        None => "-".to_string(),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["setting", "value"]);
    table.add_row(vec!["elasticsearch.url".to_string(), es.url.clone()]);
    table.add_row(vec![
        "elasticsearch.username".to_string(),
        es.username.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec!["elasticsearch.password".to_string(), mask(&es.password)]);
    table.add_row(vec!["elasticsearch.api_key".to_string(), mask(&es.api_key)]);
    table.add_row(vec![
        "elasticsearch.request_timeout_secs".to_string(),
        es.request_timeout_secs
            .map(|secs| secs.to_string())
            .unwrap_or_else(|| "none".to_string()),
    ]);
    table.add_row(vec![
        "bulk.max_batch_size_docs".to_string(),
        app_config.bulk.max_batch_size_docs.to_string(),
    ]);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use esq::{FailureKind, IngestError};

    #[test]
    fn the_one_where_the_cli_definition_is_self_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn the_one_where_bulk_takes_a_batch_size() {
        let cli = Cli::try_parse_from([
            "esq", "--url", "http://es:9200", "index", "bulk", "wiki", "docs.ndjson",
            "--batch-size", "250",
        ])
        .expect("💀 bulk args did not parse");
        assert_eq!(cli.url.as_deref(), Some("http://es:9200"));
        match cli.command {
            Command::Index {
                command: IndexCommand::Bulk { name, batch_size, .. },
            } => {
                assert_eq!(name, "wiki");
                assert_eq!(batch_size.map(NonZeroUsize::get), Some(250));
            }
            plot_twist => panic!("💀 parsed into {plot_twist:?}"),
        }
    }

    #[test]
    fn the_one_where_zero_batch_size_is_rejected_at_the_door() {
        let result = Cli::try_parse_from([
            "esq", "index", "bulk", "wiki", "docs.ndjson", "--batch-size", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn the_one_where_document_needs_fields_or_path_but_not_both() {
        assert!(Cli::try_parse_from(["esq", "index", "document", "wiki"]).is_err());
        assert!(
            Cli::try_parse_from([
                "esq", "index", "document", "wiki", "--fields", "a=b", "--path", "x",
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["esq", "index", "document", "wiki", "--path", "x"]).is_ok());
    }

    #[tokio::test]
    async fn the_one_where_a_blank_name_fails_before_any_file_is_read() {
        for command in [
            IndexCommand::Document {
                name: "  ".to_string(),
                fields: None,
                path: Some(PathBuf::from("/definitely/not/here")),
                batch_size: None,
            },
            IndexCommand::Bulk {
                name: String::new(),
                file: PathBuf::from("/definitely/not/here.ndjson"),
                batch_size: None,
            },
        ] {
            let err = run_index(&AppConfig::default(), command)
                .await
                .expect_err("💀 a blank index name got through");
            let ingest_err = err
                .downcast_ref::<IngestError>()
                .expect("💀 the file was read before the name was checked");
            assert_eq!(ingest_err.kind(), FailureKind::Validation);
        }
    }

    #[test]
    fn the_one_where_secrets_stay_secret() {
        let mut app_config = AppConfig::default();
        app_config.elasticsearch.password = Some("hunter2".to_string());
        let rendered = render_config(&app_config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("http://localhost:9200"));
        assert!(rendered.contains("500"));
    }
}
