//! Command implementations for flowsplit.
//!
//! Handles:
//! - cluster: Load export, ingest into the configured index, print flows
//! - seeds: Print extracted seeds
//! - index: Stats/clear for the persisted index

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use flow_embeddings::{EmbeddingModel, HashingEmbedder};
use flow_topics::{ClusterPipeline, ClusterReport, FlowBuilder, SeedExtractor};
use flow_types::{IndexBackend, Message, Settings};
use flow_vector::{metric_for, open_index, FileIndex, VectorIndex};

use crate::cli::{ClusterArgs, IndexCommands};
use crate::export::load_export;

/// Load configuration and apply the global `--log-level` flag.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Initialize logging to stderr. `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Run the full pipeline over `messages` against the configured backend.
///
/// Clustering is CPU-bound, so it runs on the blocking pool.
pub async fn cluster_messages(
    settings: &Settings,
    messages: Vec<Message>,
    builder: FlowBuilder,
) -> Result<ClusterReport> {
    let embedder: Arc<dyn EmbeddingModel> = Arc::new(build_embedder(settings)?);
    let pipeline = ClusterPipeline::new(embedder.clone(), &settings.clustering)
        .context("Invalid clustering settings")?;
    let mut index =
        open_index(settings, embedder.info()).context("Failed to open vector index")?;

    let report = tokio::task::spawn_blocking(move || {
        pipeline.run(&messages, index.as_mut(), &builder)
    })
    .await
    .context("Clustering task panicked")?
    .context("Clustering run failed")?;

    Ok(report)
}

/// `flowsplit cluster`
pub async fn handle_cluster(settings: &Settings, args: &ClusterArgs) -> Result<()> {
    info!("Configuration:");
    info!("  Index backend: {}", settings.index_backend);
    info!("  Index path: {}", settings.index_path);
    info!("  Neighbors: {}", settings.clustering.neighbors);
    info!("  Max seeds: {}", settings.clustering.max_seeds);

    let messages = load_export(&args.export)?;
    info!(messages = messages.len(), export = ?args.export, "Loaded export");

    let builder = if args.sequential_ids {
        FlowBuilder::sequential("flow")
    } else {
        FlowBuilder::default()
    };
    let report = cluster_messages(settings, messages, builder).await?;

    if args.report {
        write_json(&report, args.output.as_deref(), args.pretty)
    } else {
        write_json(&report.flows, args.output.as_deref(), args.pretty)
    }
}

/// `flowsplit seeds`
pub fn handle_seeds(settings: &Settings, export: &Path) -> Result<()> {
    let messages = load_export(export)?;
    let seeds = SeedExtractor::from_config(&settings.clustering).extract(&messages);
    write_json(&seeds, None, true)
}

/// `flowsplit index ...`
///
/// Always operates on the persisted `file` index at `index_path`.
pub fn handle_index(settings: &Settings, command: IndexCommands) -> Result<()> {
    if settings.index_backend != IndexBackend::File {
        warn!(
            backend = %settings.index_backend,
            "Configured backend keeps nothing on disk; showing the file index at index_path"
        );
    }

    let path = settings.expanded_index_path();
    let embedder = build_embedder(settings)?;
    let metric = metric_for(settings.metric);
    let mut index = FileIndex::open_or_create(&path, embedder.info(), metric)
        .with_context(|| format!("Failed to open vector index at {:?}", path))?;

    match command {
        IndexCommands::Stats => {
            let stats = index.stats();
            println!("Vector Index Statistics");
            println!("=======================");
            println!("Path:       {:?}", index.snapshot_file());
            println!("Backend:    {}", settings.index_backend);
            println!("Model:      {}", embedder.info().name);
            println!("Records:    {}", stats.record_count);
            println!("Dimension:  {}", stats.dimension);
            println!("Metric:     {}", stats.metric);
            println!("Size:       {} bytes", stats.size_bytes);
        }
        IndexCommands::Clear => {
            let removed = index.len();
            index.clear().context("Failed to clear vector index")?;
            println!("Cleared {} records from {:?}", removed, path);
        }
    }
    Ok(())
}

fn build_embedder(settings: &Settings) -> Result<HashingEmbedder> {
    HashingEmbedder::from_settings(&settings.embedding).context("Invalid embedder settings")
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
            info!(path = ?path, "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
