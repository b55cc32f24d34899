//! CLI argument parsing for flowsplit.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use flow_types::{IndexBackend, Settings};

/// Conversation flow splitter
///
/// Groups an exported conversation into disjoint topical flows.
#[derive(Parser, Debug)]
#[command(name = "flowsplit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/flowsplit/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster an export into flows and print them as JSON
    Cluster(ClusterArgs),

    /// Print the seeds that would anchor each flow
    Seeds {
        /// Conversation export (JSON)
        export: PathBuf,
    },

    /// Inspect or reset the persisted vector index
    Index {
        /// Index directory (default from config)
        #[arg(long)]
        index_path: Option<String>,

        #[command(subcommand)]
        command: IndexCommands,
    },
}

/// Arguments of `flowsplit cluster`
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Conversation export (JSON)
    pub export: PathBuf,

    /// Vector index backend (mem or file)
    #[arg(short, long)]
    pub backend: Option<IndexBackend>,

    /// Override index directory for the file backend
    #[arg(long)]
    pub index_path: Option<String>,

    /// Nearest neighbors fetched per seed
    #[arg(long)]
    pub neighbors: Option<usize>,

    /// Maximum number of seeds
    #[arg(long)]
    pub max_seeds: Option<usize>,

    /// Use flow-1, flow-2, ... instead of ULID flow ids
    #[arg(long)]
    pub sequential_ids: bool,

    /// Emit the full report (ingest stats, seeds, topics, flows)
    #[arg(long)]
    pub report: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,
}

impl ClusterArgs {
    /// Apply flag overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(backend) = self.backend {
            settings.index_backend = backend;
        }
        if let Some(path) = &self.index_path {
            settings.index_path = path.clone();
        }
        if let Some(neighbors) = self.neighbors {
            settings.clustering.neighbors = neighbors;
        }
        if let Some(max_seeds) = self.max_seeds {
            settings.clustering.max_seeds = max_seeds;
        }
        settings.validate()?;
        Ok(())
    }
}

/// Index subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IndexCommands {
    /// Show record count, dimension and metric of the persisted index
    Stats,

    /// Remove every record from the persisted index
    Clear,
}
