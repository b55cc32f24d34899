//! flowsplit
//!
//! Groups an exported conversation log into disjoint topical flows.
//!
//! # Usage
//!
//! ```bash
//! flowsplit cluster export.json [--backend mem|file] [--output flows.json]
//! flowsplit seeds export.json
//! flowsplit index stats
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/flowsplit/config.toml)
//! 3. Environment variables (FLOWSPLIT_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use flow_cli::{
    handle_cluster, handle_index, handle_seeds, init_logging, load_settings, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;

    match cli.command {
        Commands::Cluster(args) => {
            args.apply(&mut settings)?;
            init_logging(&settings)?;
            handle_cluster(&settings, &args).await?;
        }
        Commands::Seeds { export } => {
            init_logging(&settings)?;
            handle_seeds(&settings, &export)?;
        }
        Commands::Index {
            index_path,
            command,
        } => {
            if let Some(path) = index_path {
                settings.index_path = path;
            }
            init_logging(&settings)?;
            handle_index(&settings, command)?;
        }
    }

    Ok(())
}
