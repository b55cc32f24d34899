//! flowsplit command-line library.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (cluster, seeds, index)
//! - `export`: Conversation export loading

pub mod cli;
pub mod commands;
pub mod export;

pub use cli::{Cli, ClusterArgs, Commands, IndexCommands};
pub use commands::{
    cluster_messages, handle_cluster, handle_index, handle_seeds, init_logging, load_settings,
};
pub use export::{load_export, parse_export};
