//! Configuration loading for flowsplit.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/flowsplit/config.toml.

use config::{Config, Environment, File};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FlowError;

/// Default number of nearest neighbors fetched per seed
pub const DEFAULT_NEIGHBORS: usize = 50;

/// Default maximum number of seeds per run
pub const DEFAULT_MAX_SEEDS: usize = 12;

/// Default maximum seed title length (characters)
pub const DEFAULT_MAX_TITLE_CHARS: usize = 80;

/// Vector index backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    /// In-process index, discarded at process end (default)
    #[default]
    Mem,
    /// Index persisted to `index_path` and reloaded across runs
    File,
}

impl std::str::FromStr for IndexBackend {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mem" | "memory" => Ok(IndexBackend::Mem),
            "file" => Ok(IndexBackend::File),
            other => Err(FlowError::Config(format!(
                "unknown index backend '{}', expected 'mem' or 'file'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexBackend::Mem => write!(f, "mem"),
            IndexBackend::File => write!(f, "file"),
        }
    }
}

/// Similarity metric used to rank index records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Cosine similarity (default)
    #[default]
    Cosine,
    /// Raw dot product
    Dot,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cosine => "cosine",
            MetricKind::Dot => "dot",
        }
    }
}

/// Local embedder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Also hash adjacent token pairs
    #[serde(default = "default_true")]
    pub bigrams: bool,
}

fn default_dimension() -> usize {
    384
}

fn default_true() -> bool {
    true
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            bigrams: default_true(),
        }
    }
}

/// Clustering parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Nearest neighbors fetched per seed
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,

    /// Maximum seeds extracted from user messages
    #[serde(default = "default_max_seeds")]
    pub max_seeds: usize,

    /// Seed titles are truncated to this many characters
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
}

fn default_neighbors() -> usize {
    DEFAULT_NEIGHBORS
}

fn default_max_seeds() -> usize {
    DEFAULT_MAX_SEEDS
}

fn default_max_title_chars() -> usize {
    DEFAULT_MAX_TITLE_CHARS
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
            max_seeds: default_max_seeds(),
            max_title_chars: default_max_title_chars(),
        }
    }
}

impl ClusterConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.neighbors == 0 {
            return Err("neighbors must be > 0".to_string());
        }
        if self.max_seeds == 0 {
            return Err("max_seeds must be > 0".to_string());
        }
        if self.max_title_chars == 0 {
            return Err("max_title_chars must be > 0".to_string());
        }
        Ok(())
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vector index backend (`mem` or `file`)
    #[serde(default)]
    pub index_backend: IndexBackend,

    /// Directory of the `file` backend
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Similarity metric
    #[serde(default)]
    pub metric: MetricKind,

    /// Embedder settings
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Clustering parameters
    #[serde(default)]
    pub clustering: ClusterConfig,
}

fn default_index_path() -> String {
    ProjectDirs::from("", "", "flowsplit")
        .map(|p| p.data_local_dir().join("vector-index"))
        .unwrap_or_else(|| PathBuf::from("./vector-index"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_backend: IndexBackend::default(),
            index_path: default_index_path(),
            log_level: default_log_level(),
            metric: MetricKind::default(),
            embedding: EmbeddingSettings::default(),
            clustering: ClusterConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/flowsplit/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (FLOWSPLIT_*, nested keys joined by `__`)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, FlowError> {
        let config_dir = ProjectDirs::from("", "", "flowsplit")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("index_backend", IndexBackend::default().to_string())
            .map_err(|e| FlowError::Config(e.to_string()))?
            .set_default("index_path", default_index_path())
            .map_err(|e| FlowError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| FlowError::Config(e.to_string()))?
            .set_default("metric", MetricKind::default().as_str())
            .map_err(|e| FlowError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // FLOWSPLIT_INDEX_BACKEND, FLOWSPLIT_CLUSTERING__NEIGHBORS, ...
        builder = builder.add_source(
            Environment::with_prefix("FLOWSPLIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| FlowError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| FlowError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate all nested settings.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.embedding.dimension == 0 {
            return Err(FlowError::Config(
                "embedding.dimension must be > 0".to_string(),
            ));
        }
        self.clustering.validate().map_err(FlowError::Config)
    }

    /// Expand ~ in index_path to the home directory
    pub fn expanded_index_path(&self) -> PathBuf {
        if let Some(rest) = self.index_path.strip_prefix("~/") {
            if let Some(dirs) = BaseDirs::new() {
                return dirs.home_dir().join(rest);
            }
        }
        PathBuf::from(&self.index_path)
    }
}
