//! # flow-vector
//!
//! Vector index for flowsplit.
//!
//! Records are keyed by message id and ranked by a pluggable similarity
//! metric. Search is exact (every record is scored), so results are fully
//! reproducible: descending score, ties broken by insertion order.
//!
//! ## Backends
//! - `mem`: in-process, discarded at process end
//! - `file`: JSON snapshot under `index_path`, reloaded across runs

pub mod backend;
pub mod error;
pub mod file;
pub mod index;
pub mod memory;
pub mod metric;

pub use backend::open_index;
pub use error::VectorError;
pub use file::{FileIndex, SNAPSHOT_FILE, SNAPSHOT_VERSION};
pub use index::{IndexStats, RecordMetadata, SearchResult, VectorIndex, VectorRecord};
pub use memory::MemoryIndex;
pub use metric::{metric_for, Cosine, DotProduct, SimilarityMetric};
