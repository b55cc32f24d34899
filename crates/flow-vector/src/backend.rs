//! Backend selection from settings.

use tracing::info;

use flow_embeddings::ModelInfo;
use flow_types::{IndexBackend, Settings};

use crate::error::VectorError;
use crate::file::FileIndex;
use crate::index::VectorIndex;
use crate::memory::MemoryIndex;
use crate::metric::metric_for;

/// Open the index backend selected by `settings.index_backend`, sized for
/// vectors produced by `model`.
pub fn open_index(
    settings: &Settings,
    model: &ModelInfo,
) -> Result<Box<dyn VectorIndex>, VectorError> {
    let metric = metric_for(settings.metric);

    info!(
        backend = %settings.index_backend,
        metric = metric.name(),
        model = %model.name,
        dim = model.dimension,
        "Opening vector index"
    );

    Ok(match settings.index_backend {
        IndexBackend::Mem => Box::new(MemoryIndex::with_metric(model.dimension, metric)),
        IndexBackend::File => Box::new(FileIndex::open_or_create(
            settings.expanded_index_path(),
            model,
            metric,
        )?),
    })
}
