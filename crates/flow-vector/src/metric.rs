//! Similarity metrics.
//!
//! The index ranks by whatever [`SimilarityMetric`] it was built with;
//! cosine is the default.

use std::sync::Arc;

use flow_types::MetricKind;

/// A symmetric similarity function. Higher means more similar.
pub trait SimilarityMetric: Send + Sync + std::fmt::Debug {
    /// Stable name, stored in snapshots
    fn name(&self) -> &'static str;

    /// Score two vectors of equal length.
    fn score(&self, a: &[f32], b: &[f32]) -> f32;
}

/// Cosine similarity in [-1.0, 1.0]. Zero vectors score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl SimilarityMetric for Cosine {
    fn name(&self) -> &'static str {
        MetricKind::Cosine.as_str()
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        let dot_product = dot(a, b);
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

/// Raw dot product. Equals cosine for unit-length embeddings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotProduct;

impl SimilarityMetric for DotProduct {
    fn name(&self) -> &'static str {
        MetricKind::Dot.as_str()
    }

    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        dot(a, b)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Build the metric selected by configuration.
pub fn metric_for(kind: MetricKind) -> Arc<dyn SimilarityMetric> {
    match kind {
        MetricKind::Cosine => Arc::new(Cosine),
        MetricKind::Dot => Arc::new(DotProduct),
    }
}
