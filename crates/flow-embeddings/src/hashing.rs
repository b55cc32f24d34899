//! Feature-hashing embedder.
//!
//! Each token (and optionally each adjacent token pair) is hashed with
//! 64-bit FNV-1a. The low bits pick a bucket, the top bit picks the sign,
//! and the accumulated vector is normalized to unit length.

use tracing::debug;

use flow_types::EmbeddingSettings;

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};
use crate::tokenize::tokenize;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Weight of a single token
const UNIGRAM_WEIGHT: f32 = 1.0;

/// Weight of an adjacent token pair
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic local embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    info: ModelInfo,
    bigrams: bool,
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "dimension must be > 0".to_string(),
            ));
        }
        Ok(Self {
            info: ModelInfo {
                name: model_name(dimension, true),
                dimension,
            },
            bigrams: true,
        })
    }

    /// Build from configuration.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        Ok(Self::new(settings.dimension)?.with_bigrams(settings.bigrams))
    }

    /// Enable or disable bigram features. The model name changes with it,
    /// since vectors from the two modes are not comparable.
    pub fn with_bigrams(mut self, enabled: bool) -> Self {
        self.bigrams = enabled;
        self.info.name = model_name(self.info.dimension, enabled);
        self
    }

    fn add_feature(&self, values: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());
        let bucket = (hash % self.info.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        values[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            info: ModelInfo {
                name: model_name(384, true),
                dimension: 384,
            },
            bigrams: true,
        }
    }
}

impl EmbeddingModel for HashingEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let tokens = tokenize(text);
        let mut values = vec![0.0f32; self.info.dimension];

        for token in &tokens {
            self.add_feature(&mut values, token, UNIGRAM_WEIGHT);
        }
        if self.bigrams {
            for pair in tokens.windows(2) {
                let feature = format!("{} {}", pair[0], pair[1]);
                self.add_feature(&mut values, &feature, BIGRAM_WEIGHT);
            }
        }

        debug!(tokens = tokens.len(), "Embedded text");
        Ok(Embedding::new(values))
    }
}

fn model_name(dimension: usize, bigrams: bool) -> String {
    let features = if bigrams { "bigrams" } else { "unigrams" };
    format!("hashing-{}-{}", dimension, features)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
