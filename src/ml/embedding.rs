//! Deterministic text embedding via token feature hashing
//!
//! Schema catalogs are small and their vocabulary is narrow, so a hashed
//! bag-of-tokens embedding is enough to rank entries against a free-text
//! question. Tokens and their character trigrams are hashed into a
//! fixed-dimension vector which is then L2-normalized, making cosine
//! similarity a plain dot product. Deterministic by construction: the same
//! text always produces the same vector, which keeps retrieval tests exact.

use crate::error::{Result, SqlScoutError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Embedding vector type
pub type Embedding = Vec<f32>;

/// Configuration for the hash embedder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Vector dimension
    pub dimension: usize,
    /// Whether to include character trigram features (helps partial and
    /// misspelled matches like "amt" against "amount")
    pub char_trigrams: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 256,
            char_trigrams: true,
        }
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[a-z0-9]+").expect("valid token pattern"))
}

/// Deterministic sentence embedder over hashed token features
#[derive(Debug, Clone)]
pub struct Embedder {
    config: EmbeddingConfig,
}

impl Embedder {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        if config.dimension == 0 {
            return Err(SqlScoutError::Config(
                "embedding dimension must be non-zero".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Vector dimension produced by this embedder
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Generate the embedding for a single text
    pub fn encode(&self, text: &str) -> Result<Embedding> {
        let mut vector = vec![0.0f32; self.config.dimension];

        for token in self.tokenize(text) {
            self.bump(&mut vector, &token, 1.0);

            if self.config.char_trigrams && token.len() > 3 {
                let chars: Vec<char> = token.chars().collect();
                for window in chars.windows(3) {
                    let trigram: String = window.iter().collect();
                    // Trigrams weigh less than whole tokens so exact name
                    // matches dominate fuzzy ones.
                    self.bump(&mut vector, &format!("^{}", trigram), 0.25);
                }
            }
        }

        normalize(&mut vector);
        Ok(vector)
    }

    /// Unicode-normalized, lowercased alphanumeric tokens. Underscored
    /// identifiers split into their words so "member_id" matches "member".
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text.nfkc().collect::<String>().to_lowercase();
        token_pattern()
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn bump(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        let hash = hasher.finish();
        let slot = (hash % vector.len() as u64) as usize;
        // Sign bit decorrelates colliding features
        let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
        vector[slot] += sign * weight;
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> f32 {
    let dot = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
