//! Embedding index over schema catalog entries
//!
//! Builds one embedding record per catalog entry as a one-shot batch step,
//! then answers top-k nearest-neighbor queries by exact cosine scan. The
//! catalog is tiny (tens of entries), so an exact scan is both the fastest
//! and the simplest correct structure; queries never mutate the index.

use crate::catalog::SchemaCatalog;
use crate::error::Result;
use crate::ml::embedding::{cosine_similarity, Embedder, Embedding};
use serde::{Deserialize, Serialize};

/// One vectorized catalog entry
#[derive(Debug, Clone)]
struct EmbeddingRecord {
    /// Index of the entry in the catalog's load order
    entry_id: usize,
    vector: Embedding,
}

/// One nearest-neighbor hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Index of the matched entry in the catalog's load order
    pub entry_id: usize,
    /// Cosine similarity to the query
    pub score: f32,
    /// Zero-based rank in the result list
    pub rank: usize,
}

/// Read-only nearest-neighbor index over a schema catalog
pub struct EmbeddingIndex {
    records: Vec<EmbeddingRecord>,
    embedder: Embedder,
}

impl EmbeddingIndex {
    /// Vectorize every catalog entry. Any embedding failure fails the whole
    /// build; a partial index would silently drop schema grounding.
    pub fn build(catalog: &SchemaCatalog, embedder: Embedder) -> Result<Self> {
        let mut records = Vec::with_capacity(catalog.len());

        for (entry_id, entry) in catalog.entries().iter().enumerate() {
            let vector = embedder.encode(&entry.embedding_text())?;
            records.push(EmbeddingRecord { entry_id, vector });
        }

        log::info!(
            "Embedding index built: {} entries, dimension {}",
            records.len(),
            embedder.dimension()
        );

        Ok(Self { records, embedder })
    }

    /// Top-k entries by descending cosine similarity to `text`.
    ///
    /// Ties break by catalog load order for determinism. An empty index
    /// returns an empty vector, not an error.
    pub fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        if self.records.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.encode(text)?;

        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .map(|record| (record.entry_id, cosine_similarity(&query_vector, &record.vector)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(rank, (entry_id, score))| RetrievalResult {
                entry_id,
                score,
                rank,
            })
            .collect())
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{builtin, SchemaCatalog};
    use crate::ml::embedding::EmbeddingConfig;

    fn built_index() -> (SchemaCatalog, EmbeddingIndex) {
        let catalog = builtin::ecommerce_catalog().unwrap();
        let embedder = Embedder::new(EmbeddingConfig::default()).unwrap();
        let index = EmbeddingIndex::build(&catalog, embedder).unwrap();
        (catalog, index)
    }

    #[test]
    fn test_build_covers_catalog() {
        let (catalog, index) = built_index();
        assert_eq!(index.len(), catalog.len());
    }

    #[test]
    fn test_results_sorted_and_bounded() {
        let (catalog, index) = built_index();
        let results = index.query("discount rate of marketing campaigns", 5).unwrap();

        assert!(results.len() <= 5);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.rank, i);
            assert!(result.entry_id < catalog.len());
        }
    }

    #[test]
    fn test_query_finds_relevant_entry() {
        let (catalog, index) = built_index();
        let results = index.query("member's email address", 3).unwrap();

        let hit = results
            .iter()
            .any(|r| catalog.entries()[r.entry_id].qualified_name() == "members.email");
        assert!(hit, "expected members.email in top 3: {:?}", results);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let catalog = SchemaCatalog::new(Vec::new()).unwrap();
        let embedder = Embedder::new(EmbeddingConfig::default()).unwrap();
        let index = EmbeddingIndex::build(&catalog, embedder).unwrap();

        assert!(index.is_empty());
        assert!(index.query("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn test_k_zero_returns_empty() {
        let (_, index) = built_index();
        assert!(index.query("members", 0).unwrap().is_empty());
    }
}
