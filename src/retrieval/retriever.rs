//! Schema Retriever
//!
//! Wraps the catalog and embedding index behind a typed lookup contract.
//! Exact structural queries (table listing, table description) go straight
//! to the catalog and never depend on approximate retrieval; only free-text
//! disambiguation goes through the embedding index.

use crate::catalog::{SchemaCatalog, SchemaEntry};
use crate::error::{Result, SqlScoutError};
use crate::ml::EmbeddingIndex;
use std::sync::Arc;

/// A retrieved schema entry with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub entry: SchemaEntry,
    pub score: f32,
    pub rank: usize,
}

/// Exact description of one table: its entry plus all column entries
#[derive(Debug, Clone)]
pub struct TableDescription {
    pub table: SchemaEntry,
    pub columns: Vec<SchemaEntry>,
}

impl TableDescription {
    /// Multi-line rendering for tool observations and prompts
    pub fn render(&self) -> String {
        let mut lines = vec![self.table.render()];
        lines.extend(self.columns.iter().map(|c| format!("  {}", c.render())));
        lines.join("\n")
    }
}

/// Typed lookup surface over catalog + index
pub struct SchemaRetriever {
    catalog: Arc<SchemaCatalog>,
    index: Arc<EmbeddingIndex>,
}

impl SchemaRetriever {
    pub fn new(catalog: Arc<SchemaCatalog>, index: Arc<EmbeddingIndex>) -> Self {
        Self { catalog, index }
    }

    /// All table names in the catalog, no embedding involved
    pub fn lookup_tables(&self) -> Vec<String> {
        self.catalog
            .table_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Exact-match table description; `NotFound` on a miss
    pub fn describe(&self, table_name: &str) -> Result<TableDescription> {
        let table = self
            .catalog
            .table(table_name)
            .ok_or_else(|| SqlScoutError::NotFound(format!("table '{}'", table_name)))?;

        Ok(TableDescription {
            table: table.clone(),
            columns: self
                .catalog
                .columns_of(table_name)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Free-text lookup of the k nearest schema entries scoring at least
    /// `min_score`. An empty result is the "no grounding found" signal, not
    /// an error.
    pub fn semantic_lookup(
        &self,
        free_text: &str,
        k: usize,
        min_score: f32,
    ) -> Result<Vec<ScoredEntry>> {
        let results = self.index.query(free_text, k)?;

        let filtered: Vec<ScoredEntry> = results
            .into_iter()
            .filter(|r| r.score >= min_score)
            .map(|r| ScoredEntry {
                entry: self.catalog.entries()[r.entry_id].clone(),
                score: r.score,
                rank: r.rank,
            })
            .collect();

        if filtered.is_empty() {
            log::debug!(
                "semantic_lookup('{}'): no entries passed min_score {}",
                free_text,
                min_score
            );
        }

        Ok(filtered)
    }

    /// The full catalog, for whole-schema prompt context
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }
}
