//! Schema Catalog for sqlscout
//!
//! Static, read-only description of the tables and columns available to
//! query. Loaded once at startup and shared by the retriever and the
//! embedding index; never mutated afterwards.

pub mod builtin;
pub mod entry;

pub use entry::{EntityKind, SchemaEntry};

use crate::error::{Result, SqlScoutError};
use std::collections::HashMap;

/// Immutable catalog of schema entries with O(1) exact table lookup
pub struct SchemaCatalog {
    /// All entries in load order; this order breaks retrieval ties
    entries: Vec<SchemaEntry>,
    /// Table name -> index into `entries` for the table-level entry
    table_index: HashMap<String, usize>,
    /// Table name -> indexes of that table's column entries
    column_index: HashMap<String, Vec<usize>>,
}

impl SchemaCatalog {
    /// Build a catalog from a sequence of entries.
    ///
    /// Column entries must name an existing parent table; a dangling parent
    /// fails the load so the retriever can trust every reference.
    pub fn new(entries: Vec<SchemaEntry>) -> Result<Self> {
        let mut table_index = HashMap::new();
        let mut column_index: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, entry) in entries.iter().enumerate() {
            match entry.entity_kind {
                EntityKind::Table => {
                    table_index.insert(entry.entity_name.clone(), i);
                }
                EntityKind::Column => {
                    let parent = entry.parent_table.as_ref().ok_or_else(|| {
                        SqlScoutError::Config(format!(
                            "column entry '{}' has no parent table",
                            entry.entity_name
                        ))
                    })?;
                    column_index.entry(parent.clone()).or_default().push(i);
                }
            }
        }

        for parent in column_index.keys() {
            if !table_index.contains_key(parent) {
                return Err(SqlScoutError::Config(format!(
                    "column entries reference unknown table '{}'",
                    parent
                )));
            }
        }

        log::info!(
            "Schema catalog loaded: {} tables, {} entries",
            table_index.len(),
            entries.len()
        );

        Ok(Self {
            entries,
            table_index,
            column_index,
        })
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// All table names, in catalog order
    pub fn table_names(&self) -> Vec<&str> {
        let mut indexed: Vec<(&usize, &String)> =
            self.table_index.iter().map(|(name, i)| (i, name)).collect();
        indexed.sort_by_key(|(i, _)| **i);
        indexed.into_iter().map(|(_, name)| name.as_str()).collect()
    }

    /// Exact-match lookup of a table-level entry
    pub fn table(&self, name: &str) -> Option<&SchemaEntry> {
        self.table_index.get(name).map(|&i| &self.entries[i])
    }

    /// Column entries for a table, in catalog order
    pub fn columns_of(&self, table: &str) -> Vec<&SchemaEntry> {
        self.column_index
            .get(table)
            .map(|ids| ids.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic one-line-per-entry rendering of the full catalog,
    /// used as schema context in synthesis prompts.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.render())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
