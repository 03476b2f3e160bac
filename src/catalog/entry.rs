//! Schema entry types
//!
//! A `SchemaEntry` describes one table or one column: its name, a human
//! description used for semantic retrieval, and the raw definition used in
//! synthesis prompts. Entries are immutable once loaded.

use serde::{Deserialize, Serialize};

/// Kind of schema entity an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Table,
    Column,
}

/// One table or column in the schema catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Table name, or column name for column entries
    pub entity_name: String,
    /// Whether this entry describes a table or a column
    pub entity_kind: EntityKind,
    /// Owning table for column entries; None for tables
    pub parent_table: Option<String>,
    /// Human description, the text the embedding index vectorizes
    pub description: String,
    /// Raw definition (column type, or table column list)
    pub raw_definition: String,
}

impl SchemaEntry {
    /// Create a table-level entry
    pub fn table(name: &str, description: &str, raw_definition: &str) -> Self {
        Self {
            entity_name: name.to_string(),
            entity_kind: EntityKind::Table,
            parent_table: None,
            description: description.to_string(),
            raw_definition: raw_definition.to_string(),
        }
    }

    /// Create a column-level entry
    pub fn column(name: &str, parent: &str, description: &str, raw_definition: &str) -> Self {
        Self {
            entity_name: name.to_string(),
            entity_kind: EntityKind::Column,
            parent_table: Some(parent.to_string()),
            description: description.to_string(),
            raw_definition: raw_definition.to_string(),
        }
    }

    /// Fully qualified name ("table" or "table.column")
    pub fn qualified_name(&self) -> String {
        match &self.parent_table {
            Some(parent) => format!("{}.{}", parent, self.entity_name),
            None => self.entity_name.clone(),
        }
    }

    /// Text handed to the embedder: qualified name plus description, so both
    /// literal name matches and paraphrased questions land on the entry.
    pub fn embedding_text(&self) -> String {
        format!("{}: {}", self.qualified_name(), self.description)
    }

    /// Deterministic one-line rendering for prompt context
    pub fn render(&self) -> String {
        match self.entity_kind {
            EntityKind::Table => {
                format!("{} ({}): {}", self.entity_name, self.raw_definition, self.description)
            }
            EntityKind::Column => format!(
                "{} [{}]: {}",
                self.qualified_name(),
                self.raw_definition,
                self.description
            ),
        }
    }
}
