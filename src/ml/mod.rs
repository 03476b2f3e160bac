//! Embedding and vector lookup for schema retrieval
//!
//! This module vectorizes schema catalog entries and answers nearest-neighbor
//! lookups by natural-language query. The index is built once at startup and
//! is read-only afterwards, so queries are safe under concurrent use.

pub mod embedding;
pub mod index;

pub use embedding::{Embedder, Embedding, EmbeddingConfig};
pub use index::{EmbeddingIndex, RetrievalResult};
