//! Schema retrieval
//!
//! Typed lookup contract over the schema catalog and embedding index.

pub mod retriever;

pub use retriever::{ScoredEntry, SchemaRetriever, TableDescription};
