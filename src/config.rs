//! Configuration for sqlscout
//!
//! All tunable knobs live here and are constructed once at startup, then
//! passed explicitly into the retriever, loop, and orchestrator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Language model connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the completion endpoint (may be empty for local servers)
    pub api_key: String,
    /// Base URL for OpenAI-compatible APIs (e.g. "http://localhost:11434/v1" for Ollama)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per completion
    pub max_tokens: u16,
    /// Time bound for a single completion call
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Schema retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of schema entries to retrieve per lookup
    pub top_k: usize,
    /// Minimum cosine similarity for a retrieved entry to count as grounding
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_score: 0.25,
        }
    }
}

/// Agent and correction-loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Retry budget for the execution and correction loop
    pub max_attempts: usize,
    /// Step budget for the orchestrator reasoning loop
    pub max_steps: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_steps: 8,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub agent: AgentConfig,
}
