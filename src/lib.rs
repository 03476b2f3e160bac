//! # sqlscout
//!
//! A natural-language-to-SQL agent for SQLite: schema retrieval grounds the
//! question, a language model synthesizes the SQL, and a bounded correction
//! loop re-synthesizes after database errors until the query succeeds or the
//! retry budget runs out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqlscout::{Config, Database, Orchestrator, OpenAiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.llm.api_key = std::env::var("OPENAI_API_KEY")?;
//!
//!     let provider = OpenAiProvider::new(&config.llm)?;
//!     let db = Database::demo()?;
//!     let mut agent = Orchestrator::bootstrap(&config, db)?;
//!
//!     let answer = agent.answer(&provider, "Which campaign drove the most revenue?").await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod agent;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod ml;
pub mod query;
pub mod retrieval;

// Re-export main API types
pub use agent::{AgentAnswer, Orchestrator, Step, ToolChoice, ToolSet};
pub use config::Config;
pub use db::{Database, ResultSet};
pub use error::{Result, SqlScoutError};
pub use llm::{CompletionProvider, OpenAiProvider, ScriptedProvider};

// Re-export commonly used types
pub use catalog::{SchemaCatalog, SchemaEntry};
pub use query::{QuerySession, SessionOutcome};
pub use retrieval::SchemaRetriever;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_imports() {
        // Ensure all major types can be imported
        let _config = Config::default();
    }
}
