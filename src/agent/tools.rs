//! Tool Set
//!
//! Discrete callable actions with narrow, auditable contracts. The
//! orchestrator depends only on this surface; retrieval and synthesis
//! internals can change underneath it. Tool choice is a closed tagged
//! variant rather than open-ended dispatch so transcripts stay auditable
//! and the step budget stays enforceable.

use crate::config::RetrievalConfig;
use crate::db::Database;
use crate::error::Result;
use crate::llm::CompletionProvider;
use crate::query::{ExecutionLoop, QuerySession};
use crate::retrieval::SchemaRetriever;
use serde::{Deserialize, Serialize};

/// One decision of the orchestrator: a tool invocation or the final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolChoice {
    ListTables,
    DescribeTable(String),
    SchemaLookup(String),
    SqlQuery(String),
    FinalAnswer(String),
}

impl ToolChoice {
    /// Tool name as shown in prompts and transcripts
    pub fn name(&self) -> &'static str {
        match self {
            ToolChoice::ListTables => "list_tables",
            ToolChoice::DescribeTable(_) => "describe_table",
            ToolChoice::SchemaLookup(_) => "schema_lookup",
            ToolChoice::SqlQuery(_) => "sql_query",
            ToolChoice::FinalAnswer(_) => "final_answer",
        }
    }

    /// The tool's input text, if it takes one
    pub fn input(&self) -> Option<&str> {
        match self {
            ToolChoice::ListTables => None,
            ToolChoice::DescribeTable(s)
            | ToolChoice::SchemaLookup(s)
            | ToolChoice::SqlQuery(s)
            | ToolChoice::FinalAnswer(s) => Some(s),
        }
    }
}

/// Result of dispatching one tool
#[derive(Debug)]
pub enum ToolOutput {
    /// Plain observation text for the transcript
    Observation(String),
    /// Full session from the sql_query tool, including attempt history
    Query(QuerySession),
}

/// Names and usage guidance rendered into the orchestrator prompt
pub const TOOL_GUIDE: &str = "\
list_tables: List all available table names in the database. Takes no input.
describe_table: Describe the schema of a specific table, including column names and types. Input is the table name.
schema_lookup: Retrieve definitions of table or column names. Input is a short phrase asking about the meaning of a field or table.
sql_query: Answer questions about data, metrics, or reports from the database. Input is a complete question in natural language; the tool generates, executes, and corrects SQL automatically.";

/// The callable tool set behind the orchestrator
pub struct ToolSet {
    retriever: SchemaRetriever,
    exec: ExecutionLoop,
    db: Database,
    retrieval: RetrievalConfig,
}

impl ToolSet {
    pub fn new(
        retriever: SchemaRetriever,
        exec: ExecutionLoop,
        db: Database,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            retriever,
            exec,
            db,
            retrieval,
        }
    }

    /// All table names, in catalog order
    pub fn table_names(&self) -> Vec<String> {
        self.retriever.lookup_tables()
    }

    /// Invoke one tool. Lookup misses and empty retrievals are observations,
    /// not errors; the orchestrator reads them and picks its next tool.
    pub async fn dispatch<P: CompletionProvider>(
        &mut self,
        provider: &P,
        choice: &ToolChoice,
    ) -> Result<ToolOutput> {
        match choice {
            ToolChoice::ListTables => {
                Ok(ToolOutput::Observation(self.retriever.lookup_tables().join(", ")))
            }
            ToolChoice::DescribeTable(name) => match self.retriever.describe(name.trim()) {
                Ok(description) => Ok(ToolOutput::Observation(description.render())),
                Err(crate::error::SqlScoutError::NotFound(_)) => Ok(ToolOutput::Observation(
                    format!("No table named '{}' exists. Use list_tables to see the available tables.", name.trim()),
                )),
                Err(e) => Err(e),
            },
            ToolChoice::SchemaLookup(text) => {
                let hits = self.retriever.semantic_lookup(
                    text,
                    self.retrieval.top_k,
                    self.retrieval.min_score,
                )?;
                if hits.is_empty() {
                    Ok(ToolOutput::Observation(
                        "No schema entries matched that description.".to_string(),
                    ))
                } else {
                    let lines: Vec<String> = hits
                        .iter()
                        .map(|hit| format!("{} (score {:.2})", hit.entry.render(), hit.score))
                        .collect();
                    Ok(ToolOutput::Observation(lines.join("\n")))
                }
            }
            ToolChoice::SqlQuery(question) => {
                let session = self.run_query(provider, question).await?;
                Ok(ToolOutput::Query(session))
            }
            ToolChoice::FinalAnswer(_) => Ok(ToolOutput::Observation(String::new())),
        }
    }

    /// Ground the question in retrieved schema context, then run the
    /// execution and correction loop. An empty retrieval falls back to the
    /// full catalog so synthesis is never blind.
    async fn run_query<P: CompletionProvider>(
        &mut self,
        provider: &P,
        question: &str,
    ) -> Result<QuerySession> {
        let hits = self.retriever.semantic_lookup(
            question,
            self.retrieval.top_k,
            self.retrieval.min_score,
        )?;

        let context = if hits.is_empty() {
            log::debug!("No grounding found for '{}', using full catalog", question);
            self.retriever.catalog().entries().to_vec()
        } else {
            hits.into_iter().map(|hit| hit.entry).collect()
        };

        self.exec.run(provider, &mut self.db, question, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;
    use crate::llm::ScriptedProvider;
    use crate::ml::{Embedder, EmbeddingConfig, EmbeddingIndex};
    use crate::query::{QuerySynthesizer, SessionOutcome};
    use std::sync::Arc;
    use std::time::Duration;

    fn toolset() -> ToolSet {
        let catalog = Arc::new(builtin::ecommerce_catalog().unwrap());
        let embedder = Embedder::new(EmbeddingConfig::default()).unwrap();
        let index = Arc::new(EmbeddingIndex::build(&catalog, embedder).unwrap());
        ToolSet::new(
            SchemaRetriever::new(catalog, index),
            ExecutionLoop::new(QuerySynthesizer::new(Duration::from_secs(5)), 3),
            Database::demo().unwrap(),
            RetrievalConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_list_tables() {
        let mut tools = toolset();
        let provider = ScriptedProvider::new(Vec::new());
        let output = tools.dispatch(&provider, &ToolChoice::ListTables).await.unwrap();
        match output {
            ToolOutput::Observation(text) => {
                assert!(text.contains("members"));
                assert!(text.contains("transaction_items"));
            }
            other => panic!("expected Observation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_describe_unknown_table_is_observation() {
        let mut tools = toolset();
        let provider = ScriptedProvider::new(Vec::new());
        let output = tools
            .dispatch(&provider, &ToolChoice::DescribeTable("orders".to_string()))
            .await
            .unwrap();
        match output {
            ToolOutput::Observation(text) => assert!(text.contains("No table named 'orders'")),
            other => panic!("expected Observation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sql_query_tool_answers() {
        let mut tools = toolset();
        let provider = ScriptedProvider::new(vec![
            "SELECT COUNT(*) FROM campaigns".to_string(),
        ]);
        let output = tools
            .dispatch(
                &provider,
                &ToolChoice::SqlQuery("how many campaigns are there?".to_string()),
            )
            .await
            .unwrap();

        match output {
            ToolOutput::Query(session) => {
                assert!(matches!(session.outcome, Some(SessionOutcome::Answered { .. })));
            }
            other => panic!("expected Query, got {:?}", other),
        }
    }
}
