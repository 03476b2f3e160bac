//! Agent Orchestrator
//!
//! Bounded ReAct loop: think, pick one tool, observe, repeat. The transcript
//! of (thought, action, observation) steps is the only state the
//! orchestrator holds, and it is discarded when the turn ends. Termination:
//! a final answer, the step budget (`Inconclusive`), or a query session that
//! aborted on infrastructure failure.

use crate::agent::tools::{ToolChoice, ToolOutput, ToolSet, TOOL_GUIDE};
use crate::error::{Result, SqlScoutError};
use crate::llm::{complete_with_timeout, CompletionProvider};
use crate::query::{QuerySession, SessionOutcome};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// One step of the reasoning transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub thought: String,
    pub action: ToolChoice,
    pub observation: String,
}

/// Final product of one orchestrated turn
#[derive(Debug)]
pub struct AgentAnswer {
    /// Natural-language answer for the user
    pub answer: String,
    /// The query session backing the answer, when sql_query ran
    pub session: Option<QuerySession>,
    /// Full reasoning transcript for auditing
    pub transcript: Vec<Step>,
}

/// Bounded tool-choosing reasoning loop
pub struct Orchestrator {
    tools: ToolSet,
    max_steps: usize,
    llm_timeout: Duration,
}

impl Orchestrator {
    pub fn new(tools: ToolSet, max_steps: usize, llm_timeout: Duration) -> Self {
        Self {
            tools,
            max_steps,
            llm_timeout,
        }
    }

    /// Assemble a ready-to-use agent over `db` with the built-in e-commerce
    /// schema catalog.
    pub fn bootstrap(config: &crate::config::Config, db: crate::db::Database) -> Result<Self> {
        use crate::catalog::builtin;
        use crate::ml::{Embedder, EmbeddingConfig, EmbeddingIndex};
        use crate::query::{ExecutionLoop, QuerySynthesizer};
        use crate::retrieval::SchemaRetriever;
        use std::sync::Arc;

        let catalog = Arc::new(builtin::ecommerce_catalog()?);
        let embedder = Embedder::new(EmbeddingConfig::default())?;
        let index = Arc::new(EmbeddingIndex::build(&catalog, embedder)?);
        let tools = ToolSet::new(
            SchemaRetriever::new(catalog, index),
            ExecutionLoop::new(
                QuerySynthesizer::new(config.llm.timeout),
                config.agent.max_attempts,
            ),
            db,
            config.retrieval.clone(),
        );
        Ok(Self::new(tools, config.agent.max_steps, config.llm.timeout))
    }

    /// Answer one user question. Side effects are confined to tool
    /// invocations; no state survives past the returned transcript.
    pub async fn answer<P: CompletionProvider>(
        &mut self,
        provider: &P,
        question: &str,
    ) -> Result<AgentAnswer> {
        let mut transcript: Vec<Step> = Vec::new();
        let mut last_session: Option<QuerySession> = None;

        for step_number in 1..=self.max_steps {
            let prompt = self.build_prompt(question, &transcript);
            let completion = complete_with_timeout(provider, &prompt, self.llm_timeout).await?;

            let (thought, choice) = match parse_decision(&completion) {
                Ok(decision) => decision,
                Err(e) => {
                    // A malformed decision burns a step; tell the model what
                    // went wrong and let it try again.
                    log::warn!("Step {}: unparseable decision: {}", step_number, e);
                    transcript.push(Step {
                        thought: completion.trim().to_string(),
                        action: ToolChoice::SchemaLookup(String::new()),
                        observation: format!(
                            "Your response was not understood ({}). Reply with an Action and \
                             Action Input, or a Final Answer.",
                            e
                        ),
                    });
                    continue;
                }
            };

            log::info!("Step {}: {} ", step_number, choice.name());

            if let ToolChoice::FinalAnswer(answer) = choice {
                return Ok(AgentAnswer {
                    answer,
                    session: last_session,
                    transcript,
                });
            }

            let observation = match self.tools.dispatch(provider, &choice).await? {
                ToolOutput::Observation(text) => text,
                ToolOutput::Query(session) => {
                    let observation = render_session(&session);
                    match &session.outcome {
                        Some(SessionOutcome::Aborted { error }) => {
                            // Non-retryable infrastructure failure: no
                            // alternative path remains, surface immediately.
                            return Err(SqlScoutError::Infrastructure(error.clone()));
                        }
                        _ => {
                            last_session = Some(session);
                            observation
                        }
                    }
                }
            };

            transcript.push(Step {
                thought,
                action: choice,
                observation,
            });
        }

        Err(SqlScoutError::Inconclusive(format!(
            "no confident answer after {} reasoning steps",
            self.max_steps
        )))
    }

    fn build_prompt(&self, question: &str, transcript: &[Step]) -> String {
        let tables = self.tools_table_list();
        let mut prompt = format!(
            "Answer the following question about a SQL database.\n\n\
             You have access to the following tools:\n{}\n\n\
             Use the following format:\n\
             Question: the input question\n\
             Thought: think about what to do next\n\
             Action: one of [list_tables, describe_table, schema_lookup, sql_query]\n\
             Action Input: the input to the action\n\
             Observation: the result of the action\n\
             ... (Thought/Action/Action Input/Observation can repeat)\n\
             Thought: I now know the final answer\n\
             Final Answer: the final answer to the original question\n\n\
             Only state a final answer that is backed by an executed query's \
             results or the schema observations above. If the sql_query tool \
             failed, explain the failure instead of guessing.\n\n\
             The database contains these tables: {}\n\n\
             Question: {}\n",
            TOOL_GUIDE, tables, question
        );

        for step in transcript {
            prompt.push_str(&format!(
                "Thought: {}\nAction: {}\nAction Input: {}\nObservation: {}\n",
                step.thought,
                step.action.name(),
                step.action.input().unwrap_or(""),
                step.observation
            ));
        }
        prompt.push_str("Thought:");
        prompt
    }

    fn tools_table_list(&self) -> String {
        // Embedded in the prompt so the model rarely needs a list_tables
        // round trip.
        self.tools.table_names().join(", ")
    }
}

fn final_answer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)Final Answer:\s*(.*)").expect("valid pattern"))
}

fn action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Action:\s*([a-z_]+)\s*(?:\n+Action Input:\s*([^\n]*))?").expect("valid pattern")
    })
}

/// Parse one ReAct decision out of a completion: the thought text plus
/// either a tool invocation or the final answer.
pub fn parse_decision(completion: &str) -> Result<(String, ToolChoice)> {
    let text = completion.trim();

    let thought = text
        .split("Action:")
        .next()
        .unwrap_or("")
        .split("Final Answer:")
        .next()
        .unwrap_or("")
        .trim()
        .trim_start_matches("Thought:")
        .trim()
        .to_string();

    if let Some(captures) = final_answer_pattern().captures(text) {
        return Ok((thought, ToolChoice::FinalAnswer(captures[1].trim().to_string())));
    }

    let captures = action_pattern()
        .captures(text)
        .ok_or_else(|| SqlScoutError::Parse("no Action or Final Answer in decision".to_string()))?;

    let name = captures[1].to_string();
    let input = captures
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let choice = match name.as_str() {
        "list_tables" => ToolChoice::ListTables,
        "describe_table" => ToolChoice::DescribeTable(input),
        "schema_lookup" => ToolChoice::SchemaLookup(input),
        "sql_query" => ToolChoice::SqlQuery(input),
        other => {
            return Err(SqlScoutError::Parse(format!("unknown tool '{}'", other)));
        }
    };
    Ok((thought, choice))
}

/// Observation text for a finished query session. On exhaustion the last
/// SQL and the last database error are surfaced verbatim so the failure can
/// be explained to the user rather than hidden.
fn render_session(session: &QuerySession) -> String {
    match &session.outcome {
        Some(SessionOutcome::Answered { sql, rows }) => {
            format!("SQL: {}\nResult ({} rows):\n{}", sql, rows.len(), rows.render())
        }
        Some(SessionOutcome::Exhausted { last_error }) => {
            let last_sql = session
                .last_attempt()
                .map(|a| a.generated_sql.as_str())
                .unwrap_or("(none)");
            format!(
                "Query failed after {} attempts. Last SQL: {}\nLast error: {}",
                session.attempts.len(),
                last_sql,
                last_error
            )
        }
        Some(SessionOutcome::Aborted { error }) => format!("Query aborted: {}", error),
        None => "Query did not reach a terminal state".to_string(),
    }
}
