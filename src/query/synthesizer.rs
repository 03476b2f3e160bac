//! Query Synthesizer
//!
//! Builds the generation prompt from retrieved schema context, the question,
//! and the most recent failure, invokes the completion capability exactly
//! once, and parses a SQL statement out of the raw completion. A completion
//! with no SQL-shaped text is a `Parse` error, which the loop treats as a
//! failed attempt distinct from an execution failure.

use crate::catalog::SchemaEntry;
use crate::error::{Result, SqlScoutError};
use crate::llm::{complete_with_timeout, CompletionProvider};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// A prior failure fed back into the next synthesis. `sql` is empty when the
/// failure happened before execution (unparseable completion or a timeout).
#[derive(Debug, Clone)]
pub struct FailedAttempt {
    pub sql: String,
    pub error: String,
}

/// Prompt builder + SQL extractor around one completion call per synthesis
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    timeout: Duration,
}

impl QuerySynthesizer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Synthesize one SQL statement for `question` grounded in `context`.
    pub async fn synthesize<P: CompletionProvider>(
        &self,
        provider: &P,
        question: &str,
        context: &[SchemaEntry],
        prior_failures: &[FailedAttempt],
    ) -> Result<String> {
        let prompt = self.build_prompt(question, context, prior_failures);
        log::debug!("Synthesis prompt ({} chars)", prompt.len());

        let completion = complete_with_timeout(provider, &prompt, self.timeout).await?;
        let sql = extract_sql(&completion)?;
        log::info!("Synthesized SQL: {}", sql);
        Ok(sql)
    }

    fn build_prompt(
        &self,
        question: &str,
        context: &[SchemaEntry],
        prior_failures: &[FailedAttempt],
    ) -> String {
        let mut prompt = String::from(
            "You are an expert SQLite analyst. Write one SQL statement that answers \
             the question using only the tables and columns below.\n\nSchema:\n",
        );
        for entry in context {
            prompt.push_str(&entry.render());
            prompt.push('\n');
        }

        prompt.push_str(&format!("\nQuestion: {}\n", question));

        if let Some(failure) = prior_failures.last() {
            if failure.sql.is_empty() {
                prompt.push_str(&format!(
                    "\nYour previous response could not be used: {}\n\
                     Respond with exactly one SQL statement and nothing else.\n",
                    failure.error
                ));
            } else {
                prompt.push_str(&format!(
                    "\nThe previous attempt to answer this question failed. \
                     The generated SQL was:\n{}\nIt produced the following database error:\n{}\n\
                     Analyze the error and the schema above to generate a corrected SQL query.\n",
                    failure.sql, failure.error
                ));
            }
        }

        prompt.push_str("\nRespond with only the SQL statement.");
        prompt
    }
}

fn sql_query_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // "SQLQuery: ..." optionally followed by an echoed "SQLResult:" section
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)SQLQuery:\s*(.*?)(?:\nSQLResult:|$)").expect("valid label pattern")
    })
}

fn sql_statement() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)\b(SELECT|WITH|INSERT|UPDATE|DELETE|EXPLAIN)\b").expect("valid keyword pattern")
    })
}

/// Extract the first well-formed SQL statement from a raw completion.
///
/// Handles the decorations models actually produce: `SQLQuery:` labels,
/// markdown code fences, and trailing commentary after the statement.
pub fn extract_sql(completion: &str) -> Result<String> {
    let mut text = completion.trim().to_string();

    if let Some(captures) = sql_query_label().captures(&text) {
        text = captures[1].trim().to_string();
    }

    // Strip markdown fences, keeping their contents
    text = text.replace("```sql", "").replace("```", "");

    let start = sql_statement()
        .find(&text)
        .ok_or_else(|| SqlScoutError::Parse(format!("no SQL statement in completion: {:?}", completion.trim())))?
        .start();
    let statement = &text[start..];

    // Cut at the terminating semicolon, or at the first blank line of
    // trailing prose.
    let statement = match statement.find(';') {
        Some(i) => &statement[..i],
        None => statement.split("\n\n").next().unwrap_or(statement),
    };

    let sql = statement.trim().to_string();
    if sql.is_empty() {
        return Err(SqlScoutError::Parse("empty SQL statement".to_string()));
    }
    Ok(sql)
}
