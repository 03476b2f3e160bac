//! Query session bookkeeping
//!
//! A `QuerySession` records one question's journey through the correction
//! loop: the schema context it was grounded in, every executed attempt in
//! order, and the terminal outcome. Sessions are created per question and
//! discarded after the response is returned.

use crate::catalog::SchemaEntry;
use crate::db::ResultSet;
use serde::{Deserialize, Serialize};

/// Outcome of one executed attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Success,
    Error(String),
}

/// One generated statement and what happened to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAttempt {
    /// 1-based, strictly increasing within a session
    pub attempt_number: usize,
    pub generated_sql: String,
    pub outcome: AttemptOutcome,
    /// Result rows on success
    pub rows: Option<ResultSet>,
}

/// Terminal state of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Verified answer backed by executed rows
    Answered { sql: String, rows: ResultSet },
    /// Retry budget spent; history plus last error for diagnostics
    Exhausted { last_error: String },
    /// Non-retryable infrastructure failure, reported immediately
    Aborted { error: String },
}

/// One question's pass through the generation-execution-correction loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySession {
    pub question: String,
    /// Schema entries the synthesis was grounded in; empty means "no
    /// grounding found" and the full catalog was used instead
    pub retrieved_context: Vec<SchemaEntry>,
    pub attempts: Vec<QueryAttempt>,
    pub outcome: Option<SessionOutcome>,
}

impl QuerySession {
    pub fn new(question: &str, retrieved_context: Vec<SchemaEntry>) -> Self {
        Self {
            question: question.to_string(),
            retrieved_context,
            attempts: Vec::new(),
            outcome: None,
        }
    }

    /// Whether this exact SQL text was already attempted in this session
    pub fn has_attempted(&self, sql: &str) -> bool {
        self.attempts.iter().any(|a| a.generated_sql == sql)
    }

    /// Append an executed attempt. Duplicate SQL text is never recorded;
    /// the loop refuses to execute it in the first place.
    pub fn record(&mut self, sql: String, outcome: AttemptOutcome, rows: Option<ResultSet>) {
        debug_assert!(!self.has_attempted(&sql));
        let attempt_number = self.attempts.len() + 1;
        self.attempts.push(QueryAttempt {
            attempt_number,
            generated_sql: sql,
            outcome,
            rows,
        });
    }

    /// The last executed attempt, if any
    pub fn last_attempt(&self) -> Option<&QueryAttempt> {
        self.attempts.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_numbers_increase() {
        let mut session = QuerySession::new("q", Vec::new());
        session.record("SELECT 1".into(), AttemptOutcome::Error("x".into()), None);
        session.record("SELECT 2".into(), AttemptOutcome::Success, None);

        let numbers: Vec<_> = session.attempts.iter().map(|a| a.attempt_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_detection() {
        let mut session = QuerySession::new("q", Vec::new());
        session.record("SELECT 1".into(), AttemptOutcome::Success, None);
        assert!(session.has_attempted("SELECT 1"));
        assert!(!session.has_attempted("SELECT 2"));
    }
}
