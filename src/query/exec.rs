//! Execution & Correction Loop
//!
//! State machine: Synthesizing -> Executing -> {Succeeded, Retrying,
//! Exhausted, Aborted}. Parse failures, execution errors, and timeouts all
//! consume the same retry budget; infrastructure failures abort immediately
//! without consuming it. The full attempt history survives in the session so
//! the orchestrator can explain a failure instead of hiding it.

use crate::catalog::SchemaEntry;
use crate::db::Database;
use crate::error::{Result, SqlScoutError};
use crate::llm::CompletionProvider;
use crate::query::session::{AttemptOutcome, QuerySession, SessionOutcome};
use crate::query::synthesizer::{FailedAttempt, QuerySynthesizer};

/// Bounded generation-execution-correction loop
pub struct ExecutionLoop {
    synthesizer: QuerySynthesizer,
    max_attempts: usize,
}

impl ExecutionLoop {
    pub fn new(synthesizer: QuerySynthesizer, max_attempts: usize) -> Self {
        Self {
            synthesizer,
            max_attempts,
        }
    }

    /// Run one question to a terminal state. The returned session always has
    /// an outcome; `Aborted` carries the infrastructure error that caused it.
    pub async fn run<P: CompletionProvider>(
        &self,
        provider: &P,
        db: &mut Database,
        question: &str,
        context: Vec<SchemaEntry>,
    ) -> Result<QuerySession> {
        let mut session = QuerySession::new(question, context);
        let mut failures: Vec<FailedAttempt> = Vec::new();

        for budget_used in 1..=self.max_attempts {
            log::info!("Attempt {} of {}", budget_used, self.max_attempts);

            // Synthesizing
            let sql = match self
                .synthesizer
                .synthesize(provider, question, &session.retrieved_context, &failures)
                .await
            {
                Ok(sql) => sql,
                Err(e) if e.is_retryable() => {
                    log::warn!("Synthesis failed: {}", e);
                    failures.push(FailedAttempt {
                        sql: String::new(),
                        error: e.to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    session.outcome = Some(SessionOutcome::Aborted { error: e.to_string() });
                    return Ok(session);
                }
            };

            // Never execute the same statement twice in one session; ask for
            // a different one instead.
            if session.has_attempted(&sql) {
                log::warn!("Duplicate statement generated, not re-executing: {}", sql);
                failures.push(FailedAttempt {
                    sql: sql.clone(),
                    error: "this exact statement was already attempted and failed; \
                            generate a different corrected query"
                        .to_string(),
                });
                continue;
            }

            // Executing
            match db.execute_query(&sql) {
                Ok(rows) => {
                    session.record(sql.clone(), AttemptOutcome::Success, Some(rows.clone()));
                    session.outcome = Some(SessionOutcome::Answered { sql, rows });
                    return Ok(session);
                }
                Err(SqlScoutError::Infrastructure(message)) => {
                    log::error!("Infrastructure failure, aborting session: {}", message);
                    session.record(sql, AttemptOutcome::Error(message.clone()), None);
                    session.outcome = Some(SessionOutcome::Aborted { error: message });
                    return Ok(session);
                }
                Err(e) => {
                    let message = e.to_string();
                    log::warn!("Execution failed: {}", message);
                    session.record(sql.clone(), AttemptOutcome::Error(message.clone()), None);
                    failures.push(FailedAttempt { sql, error: message });
                }
            }
        }

        let last_error = failures
            .last()
            .map(|f| f.error.clone())
            .unwrap_or_else(|| "retry budget exhausted".to_string());
        session.outcome = Some(SessionOutcome::Exhausted { last_error });
        Ok(session)
    }
}
