//! SQL synthesis and the execution & correction loop

pub mod exec;
pub mod session;
pub mod synthesizer;

pub use exec::ExecutionLoop;
pub use session::{AttemptOutcome, QueryAttempt, QuerySession, SessionOutcome};
pub use synthesizer::{extract_sql, FailedAttempt, QuerySynthesizer};
