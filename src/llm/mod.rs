//! Language-model completion capability
//!
//! The rest of the crate consumes the model through one opaque contract:
//! `complete(prompt) -> text`. Remote keyed APIs and local OpenAI-compatible
//! servers are treated uniformly behind it; tests script it.

pub mod openai;
pub mod scripted;

pub use openai::OpenAiProvider;
pub use scripted::ScriptedProvider;

use crate::error::{Result, SqlScoutError};
use std::future::Future;
use std::time::Duration;

/// Opaque text-completion capability
pub trait CompletionProvider {
    /// Single completion call for a fully rendered prompt
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Run one completion under a time bound. A call exceeding the bound is
/// reported as `Timeout`, which the correction loop treats like any other
/// retryable failure.
pub async fn complete_with_timeout<P: CompletionProvider>(
    provider: &P,
    prompt: &str,
    timeout: Duration,
) -> Result<String> {
    match tokio::time::timeout(timeout, provider.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(SqlScoutError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowProvider;

    impl CompletionProvider for SlowProvider {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_maps_to_timeout_error() {
        let result =
            complete_with_timeout(&SlowProvider, "prompt", Duration::from_millis(50)).await;
        match result {
            Err(SqlScoutError::Timeout(_)) => (),
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let provider = ScriptedProvider::new(vec!["SELECT 1".to_string()]);
        let result = complete_with_timeout(&provider, "prompt", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result, "SELECT 1");
    }
}
