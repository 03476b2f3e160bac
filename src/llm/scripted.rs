//! Scripted completion provider
//!
//! Returns canned responses in order and records every prompt it receives.
//! The model call is inherently non-deterministic, so retry and termination
//! logic is tested against this provider rather than live output.

use crate::error::{Result, SqlScoutError};
use crate::llm::CompletionProvider;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion provider that replays a fixed script of responses
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }

    /// Number of scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("script poisoned").len()
    }
}

impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());

        self.responses
            .lock()
            .expect("script poisoned")
            .pop_front()
            .ok_or_else(|| SqlScoutError::Completion("scripted responses exhausted".to_string()))
    }
}
