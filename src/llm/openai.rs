//! OpenAI-compatible completion provider
//!
//! Works against the OpenAI API and any OpenAI-compatible endpoint
//! (e.g. Ollama at "http://localhost:11434/v1") via an optional base URL.

use crate::config::LlmConfig;
use crate::error::{Result, SqlScoutError};
use crate::llm::CompletionProvider;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};

/// Completion provider backed by an OpenAI-compatible chat endpoint
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u16,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() && config.base_url.is_none() {
            return Err(SqlScoutError::Config(
                "an API key or a base URL for a local endpoint is required".to_string(),
            ));
        }

        let openai_config = if let Some(base_url) = &config.base_url {
            OpenAIConfig::new()
                .with_api_key(&config.api_key)
                .with_api_base(base_url)
        } else {
            OpenAIConfig::new().with_api_key(&config.api_key)
        };

        log::info!(
            "Completion provider: model '{}' via {}",
            config.model,
            config.base_url.as_deref().unwrap_or("api.openai.com")
        );

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt.to_string()),
                name: None,
            },
        )];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| SqlScoutError::Completion(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SqlScoutError::Completion(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .ok_or_else(|| {
                log::error!("No content in chat response: {:?}", response);
                SqlScoutError::Completion("no content in response".to_string())
            })?;

        Ok(content.clone())
    }
}
