//! Language model clients
//!
//! [`LlmClient`] decouples the executor from any provider. The bundled
//! [`OpenAiClient`] speaks the OpenAI chat-completions protocol, which most
//! hosted and local model servers also implement.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;
use crate::tool::ToolDefinition;

/// Abstraction over one chat completion round-trip
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete `messages`, offering `tools` to the model
    ///
    /// Returns the assistant message, which may request tool calls.
    async fn complete(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message>;
}

#[cfg(feature = "openai")]
pub use openai::{OpenAiClient, OpenAiConfig};

#[cfg(feature = "openai")]
mod openai {
    use std::time::Duration;

    use async_trait::async_trait;
    use lit_agentkit_core::config::{Credentials, LlmSettings};
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tracing::{debug, instrument};

    use super::LlmClient;
    use crate::error::{AgentError, Result};
    use crate::message::Message;
    use crate::tool::ToolDefinition;

    /// OpenAI client configuration
    #[derive(Clone)]
    pub struct OpenAiConfig {
        /// API key
        pub api_key: String,
        /// API base URL, without trailing slash
        pub base_url: String,
        /// Model name
        pub model: String,
        /// Request timeout
        pub timeout: Duration,
    }

    impl OpenAiConfig {
        /// Build from settings and the key in `credentials`
        pub fn from_settings(settings: &LlmSettings, credentials: &Credentials) -> Result<Self> {
            Ok(Self {
                api_key: credentials.require_openai_api_key()?.to_string(),
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                model: settings.model.clone(),
                timeout: settings.timeout(),
            })
        }
    }

    impl std::fmt::Debug for OpenAiConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("OpenAiConfig")
                .field("base_url", &self.base_url)
                .field("model", &self.model)
                .field("timeout", &self.timeout)
                .finish()
        }
    }

    #[derive(Debug, Deserialize)]
    struct CompletionResponse {
        choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    struct Choice {
        message: Message,
    }

    /// Chat-completions client
    pub struct OpenAiClient {
        http: reqwest::Client,
        config: OpenAiConfig,
    }

    impl OpenAiClient {
        /// Create a client
        pub fn new(config: OpenAiConfig) -> Result<Self> {
            let http = reqwest::Client::builder().timeout(config.timeout).build()?;
            Ok(Self { http, config })
        }

        /// Model name
        pub fn model(&self) -> &str {
            &self.config.model
        }

        pub(crate) fn request_body(&self, messages: &[Message], tools: &[ToolDefinition]) -> Value {
            let mut body = json!({
                "model": self.config.model,
                "messages": messages,
            });
            if !tools.is_empty() {
                body["tools"] = Value::Array(tools.iter().map(ToolDefinition::to_openai).collect());
            }
            body
        }
    }

    #[async_trait]
    impl LlmClient for OpenAiClient {
        #[instrument(skip_all, fields(model = %self.config.model, messages = messages.len()))]
        async fn complete(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
            let url = format!("{}/chat/completions", self.config.base_url);
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&self.request_body(messages, tools))
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;
            if !status.is_success() {
                return Err(AgentError::llm(format!("{} returned {}: {}", url, status, text)));
            }

            let completion: CompletionResponse = serde_json::from_str(&text)?;
            let message = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| AgentError::llm("completion returned no choices"))?;

            match message {
                Message::Assistant { .. } => {
                    debug!("Model requested {} tool calls", message.tool_calls().len());
                    Ok(message)
                }
                other => Err(AgentError::llm(format!(
                    "expected assistant message, got {:?}",
                    other
                ))),
            }
        }
    }

}
