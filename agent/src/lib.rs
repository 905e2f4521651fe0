//! Lit AgentKit Agent Framework
//!
//! This library turns action providers into tools a language model can
//! call, and runs the model/tool loop that drives the chatbot.
//!
//! # Features
//!
//! - **Action Providers**: Plugins exposing schema-typed actions
//! - **AgentKit**: Name-keyed tool registry bound to a wallet provider
//! - **LLM Clients**: Provider-agnostic trait, OpenAI-compatible client
//!   behind the `openai` feature
//! - **ReAct Executor**: Lazily streamed agent and tool steps
//! - **Memory**: Per-thread conversation history
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use lit_agentkit_agent::prelude::*;
//! use lit_agentkit_core::{AppConfig, Credentials, EthAccountWalletProvider};
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let credentials = Credentials::from_env()?;
//!     let wallet = Arc::new(EthAccountWalletProvider::new(&credentials, &config.wallet)?);
//!
//!     let kit = AgentKit::new(AgentKitConfig {
//!         wallet_provider: wallet,
//!         action_providers: vec![],
//!     })?;
//!     let llm = Arc::new(OpenAiClient::new(OpenAiConfig::from_settings(&config.llm, &credentials)?)?);
//!     let agent = ReactAgent::new(llm, kit);
//!
//!     let run = RunConfig::new("example");
//!     let mut chunks = agent.stream(vec![Message::user("Hello!")], &run);
//!     while let Some(chunk) = chunks.next().await {
//!         println!("{}", chunk?.first_content().unwrap_or(""));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod error;
pub mod executor;
pub mod kit;
pub mod llm;
pub mod memory;
pub mod message;
pub mod tool;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use error::{AgentError, Result};
pub use executor::{AgentExecutor, ReactAgent, RunConfig, StreamChunk};
pub use kit::{AgentKit, AgentKitConfig};
pub use llm::LlmClient;
pub use memory::MemorySaver;
pub use message::{FunctionCall, Message, ToolCall};
pub use tool::{parse_args, schema_for, ActionProvider, ToolDefinition};

#[cfg(feature = "openai")]
pub use llm::{OpenAiClient, OpenAiConfig};

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        ActionProvider, AgentError, AgentExecutor, AgentKit, AgentKitConfig, LlmClient,
        MemorySaver, Message, ReactAgent, Result, RunConfig, StreamChunk, ToolCall,
        ToolDefinition,
    };

    #[cfg(feature = "openai")]
    pub use super::{OpenAiClient, OpenAiConfig};
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "lit-agentkit-agent";
