//! Error types for the agent framework

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent framework error
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Error raised by the core library (config, validation, remote calls)
    #[error(transparent)]
    Core(#[from] lit_agentkit_core::Error),

    /// Language model returned an error or an unusable response
    #[error("LLM error: {0}")]
    Llm(String),

    /// HTTP transport error
    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No registered tool has this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Two providers registered the same tool name
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Step budget ran out before the model produced a final answer
    #[error("Recursion limit of {0} reached without a final answer")]
    RecursionLimit(usize),
}

impl AgentError {
    /// Create a new LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }
}
