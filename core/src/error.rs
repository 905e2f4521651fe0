//! Error types for the Lit AgentKit core library
//!
//! This module defines the error hierarchy shared by the wallet provider,
//! the Lit remote client and the action providers. Errors fall into four
//! groups: configuration problems found at startup, validation failures
//! raised before any remote call, remote/transport failures, and local
//! serialization issues.

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Lit AgentKit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variable is absent
    #[error("{0} not found in environment variables")]
    MissingEnv(String),

    /// Private key could not be decoded
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Address failed checksum conversion
    #[error("Invalid Ethereum address: {0}")]
    InvalidAddress(String),

    /// Amount is not a positive number
    #[error("Invalid amount: {0}. Must be a positive number.")]
    InvalidAmount(String),

    /// Tool arguments did not match the declared schema
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// Parse failure description
        reason: String,
    },

    /// Remote Lit tool is not registered for the network
    #[error("{name} tool not found for network {network}")]
    ToolNotFound {
        /// Logical tool name
        name: String,
        /// Lit network name
        network: String,
    },

    /// Lit bridge returned an error or an unexpected payload
    #[error("Lit error: {0}")]
    Lit(String),

    /// ERC-20 transfer failed remotely
    #[error("Failed to execute transfer: {0}")]
    TransferFailed(String),

    /// JSON-RPC error returned by an EVM node
    #[error("RPC error: {0}")]
    Rpc(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Lit error
    pub fn lit(msg: impl Into<String>) -> Self {
        Self::Lit(msg.into())
    }

    /// Create a new RPC error
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Check if error was raised by input validation, before any remote call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_)
                | Self::InvalidAmount(_)
                | Self::InvalidArguments { .. }
                | Self::ToolNotFound { .. }
        )
    }

    /// Check if error comes from configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingEnv(_) | Self::InvalidKey(_)
        )
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidKey(format!("Hex decoding error: {}", err))
    }
}
