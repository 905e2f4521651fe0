//! Configuration management for the Lit AgentKit chatbot
//!
//! Configuration is assembled once at process start from the following
//! sources, highest priority first:
//! 1. Command line arguments (applied by the CLI)
//! 2. Environment variables (`EVM_PRIVATE_KEY`, `OPENAI_API_KEY`, optionally
//!    loaded from a `.env` file)
//! 3. Configuration file (YAML/JSON)
//! 4. Default values
//!
//! The resulting [`AppConfig`] and [`Credentials`] are passed by reference
//! into every component constructor.
//!
//! # Example
//!
//! ```no_run
//! use lit_agentkit_core::config::{AppConfig, Credentials};
//!
//! let config = AppConfig::builder()
//!     .with_chain_id(8453)
//!     .with_lit_bridge_url("http://localhost:3092")
//!     .build();
//!
//! let credentials = Credentials::from_env()?;
//! # Ok::<(), lit_agentkit_core::Error>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::catalog::RemoteTool;
use crate::error::{Error, Result};

/// Environment variable holding the EVM private key
pub const PRIVATE_KEY_ENV: &str = "EVM_PRIVATE_KEY";

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language model settings
    pub llm: LlmSettings,
    /// Lit network settings
    pub lit: LitSettings,
    /// Wallet provider settings
    pub wallet: WalletSettings,
    /// Conversation driver settings
    pub agent: AgentSettings,
    /// Pyth price service settings
    pub pyth: PythSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Lit network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LitSettings {
    /// URL of the Lit SDK bridge server
    pub bridge_url: String,
    /// Network used for inline Lit Actions
    pub action_network: String,
    /// Network used by the agent wallet tools
    pub agent_wallet_network: String,
    /// Enable SDK debug logging on the bridge
    pub debug: bool,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Registered remote tools (IPFS-pinned Lit Actions)
    pub tools: Vec<RemoteTool>,
}

/// Pyth Hermes price service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PythSettings {
    /// Base URL of the Hermes API
    pub hermes_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Wallet provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletSettings {
    /// EVM chain id
    pub chain_id: u64,
    /// JSON-RPC endpoint for the chain
    pub rpc_url: String,
}

/// Conversation driver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Conversation thread used by the checkpointer
    pub thread_id: String,
    /// Seconds between autonomous iterations
    pub interval_seconds: u64,
    /// Maximum model/tool steps per request
    pub recursion_limit: usize,
    /// Override for the system prompt
    pub system_prompt: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level (default, keeps chat output readable)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_seconds: 120,
        }
    }
}

impl Default for LitSettings {
    fn default() -> Self {
        Self {
            bridge_url: "http://localhost:3092".to_string(),
            action_network: "datil-test".to_string(),
            agent_wallet_network: "datil-dev".to_string(),
            debug: true,
            timeout_seconds: 120,
            tools: Vec::new(),
        }
    }
}

impl Default for PythSettings {
    fn default() -> Self {
        Self {
            hermes_url: "https://hermes.pyth.network".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl LlmSettings {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl LitSettings {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl PythSettings {
    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            chain_id: 84532, // Base Sepolia
            rpc_url: "https://sepolia.base.org".to_string(),
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            thread_id: "EVM Agentkit Chatbot Example!".to_string(),
            interval_seconds: 10,
            recursion_limit: 25,
            system_prompt: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse YAML config: {}", e)))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse JSON config: {}", e)))
    }

    /// Load configuration from a file (auto-detects format by extension)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(Error::config(format!(
                "Unsupported config file format: {}. Supported: .yaml, .yml, .json",
                extension
            ))),
        }
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::config(format!("Failed to serialize config to YAML: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::config(format!("Failed to write config file: {}", e)))
    }

    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lit-agentkit")
            .join("config.yaml")
    }

    /// Autonomous iteration interval as Duration
    pub fn autonomous_interval(&self) -> Duration {
        Duration::from_secs(self.agent.interval_seconds)
    }
}

impl LogLevel {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Secrets read from the process environment
///
/// The private key authenticates to the Lit bridge and derives the acting
/// account. It is zeroized on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct Credentials {
    private_key: Zeroizing<String>,
    openai_api_key: Option<Zeroizing<String>>,
}

impl Credentials {
    /// Build credentials from explicit values
    pub fn new(private_key: impl Into<String>, openai_api_key: Option<String>) -> Self {
        Self {
            private_key: Zeroizing::new(private_key.into()),
            openai_api_key: openai_api_key.map(Zeroizing::new),
        }
    }

    /// Read credentials from the environment, loading `.env` first if present
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; real environment variables still apply.
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = lookup(PRIVATE_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::MissingEnv(PRIVATE_KEY_ENV.to_string()))?;
        let openai_api_key = lookup(OPENAI_API_KEY_ENV).filter(|value| !value.trim().is_empty());

        Ok(Self::new(private_key, openai_api_key))
    }

    /// EVM private key (hex)
    pub fn private_key(&self) -> &str {
        self.private_key.as_str()
    }

    /// OpenAI API key, if set
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_ref().map(|key| key.as_str())
    }

    /// OpenAI API key or a configuration error
    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key()
            .ok_or_else(|| Error::MissingEnv(OPENAI_API_KEY_ENV.to_string()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Builder for AppConfig with fluent interface
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set the LLM model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.llm.model = model.into();
        self
    }

    /// Set the LLM API base URL
    pub fn with_llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.llm.base_url = url.into();
        self
    }

    /// Set the Lit bridge URL
    pub fn with_lit_bridge_url(mut self, url: impl Into<String>) -> Self {
        self.config.lit.bridge_url = url.into();
        self
    }

    /// Register a remote tool
    pub fn with_remote_tool(mut self, tool: RemoteTool) -> Self {
        self.config.lit.tools.push(tool);
        self
    }

    /// Set the EVM chain id
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.config.wallet.chain_id = chain_id;
        self
    }

    /// Set the EVM JSON-RPC URL
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.wallet.rpc_url = url.into();
        self
    }

    /// Set the Pyth Hermes API URL
    pub fn with_hermes_url(mut self, url: impl Into<String>) -> Self {
        self.config.pyth.hermes_url = url.into();
        self
    }

    /// Set the autonomous interval in seconds
    pub fn with_interval_seconds(mut self, seconds: u64) -> Self {
        self.config.agent.interval_seconds = seconds;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
