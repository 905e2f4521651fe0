//! Lit AgentKit Core Library
//!
//! This library provides the building blocks shared by the Lit AgentKit
//! chatbot: configuration, the EVM wallet provider, input validation and the
//! client for the Lit decentralized signing/execution network.
//!
//! # Features
//!
//! - **Configuration**: YAML/JSON config files plus environment credentials
//! - **Wallet Provider**: Account derived from a local private key
//! - **Validation**: EIP-55 checksum addresses and positive amounts
//! - **Lit Client**: Session signatures and Lit Action execution
//! - **Tool Catalog**: IPFS-pinned agent wallet tools per Lit network
//!
//! # Quick Start
//!
//! ```no_run
//! use lit_agentkit_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let credentials = Credentials::from_env()?;
//!
//!     let lit = HttpLitClient::connect(
//!         LitClientConfig::from_settings(&config.lit, "datil-test"),
//!         credentials.private_key(),
//!     )
//!     .await?;
//!
//!     let sigs = lit
//!         .get_session_sigs(&SessionSigsRequest::lit_action_execution())
//!         .await?;
//!     println!("received {} session signatures", sigs.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod lit;
pub mod rpc;
pub mod session;
pub mod validation;
pub mod wallet;

// Re-exports for convenience
pub use catalog::{RemoteTool, ToolCatalog};
pub use config::{AppConfig, Credentials};
pub use error::{Error, Result};
pub use lit::{ExecuteJsRequest, ExecuteJsResponse, HttpLitClient, LitClient, LitClientConfig};
pub use session::{SessionSigs, SessionSigsRequest};
pub use wallet::{EthAccountWalletProvider, Network, WalletProvider};

pub use alloy_primitives::U256;

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        AppConfig, Credentials, Error, EthAccountWalletProvider, ExecuteJsRequest,
        ExecuteJsResponse, HttpLitClient, LitClient, LitClientConfig, Network, RemoteTool,
        Result, SessionSigs, SessionSigsRequest, ToolCatalog, WalletProvider,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "lit-agentkit-core";
