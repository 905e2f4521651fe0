//! Action Providers for Lit AgentKit
//!
//! This library exposes Lit Protocol capabilities and read-only chain data
//! as agent tools. Every provider validates its typed arguments first; the
//! Lit providers then obtain fresh session signatures and run a Lit Action on
//! the Lit network.
//!
//! # Features
//!
//! - **Lit Actions**: Run an inline JavaScript Lit Action
//! - **Agent Wallet**: ERC-20 transfers through an IPFS-pinned transfer tool
//! - **Wallet Details**: Address, network and native balance of the agent
//! - **ERC-20**: Token balances of the agent wallet
//! - **Pyth**: Price feed ids and latest prices from the Hermes API
//!
//! # Quick Start
//!
//! ```no_run
//! use lit_agentkit_actions::prelude::*;
//! use lit_agentkit_core::{AppConfig, Credentials};
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let credentials = Credentials::from_env()?;
//!
//!     let lit = LitActionProvider::connect(&config, &credentials).await?;
//!     let reply = lit
//!         .execute_lit_action(LitActionArgs { magic_number: 42 })
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! # Supported Networks
//!
//! Lit Actions run on `datil-test` by default and agent wallet tools are
//! looked up on `datil-dev`. Both are configurable under `lit:` in the
//! configuration file.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

pub mod agent_wallet;
pub mod erc20;
pub mod lit_action;
pub mod pyth;
pub mod wallet;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use agent_wallet::{
    Erc20TransferArgs, LitAgentWalletProvider, TransferParams, TransferPolicy, ValidatedTransfer,
};
pub use erc20::{Erc20ActionProvider, GetBalanceArgs};
pub use lit_action::{LitActionArgs, LitActionProvider};
pub use pyth::{FetchPriceArgs, FetchPriceFeedIdArgs, PythActionProvider};
pub use wallet::{GetWalletDetailsArgs, WalletActionProvider};

/// Prelude module for easy importing of common types
pub mod prelude {
    pub use super::{
        Erc20ActionProvider, Erc20TransferArgs, LitActionArgs, LitActionProvider,
        LitAgentWalletProvider, PythActionProvider, TransferParams, TransferPolicy,
        WalletActionProvider,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name
pub const NAME: &str = "lit-agentkit-actions";
