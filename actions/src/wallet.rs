//! Wallet details action

use alloy_primitives::utils::format_ether;
use async_trait::async_trait;
use lit_agentkit_agent::{parse_args, ActionProvider, ToolDefinition};
use lit_agentkit_core::{Error, Result, WalletProvider};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

/// Provider name
pub const WALLET_PROVIDER: &str = "wallet";

/// Action name
pub const GET_WALLET_DETAILS: &str = "get_wallet_details";

/// `get_wallet_details` takes no arguments
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetWalletDetailsArgs {}

/// Reports the acting wallet's address, network and native balance
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletActionProvider;

impl WalletActionProvider {
    /// Create the provider
    pub fn new() -> Self {
        Self
    }

    /// Describe `wallet`
    pub async fn get_wallet_details(&self, wallet: &dyn WalletProvider) -> Result<String> {
        let network = wallet.network();
        let balance = wallet.get_balance().await?;

        Ok(format!(
            "Wallet Details:\n\
             - Provider: {}\n\
             - Address: {}\n\
             - Network:\n\
             \x20 * Protocol Family: {}\n\
             \x20 * Network ID: {}\n\
             \x20 * Chain ID: {}\n\
             - Native Balance: {} wei ({} ETH)",
            wallet.name(),
            wallet.address(),
            network.protocol_family,
            network.network_id.as_deref().unwrap_or("N/A"),
            network.chain_id,
            balance,
            format_ether(balance),
        ))
    }
}

#[async_trait]
impl ActionProvider for WalletActionProvider {
    fn name(&self) -> &str {
        WALLET_PROVIDER
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new::<GetWalletDetailsArgs>(
            GET_WALLET_DETAILS,
            "Get details about the connected wallet: address, network and native balance",
        )]
    }

    async fn invoke(&self, action: &str, wallet: &dyn WalletProvider, args: Value) -> Result<String> {
        match action {
            GET_WALLET_DETAILS => {
                let args = if args.is_null() { Value::Object(Default::default()) } else { args };
                let _: GetWalletDetailsArgs = parse_args(action, args)?;
                self.get_wallet_details(wallet).await
            }
            other => Err(Error::config(format!(
                "{} has no action named {}",
                WALLET_PROVIDER, other
            ))),
        }
    }
}
