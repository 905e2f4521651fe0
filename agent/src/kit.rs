//! Tool registry binding action providers to a wallet
//!
//! `AgentKit` resolves every provider's actions at startup into a name
//! keyed table. The executor looks tools up by name when the model calls
//! them.

use std::collections::BTreeMap;
use std::sync::Arc;

use lit_agentkit_core::WalletProvider;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::tool::{ActionProvider, ToolDefinition};

/// Inputs for building an [`AgentKit`]
pub struct AgentKitConfig {
    /// Wallet handed to every action
    pub wallet_provider: Arc<dyn WalletProvider>,
    /// Providers whose actions become tools
    pub action_providers: Vec<Arc<dyn ActionProvider>>,
}

struct RegisteredAction {
    provider: Arc<dyn ActionProvider>,
    definition: ToolDefinition,
}

/// Registry of callable tools
pub struct AgentKit {
    wallet: Arc<dyn WalletProvider>,
    actions: BTreeMap<String, RegisteredAction>,
}

impl AgentKit {
    /// Register the actions of every provider that supports the wallet network
    pub fn new(config: AgentKitConfig) -> Result<Self> {
        let network = config.wallet_provider.network();
        let mut actions = BTreeMap::new();

        for provider in config.action_providers {
            if !provider.supports_network(&network) {
                warn!(
                    "Skipping action provider {}: network {} not supported",
                    provider.name(),
                    network
                );
                continue;
            }

            for definition in provider.actions() {
                let name = definition.name.clone();
                if actions.contains_key(&name) {
                    return Err(AgentError::DuplicateTool(name));
                }
                debug!("Registered tool {} from {}", name, provider.name());
                actions.insert(
                    name,
                    RegisteredAction {
                        provider: Arc::clone(&provider),
                        definition,
                    },
                );
            }
        }

        info!("AgentKit ready with {} tools", actions.len());
        Ok(Self {
            wallet: config.wallet_provider,
            actions,
        })
    }

    /// Wallet provider shared by all tools
    pub fn wallet_provider(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    /// Tool definitions, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.actions
            .values()
            .map(|action| action.definition.clone())
            .collect()
    }

    /// Registered tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Run the tool `name` with raw JSON arguments
    pub async fn invoke(&self, name: &str, args: Value) -> Result<String> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        let output = action
            .provider
            .invoke(name, self.wallet.as_ref(), args)
            .await?;
        Ok(output)
    }
}
