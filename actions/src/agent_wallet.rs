//! ERC-20 transfers through the Lit agent wallet
//!
//! The transfer itself is performed by a pre-registered Lit Action pinned to
//! IPFS. This provider validates the request, describes it as a transfer
//! policy and parameter bundle, and asks the Lit network to run the pinned
//! action. Calls are not idempotent: repeating a request sends a second
//! transfer.

use std::sync::Arc;

use async_trait::async_trait;
use lit_agentkit_agent::{parse_args, ActionProvider, ToolDefinition};
use lit_agentkit_core::catalog::{RemoteTool, ToolCatalog, ERC20_TRANSFER_TOOL};
use lit_agentkit_core::config::{AppConfig, Credentials};
use lit_agentkit_core::validation::{validate_address, validate_amount};
use lit_agentkit_core::{
    Error, ExecuteJsRequest, ExecuteJsResponse, HttpLitClient, LitClient, LitClientConfig,
    Result, SessionSigsRequest, WalletProvider,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

/// Provider name
pub const LIT_AGENT_WALLET_PROVIDER: &str = "lit-agent-wallet-provider";

/// Action name
pub const EXECUTE_ERC20_TRANSFER: &str = "execute-erc20-transfer";

/// Policy version understood by the transfer tool
pub const POLICY_VERSION: &str = "1.0.0";

fn default_decimals() -> u32 {
    18
}

/// Arguments of `execute-erc20-transfer`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct Erc20TransferArgs {
    /// Address of the PKP (programmable key pair) sending the tokens
    pub pkp_eth_address: String,
    /// ERC-20 token contract address
    pub token_address: String,
    /// Recipient address
    pub recipient_address: String,
    /// Amount in whole tokens, as a decimal string
    pub amount: String,
    /// JSON-RPC URL of the chain
    pub rpc_url: String,
    /// EVM chain id
    pub chain_id: u64,
    /// Token decimals
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

/// Transfer request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    /// Checksummed sender address
    pub pkp_eth_address: String,
    /// Checksummed token address
    pub token_address: String,
    /// Checksummed recipient address
    pub recipient_address: String,
    /// Amount exactly as supplied
    pub amount: String,
    /// EVM chain id
    pub chain_id: u64,
    /// JSON-RPC URL
    pub rpc_url: String,
    /// Token decimals
    pub decimals: u32,
}

impl Erc20TransferArgs {
    /// Validate addresses, then the amount
    pub fn validate(&self) -> Result<ValidatedTransfer> {
        let pkp_eth_address = validate_address(&self.pkp_eth_address)?;
        let token_address = validate_address(&self.token_address)?;
        let recipient_address = validate_address(&self.recipient_address)?;
        let amount = validate_amount(&self.amount)?;

        Ok(ValidatedTransfer {
            pkp_eth_address,
            token_address,
            recipient_address,
            amount,
            chain_id: self.chain_id,
            rpc_url: self.rpc_url.clone(),
            decimals: self.decimals,
        })
    }
}

/// Constraints attached to a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPolicy {
    /// Policy type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Policy schema version
    pub version: String,
    /// Token decimals, as a string
    pub erc20_decimals: String,
    /// Maximum amount per transfer
    pub max_amount: String,
    /// Tokens the wallet may send
    pub allowed_tokens: Vec<String>,
    /// Addresses the wallet may pay
    pub allowed_recipients: Vec<String>,
}

/// Parameters consumed by the transfer Lit Action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    /// Sender PKP address
    pub pkp_eth_address: String,
    /// Token contract
    pub token_in: String,
    /// Recipient
    pub recipient_address: String,
    /// Amount
    pub amount_in: String,
    /// Chain id, as a string
    pub chain_id: String,
    /// JSON-RPC URL
    pub rpc_url: String,
}

impl ValidatedTransfer {
    /// Policy allowing exactly this transfer
    pub fn policy(&self) -> TransferPolicy {
        TransferPolicy {
            kind: ERC20_TRANSFER_TOOL.to_string(),
            version: POLICY_VERSION.to_string(),
            erc20_decimals: self.decimals.to_string(),
            max_amount: self.amount.clone(),
            allowed_tokens: vec![self.token_address.clone()],
            allowed_recipients: vec![self.recipient_address.clone()],
        }
    }

    /// Parameter bundle for the Lit Action
    pub fn params(&self) -> TransferParams {
        TransferParams {
            pkp_eth_address: self.pkp_eth_address.clone(),
            token_in: self.token_address.clone(),
            recipient_address: self.recipient_address.clone(),
            amount_in: self.amount.clone(),
            chain_id: self.chain_id.to_string(),
            rpc_url: self.rpc_url.clone(),
        }
    }

    /// `jsParams` payload: `{"params": {...}}`
    pub fn js_params(&self) -> Value {
        json!({ "params": self.params() })
    }
}

/// Action provider for ERC-20 transfers via the Lit agent wallet
pub struct LitAgentWalletProvider {
    client: Arc<dyn LitClient>,
    tool: RemoteTool,
}

impl LitAgentWalletProvider {
    /// Create a provider, resolving the transfer tool for `network`
    pub fn new(client: Arc<dyn LitClient>, catalog: &ToolCatalog, network: &str) -> Result<Self> {
        let tool = catalog.require(ERC20_TRANSFER_TOOL, network)?.clone();
        debug!(
            "Agent wallet tools available: {}",
            catalog.available_tool_names().join(", ")
        );
        Ok(Self { client, tool })
    }

    /// Connect a bridge client on the configured agent wallet network
    pub async fn connect(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let network = config.lit.agent_wallet_network.as_str();
        let catalog = ToolCatalog::new(config.lit.tools.clone());
        // Fail on a missing registration before opening a connection.
        catalog.require(ERC20_TRANSFER_TOOL, network)?;

        let client_config = LitClientConfig::from_settings(&config.lit, network);
        let client = HttpLitClient::connect(client_config, credentials.private_key()).await?;
        Self::new(Arc::new(client), &catalog, network)
    }

    /// Remote tool executed by this provider
    pub fn tool(&self) -> &RemoteTool {
        &self.tool
    }

    /// Validate and execute a transfer, returning the raw Lit result as JSON
    #[instrument(skip(self, args), fields(cid = %self.tool.ipfs_cid))]
    pub async fn execute_erc20_transfer(&self, args: Erc20TransferArgs) -> Result<String> {
        let transfer = args.validate()?;
        debug!("Transfer policy: {:?}", transfer.policy());

        let result = self
            .submit(transfer.js_params())
            .await
            .map_err(|e| Error::TransferFailed(e.to_string()))?;
        Ok(serde_json::to_string(&result)?)
    }

    async fn submit(&self, js_params: Value) -> Result<ExecuteJsResponse> {
        let session_sigs = self
            .client
            .get_session_sigs(&SessionSigsRequest::lit_action_execution())
            .await?;

        info!("Executing Lit Action with IPFS ID: {}", self.tool.ipfs_cid);
        let request = ExecuteJsRequest::ipfs(&self.tool.ipfs_cid, js_params, session_sigs);
        self.client.execute_js(&request).await
    }
}

#[async_trait]
impl ActionProvider for LitAgentWalletProvider {
    fn name(&self) -> &str {
        LIT_AGENT_WALLET_PROVIDER
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new::<Erc20TransferArgs>(
            EXECUTE_ERC20_TRANSFER,
            "Execute an ERC20 token transfer using Lit Agent Wallet",
        )]
    }

    async fn invoke(&self, action: &str, _wallet: &dyn WalletProvider, args: Value) -> Result<String> {
        match action {
            EXECUTE_ERC20_TRANSFER => self.execute_erc20_transfer(parse_args(action, args)?).await,
            other => Err(Error::config(format!(
                "{} has no action named {}",
                LIT_AGENT_WALLET_PROVIDER, other
            ))),
        }
    }
}
