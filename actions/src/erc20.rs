//! ERC-20 balance lookups
//!
//! Reads `balanceOf` and `decimals` from a token contract with `eth_call`
//! and reports the agent wallet's holding in whole tokens.

use std::str::FromStr;

use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use lit_agentkit_agent::{parse_args, ActionProvider, ToolDefinition};
use lit_agentkit_core::config::WalletSettings;
use lit_agentkit_core::rpc::{RpcClient, RpcClientConfig};
use lit_agentkit_core::validation::validate_address;
use lit_agentkit_core::{Error, Result, WalletProvider};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Provider name
pub const ERC20_PROVIDER: &str = "erc20";

/// Action name
pub const GET_BALANCE: &str = "get_balance";

const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Arguments of `get_balance`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetBalanceArgs {
    /// ERC-20 token contract address
    pub contract_address: String,
}

/// Calldata for `balanceOf(holder)`
pub fn encode_balance_of(holder: &str) -> Result<Vec<u8>> {
    let holder =
        Address::from_str(holder).map_err(|_| Error::InvalidAddress(holder.to_string()))?;

    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(holder.as_slice());
    Ok(data)
}

/// First 32-byte word of call output as an unsigned integer
pub fn decode_uint(data: &[u8]) -> Result<U256> {
    if data.len() < 32 {
        return Err(Error::rpc(format!(
            "contract returned {} bytes, expected a 32-byte word",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(&data[..32]))
}

/// Action provider for ERC-20 reads
pub struct Erc20ActionProvider {
    rpc: RpcClient,
}

impl Erc20ActionProvider {
    /// Create a provider over an RPC client
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    /// Create a provider for the wallet's chain
    pub fn from_settings(settings: &WalletSettings) -> Result<Self> {
        Ok(Self::new(RpcClient::new(RpcClientConfig::from_settings(settings))?))
    }

    /// Balance of `contract_address` held by the wallet, in whole tokens
    #[instrument(skip(self, wallet))]
    pub async fn get_balance(
        &self,
        wallet: &dyn WalletProvider,
        args: GetBalanceArgs,
    ) -> Result<String> {
        let contract = validate_address(&args.contract_address)?;

        let raw = self
            .rpc
            .eth_call(&contract, &encode_balance_of(&wallet.address())?)
            .await?;
        let balance = decode_uint(&raw)?;

        let raw = self.rpc.eth_call(&contract, &DECIMALS_SELECTOR).await?;
        let decimals = u8::try_from(decode_uint(&raw)?)
            .map_err(|_| Error::rpc(format!("{} reported out-of-range decimals", contract)))?;
        debug!("{} balance {} with {} decimals", contract, balance, decimals);

        let formatted = format_units(balance, decimals).map_err(|e| Error::rpc(e.to_string()))?;
        Ok(format!("Balance of {} is {}", contract, formatted))
    }
}

#[async_trait]
impl ActionProvider for Erc20ActionProvider {
    fn name(&self) -> &str {
        ERC20_PROVIDER
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new::<GetBalanceArgs>(
            GET_BALANCE,
            "This tool will get the balance of an ERC20 asset in the wallet. \
             It takes the contract address as input.",
        )]
    }

    async fn invoke(&self, action: &str, wallet: &dyn WalletProvider, args: Value) -> Result<String> {
        match action {
            GET_BALANCE => self.get_balance(wallet, parse_args(action, args)?).await,
            other => Err(Error::config(format!(
                "{} has no action named {}",
                ERC20_PROVIDER, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockHttpServer, StaticWallet};
    use serde_json::json;
    use std::time::Duration;

    const TOKEN: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    fn word(value: u64) -> Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": format!("0x{:064x}", value) })
    }

    fn provider(url: &str) -> Erc20ActionProvider {
        Erc20ActionProvider::new(
            RpcClient::new(RpcClientConfig {
                url: url.to_string(),
                timeout: Duration::from_secs(5),
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_encode_balance_of() -> Result<()> {
        let data = encode_balance_of("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?;

        assert_eq!(data.len(), 36);
        assert_eq!(
            alloy_primitives::hex::encode(&data),
            "70a08231000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert!(encode_balance_of("0x1234").is_err());
        Ok(())
    }

    #[test]
    fn test_decode_uint() -> Result<()> {
        let mut data = vec![0u8; 32];
        data[31] = 6;
        assert_eq!(decode_uint(&data)?, U256::from(6u8));
        assert!(decode_uint(&[]).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_balance_is_formatted_with_token_decimals() -> Result<()> {
        let server = MockHttpServer::start(vec![word(1_500_000), word(6)]).await;

        let output = provider(server.url())
            .invoke(GET_BALANCE, &StaticWallet, json!({ "contract_address": TOKEN }))
            .await?;

        assert_eq!(output, format!("Balance of {} is 1.500000", TOKEN));
        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("\"eth_call\""));
        assert!(requests[0]
            .contains("0x70a08231000000000000000000000000f39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(requests[1].contains("0x313ce567"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_contract_makes_no_call() {
        let server = MockHttpServer::start(vec![]).await;

        let err = provider(server.url())
            .invoke(GET_BALANCE, &StaticWallet, json!({ "contract_address": "usdc" }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid Ethereum address: usdc");
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_rpc_error_propagates() {
        let server = MockHttpServer::start(vec![json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        })])
        .await;

        let err = provider(server.url())
            .invoke(GET_BALANCE, &StaticWallet, json!({ "contract_address": TOKEN }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "RPC error: execution reverted (-32000)");
    }
}
