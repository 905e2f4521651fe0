//! Wallet provider for the acting EVM account
//!
//! The wallet provider answers "who am I and where am I": the account
//! address derived from the configured private key, and the network the
//! agent operates on. Action providers receive it on every call.
//!
//! # Example
//!
//! ```no_run
//! use lit_agentkit_core::config::{AppConfig, Credentials};
//! use lit_agentkit_core::wallet::{EthAccountWalletProvider, WalletProvider};
//!
//! # async fn run() -> lit_agentkit_core::Result<()> {
//! let config = AppConfig::default();
//! let credentials = Credentials::from_env()?;
//! let wallet = EthAccountWalletProvider::new(&credentials, &config.wallet)?;
//!
//! println!("{} on {}", wallet.address(), wallet.network());
//! println!("balance: {} wei", wallet.get_balance().await?);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use alloy_primitives::{keccak256, Address, U256};
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::{Credentials, WalletSettings};
use crate::error::{Error, Result};
use crate::rpc::{RpcClient, RpcClientConfig};

/// Protocol family of EVM networks
pub const EVM_PROTOCOL_FAMILY: &str = "evm";

/// Network the wallet operates on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Protocol family (always `evm` here)
    pub protocol_family: String,
    /// Well-known network id, if the chain is recognised
    pub network_id: Option<String>,
    /// EVM chain id
    pub chain_id: u64,
}

impl Network {
    /// Network for an EVM chain id
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            protocol_family: EVM_PROTOCOL_FAMILY.to_string(),
            network_id: network_id_for_chain(chain_id).map(str::to_string),
            chain_id,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.network_id {
            Some(id) => write!(f, "{} (chain {})", id, self.chain_id),
            None => write!(f, "chain {}", self.chain_id),
        }
    }
}

/// Map known chain ids to network ids
pub fn network_id_for_chain(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        1 => Some("ethereum-mainnet"),
        11155111 => Some("ethereum-sepolia"),
        8453 => Some("base-mainnet"),
        84532 => Some("base-sepolia"),
        _ => None,
    }
}

/// Account and network information exposed to actions
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Checksummed account address
    fn address(&self) -> String;

    /// Network the wallet operates on
    fn network(&self) -> Network;

    /// Native balance in wei
    async fn get_balance(&self) -> Result<U256>;
}

/// Wallet provider backed by a local secp256k1 private key
pub struct EthAccountWalletProvider {
    address: Address,
    network: Network,
    rpc: RpcClient,
}

impl EthAccountWalletProvider {
    /// Derive the account from the configured private key
    pub fn new(credentials: &Credentials, settings: &WalletSettings) -> Result<Self> {
        let address = derive_address(credentials.private_key())?;
        let rpc = RpcClient::new(RpcClientConfig::from_settings(settings))?;
        let network = Network::from_chain_id(settings.chain_id);

        info!("Wallet {} on {}", address.to_checksum(None), network);
        Ok(Self {
            address,
            network,
            rpc,
        })
    }
}

#[async_trait]
impl WalletProvider for EthAccountWalletProvider {
    fn name(&self) -> &str {
        "eth_account_wallet_provider"
    }

    fn address(&self) -> String {
        self.address.to_checksum(None)
    }

    fn network(&self) -> Network {
        self.network.clone()
    }

    async fn get_balance(&self) -> Result<U256> {
        self.rpc.get_balance(&self.address()).await
    }
}

/// Derive the EVM address of a hex-encoded private key
pub fn derive_address(private_key: &str) -> Result<Address> {
    let trimmed = private_key.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = Zeroizing::new(hex::decode(digits)?);

    let signing_key =
        SigningKey::from_slice(&bytes).map_err(|e| Error::InvalidKey(e.to_string()))?;
    let point = signing_key.verifying_key().to_encoded_point(false);
    // Uncompressed SEC1 point: 0x04 || X || Y. The address is the last 20
    // bytes of keccak256(X || Y).
    let hash = keccak256(&point.as_bytes()[1..]);

    Ok(Address::from_slice(&hash[12..]))
}
