//! Minimal EVM JSON-RPC client
//!
//! Only read calls (balances and `eth_call`) are implemented. Transaction
//! submission goes through Lit, never through this client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::WalletSettings;
use crate::error::{Error, Result};

/// RPC client configuration
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    /// Endpoint URL
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl RpcClientConfig {
    /// Create configuration from WalletSettings
    pub fn from_settings(settings: &WalletSettings) -> Self {
        Self {
            url: settings.rpc_url.clone(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client over HTTP
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client
    pub fn new(config: RpcClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            url: config.url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Native balance of `address` at the latest block, in wei
    #[instrument(skip(self))]
    pub async fn get_balance(&self, address: &str) -> Result<U256> {
        let result = self
            .request("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&result)
    }

    /// Read-only contract call at the latest block, returning the raw output
    #[instrument(skip(self, data))]
    pub async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>> {
        let call = json!({ "to": to, "data": format!("0x{}", hex::encode(data)) });
        let result = self.request("eth_call", json!([call, "latest"])).await?;
        parse_data(&result)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        debug!("{} -> {}", method, self.url);

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(Error::rpc(format!("{} ({})", error.message, error.code)));
        }
        response
            .result
            .ok_or_else(|| Error::rpc(format!("{} returned no result", method)))
    }
}

fn hex_digits(value: &Value) -> Result<&str> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::rpc(format!("expected hex string, got {}", value)))?;
    Ok(text.strip_prefix("0x").unwrap_or(text))
}

/// Decode a hex quantity such as `"0x1bc16d674ec80000"`
pub fn parse_quantity(value: &Value) -> Result<U256> {
    let digits = hex_digits(value)?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::rpc(format!("invalid hex quantity {}: {}", value, e)))
}

/// Decode hex call output such as `"0x00ff"`
pub fn parse_data(value: &Value) -> Result<Vec<u8>> {
    hex::decode(hex_digits(value)?)
        .map_err(|e| Error::rpc(format!("invalid hex data {}: {}", value, e)))
}
