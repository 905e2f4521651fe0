//! Lit network client
//!
//! The Lit SDK runs as a local bridge server; this module talks JSON over
//! HTTP to that bridge. A client is created and connected once per action
//! provider and reused for the provider's lifetime. Calls are issued one at
//! a time; nothing here retries or caches.
//!
//! # Example
//!
//! ```no_run
//! use lit_agentkit_core::lit::{ExecuteJsRequest, HttpLitClient, LitClient, LitClientConfig};
//! use lit_agentkit_core::session::SessionSigsRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LitClientConfig::new("http://localhost:3092", "datil-test");
//!     let client = HttpLitClient::connect(config, "0xprivatekey").await?;
//!
//!     let sigs = client
//!         .get_session_sigs(&SessionSigsRequest::lit_action_execution())
//!         .await?;
//!     let result = client
//!         .execute_js(&ExecuteJsRequest::inline("Lit.Actions.setResponse({response: '1'})", serde_json::json!({}), sigs))
//!         .await?;
//!     println!("{}", result.response_text());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::config::LitSettings;
use crate::error::{Error, Result};
use crate::session::{SessionSigs, SessionSigsRequest};

/// Remote signing and execution operations
#[async_trait]
pub trait LitClient: Send + Sync {
    /// Obtain session signatures for the requested abilities
    async fn get_session_sigs(&self, request: &SessionSigsRequest) -> Result<SessionSigs>;

    /// Execute a Lit Action, inline or IPFS-pinned
    async fn execute_js(&self, request: &ExecuteJsRequest) -> Result<ExecuteJsResponse>;
}

/// Lit Action execution request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteJsRequest {
    /// Inline JavaScript source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// IPFS CID of a pinned Lit Action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipfs_id: Option<String>,
    /// Parameters exposed to the action as globals
    pub js_params: Value,
    /// Session signatures authorizing the execution
    pub session_sigs: SessionSigs,
}

impl ExecuteJsRequest {
    /// Execute inline code
    pub fn inline(code: impl Into<String>, js_params: Value, session_sigs: SessionSigs) -> Self {
        Self {
            code: Some(code.into()),
            ipfs_id: None,
            js_params,
            session_sigs,
        }
    }

    /// Execute a pinned action by CID
    pub fn ipfs(ipfs_id: impl Into<String>, js_params: Value, session_sigs: SessionSigs) -> Self {
        Self {
            code: None,
            ipfs_id: Some(ipfs_id.into()),
            js_params,
            session_sigs,
        }
    }
}

/// Lit Action execution result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteJsResponse {
    /// Value passed to `Lit.Actions.setResponse`
    #[serde(default)]
    pub response: Value,
    /// Console output of the action
    #[serde(default)]
    pub logs: String,
    /// Remaining fields (signatures, claims, success flag, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecuteJsResponse {
    /// Response rendered as text, without quoting plain strings
    pub fn response_text(&self) -> String {
        match &self.response {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Lit client configuration
#[derive(Debug, Clone)]
pub struct LitClientConfig {
    /// Bridge server URL
    pub bridge_url: String,
    /// Lit network name (e.g. `datil-dev`)
    pub network: String,
    /// Enable SDK debug logging on the bridge
    pub debug: bool,
    /// Request timeout
    pub timeout: Duration,
}

impl LitClientConfig {
    /// Create configuration for a network with default timeout
    pub fn new(bridge_url: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            bridge_url: bridge_url.into(),
            network: network.into(),
            debug: true,
            timeout: Duration::from_secs(120),
        }
    }

    /// Create configuration from LitSettings for the given network
    pub fn from_settings(settings: &LitSettings, network: impl Into<String>) -> Self {
        Self {
            bridge_url: settings.bridge_url.clone(),
            network: network.into(),
            debug: settings.debug,
            timeout: settings.timeout(),
        }
    }
}

/// Lit client backed by the SDK bridge HTTP server
pub struct HttpLitClient {
    http: reqwest::Client,
    base_url: String,
    network: String,
}

impl HttpLitClient {
    /// Authenticate, create a node client for the network and connect it
    #[instrument(skip(config, auth_token), fields(network = %config.network))]
    pub async fn connect(config: LitClientConfig, auth_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let client = Self {
            http,
            base_url: config.bridge_url.trim_end_matches('/').to_string(),
            network: config.network.clone(),
        };

        client
            .post("/setAuthToken", &json!({ "authToken": auth_token }))
            .await?;
        client
            .post(
                "/litNodeClient/new",
                &json!({ "litNetwork": config.network, "debug": config.debug }),
            )
            .await?;
        client.post("/litNodeClient/connect", &json!({})).await?;

        info!("Connected to Lit network {}", client.network);
        Ok(client)
    }

    /// Lit network this client is connected to
    pub fn network(&self) -> &str {
        &self.network
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::lit(format!("{} returned {}: {}", path, status, text)));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl LitClient for HttpLitClient {
    #[instrument(skip(self, request), fields(network = %self.network))]
    async fn get_session_sigs(&self, request: &SessionSigsRequest) -> Result<SessionSigs> {
        debug!("Requesting session sigs expiring at {}", request.expiration);
        let body = self.post("/litNodeClient/getSessionSigs", request).await?;
        parse_session_sigs(body)
    }

    #[instrument(skip(self, request), fields(network = %self.network))]
    async fn execute_js(&self, request: &ExecuteJsRequest) -> Result<ExecuteJsResponse> {
        match &request.ipfs_id {
            Some(cid) => debug!("Executing pinned Lit Action {}", cid),
            None => debug!("Executing inline Lit Action"),
        }
        let body = self.post("/litNodeClient/executeJs", request).await?;
        Ok(serde_json::from_value(body)?)
    }
}

fn parse_session_sigs(body: Value) -> Result<SessionSigs> {
    match body {
        Value::Object(mut map) => match map.remove("sessionSigs") {
            Some(Value::Object(sigs)) => Ok(sigs),
            Some(other) => Err(Error::lit(format!(
                "sessionSigs has unexpected type: {}",
                other
            ))),
            None => Err(Error::lit("response missing sessionSigs")),
        },
        other => Err(Error::lit(format!(
            "unexpected getSessionSigs response: {}",
            other
        ))),
    }
}
