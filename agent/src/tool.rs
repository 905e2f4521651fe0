//! Tool and action provider interfaces
//!
//! An action provider exposes one or more named actions. Each action is
//! described by a [`ToolDefinition`] whose parameter schema is generated
//! from a typed argument struct, and arguments are parsed back into that
//! struct before the action body runs.

use async_trait::async_trait;
use lit_agentkit_core::{Error as CoreError, Network, Result as CoreResult, WalletProvider};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Name, description and JSON schema of a callable tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Tool name as seen by the model
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

impl ToolDefinition {
    /// Define a tool whose arguments are described by `T`
    pub fn new<T: JsonSchema>(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: schema_for::<T>(),
        }
    }

    /// OpenAI `tools` entry for this definition
    pub fn to_openai(&self) -> Value {
        json!({ "type": "function", "function": self })
    }
}

/// A plugin exposing named actions to the agent
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Actions offered by this provider
    fn actions(&self) -> Vec<ToolDefinition>;

    /// Run `action` with raw JSON arguments
    async fn invoke(
        &self,
        action: &str,
        wallet: &dyn WalletProvider,
        args: Value,
    ) -> CoreResult<String>;

    /// Whether the provider works on `network`
    fn supports_network(&self, _network: &Network) -> bool {
        true
    }
}

/// JSON schema for an argument type, trimmed for function calling
pub fn schema_for<T: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(T);
    let mut value = serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" }));

    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("title");
        map.entry("properties").or_insert_with(|| json!({}));
    }
    value
}

/// Parse raw arguments into the typed argument struct of `tool`
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> CoreResult<T> {
    serde_json::from_value(args).map_err(|e| CoreError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
