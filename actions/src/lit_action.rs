//! Inline Lit Action execution
//!
//! Runs a small JavaScript Lit Action that echoes a magic number back. It
//! exercises the whole path (session signatures, remote execution, response
//! and logs) without touching any chain.

use std::sync::Arc;

use async_trait::async_trait;
use lit_agentkit_agent::{parse_args, ActionProvider, ToolDefinition};
use lit_agentkit_core::config::{AppConfig, Credentials};
use lit_agentkit_core::{
    Error, ExecuteJsRequest, HttpLitClient, LitClient, LitClientConfig, Result,
    SessionSigsRequest, WalletProvider,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Provider name
pub const LIT_ACTION_PROVIDER: &str = "lit-action-provider";

/// Action name
pub const EXECUTE_LIT_ACTION: &str = "execute-lit-action";

/// Arguments of `execute-lit-action`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LitActionArgs {
    /// Number echoed back by the action
    pub magic_number: i64,
}

/// Render the Lit Action source for `magic_number`
///
/// The number is interpolated into the code and also passed as the
/// `magicNumber` parameter.
pub fn render_magic_number_action(magic_number: i64) -> String {
    format!(
        r#"
        (async () => {{
          const magicNumber = {magic_number};
          console.log("The magic number is:", magicNumber);
          Lit.Actions.setResponse({{ response: JSON.stringify({{ magicNumber }}) }});
        }})();
        "#
    )
}

/// Action provider for inline Lit Actions
pub struct LitActionProvider {
    client: Arc<dyn LitClient>,
}

impl LitActionProvider {
    /// Create a provider over an existing client
    pub fn new(client: Arc<dyn LitClient>) -> Self {
        Self { client }
    }

    /// Connect a bridge client on the configured action network
    pub async fn connect(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let client_config = LitClientConfig::from_settings(&config.lit, &config.lit.action_network);
        let client = HttpLitClient::connect(client_config, credentials.private_key()).await?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Execute the magic number action
    #[instrument(skip(self))]
    pub async fn execute_lit_action(&self, args: LitActionArgs) -> Result<String> {
        let code = render_magic_number_action(args.magic_number);
        let session_sigs = self
            .client
            .get_session_sigs(&SessionSigsRequest::lit_action_execution())
            .await?;

        let request = ExecuteJsRequest::inline(
            code,
            json!({ "magicNumber": args.magic_number }),
            session_sigs,
        );
        let result = self.client.execute_js(&request).await?;
        debug!("Lit Action logs: {}", result.logs);

        Ok(format!(
            "Lit Action executed. Response: {}, Logs: {}",
            result.response_text(),
            result.logs
        ))
    }
}

#[async_trait]
impl ActionProvider for LitActionProvider {
    fn name(&self) -> &str {
        LIT_ACTION_PROVIDER
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition::new::<LitActionArgs>(
            EXECUTE_LIT_ACTION,
            "Execute a hello Lit Action with a magic number",
        )]
    }

    async fn invoke(&self, action: &str, _wallet: &dyn WalletProvider, args: Value) -> Result<String> {
        match action {
            EXECUTE_LIT_ACTION => self.execute_lit_action(parse_args(action, args)?).await,
            other => Err(Error::config(format!(
                "{} has no action named {}",
                LIT_ACTION_PROVIDER, other
            ))),
        }
    }
}
