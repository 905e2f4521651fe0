//! Test doubles shared by the agent unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lit_agentkit_core::{Network, Result as CoreResult, WalletProvider, U256};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::tool::{parse_args, ActionProvider, ToolDefinition};

pub struct StaticWallet {
    chain_id: u64,
}

impl StaticWallet {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    fn name(&self) -> &str {
        "static"
    }

    fn address(&self) -> String {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string()
    }

    fn network(&self) -> Network {
        Network::from_chain_id(self.chain_id)
    }

    async fn get_balance(&self) -> CoreResult<U256> {
        Ok(U256::ZERO)
    }
}

#[derive(Deserialize, JsonSchema)]
struct EchoArgs {
    text: String,
}

pub struct EchoProvider {
    name: String,
    actions: Vec<String>,
    chain: Option<u64>,
    calls: AtomicUsize,
}

impl EchoProvider {
    pub fn new(name: &str, actions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            chain: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn only_chain(mut self, chain_id: u64) -> Self {
        self.chain = Some(chain_id);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionProvider for EchoProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        self.actions
            .iter()
            .map(|action| ToolDefinition::new::<EchoArgs>(action.as_str(), "Echo text back"))
            .collect()
    }

    async fn invoke(&self, action: &str, _wallet: &dyn WalletProvider, args: Value) -> CoreResult<String> {
        let args: EchoArgs = parse_args(action, args)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("echo: {}", args.text))
    }

    fn supports_network(&self, network: &Network) -> bool {
        self.chain.map_or(true, |chain| chain == network.chain_id)
    }
}

/// Replays canned replies and records every request
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: &[Message], _tools: &[ToolDefinition]) -> Result<Message> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::llm("script exhausted"))
    }
}
