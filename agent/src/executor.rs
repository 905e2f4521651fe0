//! ReAct executor with streamed output
//!
//! Each request alternates between a model call and the tools the model
//! asked for, until the model answers without tool calls. Every step is
//! yielded as a [`StreamChunk`] as soon as it completes; nothing runs until
//! the stream is polled.
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use lit_agentkit_agent::prelude::*;
//!
//! # async fn run(agent: ReactAgent) -> lit_agentkit_agent::Result<()> {
//! let config = RunConfig::new("demo-thread");
//! let mut stream = agent.stream(vec![Message::user("What is my address?")], &config);
//! while let Some(chunk) = stream.next().await {
//!     let chunk = chunk?;
//!     println!("[{}] {}", chunk.source(), chunk.first_content().unwrap_or(""));
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::kit::AgentKit;
use crate::llm::LlmClient;
use crate::memory::MemorySaver;
use crate::message::{Message, ToolCall};
use crate::tool::ToolDefinition;

/// Default maximum number of model calls per request
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Default system prompt for the on-chain agent
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful agent that can interact onchain using AgentKit \
and the Lit network. You are empowered to interact onchain using your tools. If you ever need funds, you \
can request them from the user after providing your wallet details. Before executing your first action, \
get the wallet details to see what network you're on. If there is a 5XX (internal) HTTP error code, ask \
the user to try again later. If someone asks you to do something you can't do with your currently \
available tools, you must say so, and encourage them to implement it themselves as a new action \
provider. Be concise and helpful with your responses. Refrain from restating your tools' descriptions \
unless it is explicitly requested.";

/// Per-request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Conversation thread in the checkpointer
    pub thread_id: String,
    /// Maximum model calls before giving up
    pub recursion_limit: usize,
}

impl RunConfig {
    /// Config for `thread_id` with the default recursion limit
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Override the recursion limit
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }
}

/// One step of agent output
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Output of a model call
    Agent {
        /// Messages produced by the step
        messages: Vec<Message>,
    },
    /// Output of a tool call
    Tools {
        /// Messages produced by the step
        messages: Vec<Message>,
    },
}

impl StreamChunk {
    /// `agent` or `tools`
    pub fn source(&self) -> &'static str {
        match self {
            Self::Agent { .. } => "agent",
            Self::Tools { .. } => "tools",
        }
    }

    /// Messages produced by the step
    pub fn messages(&self) -> &[Message] {
        match self {
            Self::Agent { messages } | Self::Tools { messages } => messages,
        }
    }

    /// Content of the first message
    pub fn first_content(&self) -> Option<&str> {
        self.messages().first().map(Message::content)
    }
}

/// Anything that turns input messages into a chunk stream
pub trait AgentExecutor: Send + Sync {
    /// Start a request; work happens as the stream is polled
    fn stream<'a>(
        &'a self,
        input: Vec<Message>,
        config: &'a RunConfig,
    ) -> BoxStream<'a, Result<StreamChunk>>;
}

/// Tool-calling agent over an LLM and an [`AgentKit`]
pub struct ReactAgent {
    llm: Arc<dyn LlmClient>,
    kit: AgentKit,
    memory: MemorySaver,
    system_prompt: String,
}

impl ReactAgent {
    /// Create an agent with the default system prompt and empty memory
    pub fn new(llm: Arc<dyn LlmClient>, kit: AgentKit) -> Self {
        Self {
            llm,
            kit,
            memory: MemorySaver::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Registered tools
    pub fn kit(&self) -> &AgentKit {
        &self.kit
    }

    /// Conversation checkpointer
    pub fn memory(&self) -> &MemorySaver {
        &self.memory
    }
}

impl AgentExecutor for ReactAgent {
    fn stream<'a>(
        &'a self,
        input: Vec<Message>,
        config: &'a RunConfig,
    ) -> BoxStream<'a, Result<StreamChunk>> {
        let run = Run {
            agent: self,
            config,
            tools: self.kit.definitions(),
            history: Vec::new(),
            pending: VecDeque::new(),
            steps: 0,
            phase: Phase::Start(input),
        };

        stream::unfold(run, |mut run| async move {
            let item = run.advance().await?;
            Some((item, run))
        })
        .boxed()
    }
}

enum Phase {
    Start(Vec<Message>),
    CallModel,
    RunTools,
    Done,
}

struct Run<'a> {
    agent: &'a ReactAgent,
    config: &'a RunConfig,
    tools: Vec<ToolDefinition>,
    history: Vec<Message>,
    pending: VecDeque<ToolCall>,
    steps: usize,
    phase: Phase,
}

impl Run<'_> {
    async fn advance(&mut self) -> Option<Result<StreamChunk>> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Start(input) => {
                    self.history = self.agent.memory.load(&self.config.thread_id).await;
                    self.record(input).await;
                    self.phase = Phase::CallModel;
                }
                Phase::CallModel => return Some(self.call_model().await),
                Phase::RunTools => return Some(Ok(self.run_next_tool().await)),
                Phase::Done => return None,
            }
        }
    }

    async fn call_model(&mut self) -> Result<StreamChunk> {
        if self.steps >= self.config.recursion_limit {
            return Err(AgentError::RecursionLimit(self.config.recursion_limit));
        }
        self.steps += 1;

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(Message::system(self.agent.system_prompt.as_str()));
        messages.extend(self.history.iter().cloned());

        let reply = self.agent.llm.complete(&messages, &self.tools).await?;
        self.pending = reply.tool_calls().iter().cloned().collect();
        self.phase = if self.pending.is_empty() {
            Phase::Done
        } else {
            Phase::RunTools
        };

        self.record(vec![reply.clone()]).await;
        Ok(StreamChunk::Agent {
            messages: vec![reply],
        })
    }

    async fn run_next_tool(&mut self) -> StreamChunk {
        let message = match self.pending.pop_front() {
            Some(call) => self.execute(call).await,
            None => Message::tool("", "Error: no pending tool call"),
        };
        self.phase = if self.pending.is_empty() {
            Phase::CallModel
        } else {
            Phase::RunTools
        };

        self.record(vec![message.clone()]).await;
        StreamChunk::Tools {
            messages: vec![message],
        }
    }

    async fn execute(&self, call: ToolCall) -> Message {
        let name = call.function.name.as_str();
        info!("Calling tool {}", name);

        let outcome = match parse_arguments(&call.function.arguments) {
            Ok(args) => self.agent.kit.invoke(name, args).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(output) => {
                debug!("Tool {} returned {} bytes", name, output.len());
                Message::tool(call.id, output)
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                Message::tool(call.id, format!("Error: {}", e))
            }
        }
    }

    async fn record(&mut self, messages: Vec<Message>) {
        self.agent
            .memory
            .append(&self.config.thread_id, &messages)
            .await;
        self.history.extend(messages);
    }
}

fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kit::AgentKitConfig;
    use crate::test_support::{EchoProvider, ScriptedLlm, StaticWallet};
    use futures::TryStreamExt;

    fn agent(llm: Arc<ScriptedLlm>, provider: Arc<EchoProvider>) -> ReactAgent {
        let kit = AgentKit::new(AgentKitConfig {
            wallet_provider: Arc::new(StaticWallet::new(84532)),
            action_providers: vec![provider],
        })
        .unwrap();
        ReactAgent::new(llm, kit)
    }

    fn tool_call_reply(id: &str, name: &str, args: &str) -> Message {
        Message::Assistant {
            content: None,
            tool_calls: vec![ToolCall::new(id, name, args)],
        }
    }

    #[tokio::test]
    async fn test_text_reply_yields_single_agent_chunk() -> Result<()> {
        let llm = Arc::new(ScriptedLlm::new(vec![Message::assistant("Hello there")]));
        let agent = agent(llm.clone(), Arc::new(EchoProvider::new("echo", &["echo"])));
        let config = RunConfig::new("t1");

        let chunks: Vec<StreamChunk> = agent
            .stream(vec![Message::user("hi")], &config)
            .try_collect()
            .await?;

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source(), "agent");
        assert_eq!(chunks[0].first_content(), Some("Hello there"));

        let seen = llm.requests();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0][0], Message::System { .. }));
        assert_eq!(seen[0][1], Message::user("hi"));
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_round_trip() -> Result<()> {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_call_reply("call_1", "echo", r#"{"text":"ping"}"#),
            Message::assistant("The tool said ping"),
        ]));
        let provider = Arc::new(EchoProvider::new("echo", &["echo"]));
        let agent = agent(llm.clone(), provider.clone());
        let config = RunConfig::new("t1");

        let chunks: Vec<StreamChunk> = agent
            .stream(vec![Message::user("echo ping")], &config)
            .try_collect()
            .await?;

        let sources: Vec<&str> = chunks.iter().map(StreamChunk::source).collect();
        assert_eq!(sources, vec!["agent", "tools", "agent"]);
        assert_eq!(chunks[1].first_content(), Some("echo: ping"));
        assert_eq!(provider.calls(), 1);

        let second = &llm.requests()[1];
        assert_eq!(second.last(), Some(&Message::tool("call_1", "echo: ping")));
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_errors_are_reported_to_model() -> Result<()> {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Message::Assistant {
                content: None,
                tool_calls: vec![
                    ToolCall::new("call_1", "missing", "{}"),
                    ToolCall::new("call_2", "echo", "not json"),
                ],
            },
            Message::assistant("Sorry"),
        ]));
        let provider = Arc::new(EchoProvider::new("echo", &["echo"]));
        let agent = agent(llm, provider.clone());
        let config = RunConfig::new("t1");

        let chunks: Vec<StreamChunk> = agent
            .stream(vec![Message::user("go")], &config)
            .try_collect()
            .await?;

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].first_content(), Some("Error: Unknown tool: missing"));
        assert!(chunks[2]
            .first_content()
            .unwrap_or_default()
            .starts_with("Error: JSON error"));
        assert_eq!(provider.calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_recursion_limit() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_call_reply("call_1", "echo", r#"{"text":"1"}"#),
            tool_call_reply("call_2", "echo", r#"{"text":"2"}"#),
            tool_call_reply("call_3", "echo", r#"{"text":"3"}"#),
        ]));
        let agent = agent(llm, Arc::new(EchoProvider::new("echo", &["echo"])));
        let config = RunConfig::new("t1").with_recursion_limit(2);

        let results: Vec<Result<StreamChunk>> =
            agent.stream(vec![Message::user("loop")], &config).collect().await;

        assert_eq!(results.len(), 5);
        assert!(matches!(results[4], Err(AgentError::RecursionLimit(2))));
    }

    #[tokio::test]
    async fn test_history_is_kept_per_thread() -> Result<()> {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Message::assistant("first"),
            Message::assistant("second"),
            Message::assistant("third"),
        ]));
        let agent = agent(llm.clone(), Arc::new(EchoProvider::new("echo", &["echo"])));
        let main = RunConfig::new("main");
        let other = RunConfig::new("other");

        let _: Vec<StreamChunk> = agent.stream(vec![Message::user("a")], &main).try_collect().await?;
        let _: Vec<StreamChunk> = agent.stream(vec![Message::user("b")], &main).try_collect().await?;
        let _: Vec<StreamChunk> = agent.stream(vec![Message::user("c")], &other).try_collect().await?;

        let requests = llm.requests();
        // system + a + first + b
        assert_eq!(requests[1].len(), 4);
        assert_eq!(requests[1][2], Message::assistant("first"));
        // system + c only
        assert_eq!(requests[2].len(), 2);
        assert_eq!(agent.memory().load("main").await.len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let llm = Arc::new(ScriptedLlm::new(vec![Message::assistant("unused")]));
        let agent = agent(llm.clone(), Arc::new(EchoProvider::new("echo", &["echo"])));
        let config = RunConfig::new("t1");

        let stream = agent.stream(vec![Message::user("hi")], &config);
        drop(stream);

        assert!(llm.requests().is_empty());
        assert!(agent.memory().load("t1").await.is_empty());
    }

    #[tokio::test]
    async fn test_llm_error_ends_stream() {
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let agent = agent(llm, Arc::new(EchoProvider::new("echo", &["echo"])));
        let config = RunConfig::new("t1");

        let results: Vec<Result<StreamChunk>> =
            agent.stream(vec![Message::user("hi")], &config).collect().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(AgentError::Llm(_))));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments("").unwrap(), serde_json::json!({}));
        assert_eq!(parse_arguments("{\"a\":1}").unwrap()["a"], 1);
        assert!(parse_arguments("{").is_err());
    }
}
