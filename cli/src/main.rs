//! Lit AgentKit CLI
//!
//! Runs an on-chain chatbot that can execute Lit Actions, send ERC-20 tokens
//! through a Lit agent wallet and read token balances and Pyth prices, either
//! as an interactive chat or as an autonomous loop.

mod driver;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lit_agentkit_actions::{
    Erc20ActionProvider, LitActionProvider, LitAgentWalletProvider, PythActionProvider,
    WalletActionProvider,
};
use lit_agentkit_agent::prelude::*;
use lit_agentkit_core::{
    AppConfig, Credentials, Error as CoreError, EthAccountWalletProvider, WalletProvider,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::driver::{Exit, Mode};

/// Lit AgentKit CLI
#[derive(Parser, Debug)]
#[command(
    name = "lit-agentkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "On-chain chatbot powered by Lit Protocol",
    long_about = "Chat with an on-chain agent, or let it act autonomously. The agent can \
                 execute Lit Actions and transfer ERC-20 tokens with a Lit agent wallet."
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, env = "LIT_AGENTKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Run mode; asked interactively when omitted
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Seconds between autonomous actions
    #[arg(short, long)]
    interval: Option<u64>,
}

/// Initialize logging based on verbosity
fn init_logging(verbose: bool, config: &AppConfig) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        config.logging.level.to_tracing_level()
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;
    Ok(())
}

/// Wire the wallet, action providers and LLM into an agent
async fn initialize_agent(config: &AppConfig, credentials: &Credentials) -> Result<ReactAgent> {
    let llm = OpenAiClient::new(OpenAiConfig::from_settings(&config.llm, credentials)?)?;

    let wallet = Arc::new(EthAccountWalletProvider::new(credentials, &config.wallet)?);
    info!("Wallet {} on {}", wallet.address(), wallet.network());

    let mut action_providers: Vec<Arc<dyn ActionProvider>> = vec![
        Arc::new(WalletActionProvider::new()),
        Arc::new(Erc20ActionProvider::from_settings(&config.wallet)?),
        Arc::new(PythActionProvider::new(&config.pyth)?),
    ];

    let lit_action = LitActionProvider::connect(config, credentials)
        .await
        .context("failed to connect the Lit Action provider")?;
    action_providers.push(Arc::new(lit_action));

    match LitAgentWalletProvider::connect(config, credentials).await {
        Ok(agent_wallet) => action_providers.push(Arc::new(agent_wallet)),
        Err(e @ CoreError::ToolNotFound { .. }) => {
            warn!("{}; ERC-20 transfers are disabled", e);
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context("failed to connect the Lit agent wallet provider"))
        }
    }

    let kit = AgentKit::new(AgentKitConfig {
        wallet_provider: wallet,
        action_providers,
    })?;
    info!("Registered tools: {}", kit.tool_names().join(", "));

    let mut agent = ReactAgent::new(Arc::new(llm), kit);
    if let Some(prompt) = &config.agent.system_prompt {
        agent = agent.with_system_prompt(prompt.clone());
    }
    Ok(agent)
}

async fn run(agent: &ReactAgent, mode: Mode, config: &AppConfig) -> Result<()> {
    let run_config = RunConfig::new(config.agent.thread_id.clone())
        .with_recursion_limit(config.agent.recursion_limit);
    let mut stdout = std::io::stdout();

    match mode {
        Mode::Chat => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            driver::run_chat_mode(agent, &run_config, stdin, &mut stdout).await
        }
        Mode::Auto => {
            driver::run_autonomous_mode(agent, &run_config, config.autonomous_interval(), &mut stdout)
                .await
        }
    }
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(seconds) = cli.interval {
        config.agent.interval_seconds = seconds;
    }
    init_logging(cli.verbose, &config)?;

    info!("Lit AgentKit CLI v{}", env!("CARGO_PKG_VERSION"));
    println!("Starting Agent...");

    let credentials = Credentials::from_env()?;
    let agent = initialize_agent(&config, &credentials).await?;

    let mode = match cli.mode {
        Some(mode) => mode,
        None => driver::choose_mode()?,
    };
    info!("Running in {} mode", mode);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let exit =
        driver::run_until_interrupted(run(&agent, mode, &config), shutdown, &mut std::io::stdout())
            .await?;
    if exit == Exit::Interrupted {
        // The stdin reader blocks runtime shutdown.
        std::process::exit(0);
    }
    Ok(())
}
