//! Chat and autonomous conversation loops

use std::fmt;
use std::future::Future;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use dialoguer::Input;
use futures::stream::{BoxStream, StreamExt};
use lit_agentkit_agent::{AgentExecutor, Message, RunConfig, StreamChunk};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Printed after every chunk
pub const SEPARATOR: &str = "-------------------";

/// Printed when the user interrupts a run
pub const GOODBYE: &str = "Goodbye Agent!";

/// Prompt sent on every autonomous iteration
pub const AUTONOMOUS_PROMPT: &str = "Be creative and do something interesting on the blockchain. \
Choose an action or set of actions and execute it that highlights your abilities.";

/// How the agent is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Interactive chat mode
    Chat,
    /// Autonomous action mode
    Auto,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "chat" => Ok(Mode::Chat),
            "2" | "auto" => Ok(Mode::Auto),
            _ => Err("Invalid choice. Please try again.".to_string()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Chat => write!(f, "chat"),
            Mode::Auto => write!(f, "auto"),
        }
    }
}

/// Ask the user for a mode until a valid choice is entered
pub fn choose_mode() -> Result<Mode> {
    println!("\nAvailable modes:");
    println!("1. chat    - Interactive chat mode");
    println!("2. auto    - Autonomous action mode");

    let choice: String = Input::new()
        .with_prompt("Choose a mode (enter number or name)")
        .validate_with(|input: &String| input.parse::<Mode>().map(|_| ()))
        .interact_text()?;
    choice.parse().map_err(anyhow::Error::msg)
}

/// Print the first message of each chunk followed by a separator
pub async fn print_chunks<W: Write>(
    mut chunks: BoxStream<'_, lit_agentkit_agent::Result<StreamChunk>>,
    out: &mut W,
) -> Result<()> {
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        debug!("{} chunk with {} message(s)", chunk.source(), chunk.messages().len());
        writeln!(out, "{}", chunk.first_content().unwrap_or_default())?;
        writeln!(out, "{}", SEPARATOR)?;
    }
    out.flush()?;
    Ok(())
}

/// Read prompts from `input` until `exit` or end of input
pub async fn run_chat_mode<R, W>(
    agent: &dyn AgentExecutor,
    run: &RunConfig,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Starting chat mode... Type 'exit' to end.")?;
    let mut lines = input.lines();

    loop {
        write!(out, "\nPrompt: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.to_lowercase() == "exit" {
            break;
        }

        print_chunks(agent.stream(vec![Message::user(line)], run), out).await?;
    }
    Ok(())
}

/// Send the autonomous prompt once and print the result
pub async fn autonomous_step<W: Write>(
    agent: &dyn AgentExecutor,
    run: &RunConfig,
    out: &mut W,
) -> Result<()> {
    print_chunks(agent.stream(vec![Message::user(AUTONOMOUS_PROMPT)], run), out).await
}

/// Prompt the agent every `interval` until interrupted
pub async fn run_autonomous_mode<W: Write>(
    agent: &dyn AgentExecutor,
    run: &RunConfig,
    interval: Duration,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Starting autonomous mode...")?;
    loop {
        autonomous_step(agent, run, out).await?;
        info!("Sleeping {:?} before the next autonomous step", interval);
        tokio::time::sleep(interval).await;
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The loop returned on its own
    Completed,
    /// `shutdown` resolved first
    Interrupted,
}

/// Drive `run` until it returns or `shutdown` resolves
///
/// On interruption the run is dropped and [`GOODBYE`] is written to `out`.
pub async fn run_until_interrupted<R, S, W>(run: R, shutdown: S, out: &mut W) -> Result<Exit>
where
    R: Future<Output = Result<()>>,
    S: Future<Output = ()>,
    W: Write,
{
    tokio::select! {
        biased;
        _ = shutdown => {
            writeln!(out, "{}", GOODBYE)?;
            out.flush()?;
            Ok(Exit::Interrupted)
        }
        result = run => result.map(|_| Exit::Completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use lit_agentkit_agent::AgentError;
    use std::sync::Mutex;

    /// Executor that records inputs and replies with fixed chunks
    #[derive(Default)]
    struct RecordingExecutor {
        inputs: Mutex<Vec<Vec<Message>>>,
        fail: bool,
    }

    impl RecordingExecutor {
        fn calls(&self) -> usize {
            self.inputs.lock().unwrap().len()
        }

        fn inputs(&self) -> Vec<Vec<Message>> {
            self.inputs.lock().unwrap().clone()
        }
    }

    impl AgentExecutor for RecordingExecutor {
        fn stream<'a>(
            &'a self,
            input: Vec<Message>,
            _config: &'a RunConfig,
        ) -> BoxStream<'a, lit_agentkit_agent::Result<StreamChunk>> {
            self.inputs.lock().unwrap().push(input);
            if self.fail {
                return stream::iter(vec![Err(AgentError::llm("model unavailable"))]).boxed();
            }
            stream::iter(vec![
                Ok(StreamChunk::Tools {
                    messages: vec![Message::tool("call_1", "Wallet Details: 0xabc")],
                }),
                Ok(StreamChunk::Agent {
                    messages: vec![Message::assistant("Your address is 0xabc")],
                }),
            ])
            .boxed()
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("1".parse::<Mode>(), Ok(Mode::Chat));
        assert_eq!("CHAT".parse::<Mode>(), Ok(Mode::Chat));
        assert_eq!(" 2 ".parse::<Mode>(), Ok(Mode::Auto));
        assert_eq!("Auto".parse::<Mode>(), Ok(Mode::Auto));
        assert!("3".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[tokio::test]
    async fn test_exit_ends_chat_without_agent_call() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        run_chat_mode(&agent, &RunConfig::new("t"), "exit\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(agent.calls(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Starting chat mode... Type 'exit' to end."));
        assert!(!text.contains(SEPARATOR));
    }

    #[tokio::test]
    async fn test_exit_is_case_insensitive() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        run_chat_mode(&agent, &RunConfig::new("t"), "EXIT\nhello\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(agent.calls(), 0);
    }

    #[tokio::test]
    async fn test_padded_exit_is_forwarded_verbatim() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        run_chat_mode(&agent, &RunConfig::new("t"), "  exit  \nexit\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(agent.inputs(), vec![vec![Message::user("  exit  ")]]);
    }

    #[tokio::test]
    async fn test_chat_forwards_prompt_and_prints_chunks() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        run_chat_mode(
            &agent,
            &RunConfig::new("t"),
            "what is my address?\nexit\n".as_bytes(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(agent.inputs(), vec![vec![Message::user("what is my address?")]]);
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "Wallet Details: 0xabc\n{sep}\nYour address is 0xabc\n{sep}\n",
            sep = SEPARATOR
        );
        assert!(text.contains(&expected));
    }

    #[tokio::test]
    async fn test_end_of_input_ends_chat() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        run_chat_mode(&agent, &RunConfig::new("t"), "hi\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(agent.calls(), 1);
    }

    #[tokio::test]
    async fn test_agent_error_propagates() {
        let agent = RecordingExecutor {
            fail: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let err = run_chat_mode(&agent, &RunConfig::new("t"), "hi\n".as_bytes(), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_autonomous_step_sends_fixed_prompt() {
        let agent = RecordingExecutor::default();
        let mut out = Vec::new();

        autonomous_step(&agent, &RunConfig::new("t"), &mut out)
            .await
            .unwrap();

        assert_eq!(agent.inputs(), vec![vec![Message::user(AUTONOMOUS_PROMPT)]]);
        assert!(String::from_utf8(out).unwrap().ends_with(&format!("{}\n", SEPARATOR)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_autonomous_mode_repeats_after_interval() {
        let agent = RecordingExecutor::default();
        let run = RunConfig::new("t");
        let mut out = Vec::new();

        let result = tokio::time::timeout(
            Duration::from_secs(25),
            run_autonomous_mode(&agent, &run, Duration::from_secs(10), &mut out),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(agent.calls(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_stops_autonomous_loop() {
        let agent = RecordingExecutor::default();
        let run = RunConfig::new("t");
        let mut out = Vec::new();
        let mut console = Vec::new();

        let exit = run_until_interrupted(
            run_autonomous_mode(&agent, &run, Duration::from_secs(10), &mut out),
            std::future::ready(()),
            &mut console,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Interrupted);
        assert_eq!(String::from_utf8(console).unwrap(), "Goodbye Agent!\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_while_sleeping_between_steps() {
        let agent = RecordingExecutor::default();
        let run = RunConfig::new("t");
        let mut out = Vec::new();
        let mut console = Vec::new();

        let exit = run_until_interrupted(
            run_autonomous_mode(&agent, &run, Duration::from_secs(10), &mut out),
            tokio::time::sleep(Duration::from_secs(15)),
            &mut console,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Interrupted);
        assert_eq!(agent.calls(), 2);
        assert!(String::from_utf8(console).unwrap().contains(GOODBYE));
    }

    #[tokio::test]
    async fn test_agent_error_propagates_through_interrupt_guard() {
        let agent = RecordingExecutor {
            fail: true,
            ..Default::default()
        };
        let run = RunConfig::new("t");
        let mut out = Vec::new();
        let mut console = Vec::new();

        let err = run_until_interrupted(
            run_autonomous_mode(&agent, &run, Duration::from_secs(10), &mut out),
            std::future::pending(),
            &mut console,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("model unavailable"));
        assert!(console.is_empty());
    }

    #[tokio::test]
    async fn test_finished_run_is_not_an_interruption() {
        let agent = RecordingExecutor::default();
        let run = RunConfig::new("t");
        let mut out = Vec::new();
        let mut console = Vec::new();

        let exit = run_until_interrupted(
            run_chat_mode(&agent, &run, "exit\n".as_bytes(), &mut out),
            std::future::pending(),
            &mut console,
        )
        .await
        .unwrap();

        assert_eq!(exit, Exit::Completed);
        assert!(console.is_empty());
    }
}
