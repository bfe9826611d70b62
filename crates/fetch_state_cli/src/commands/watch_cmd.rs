//! Interactive watch session.
//!
//! A session keeps one controller alive, prints every state transition it
//! observes and accepts commands from standard input, one per line.

use std::io::Write;
use std::str::FromStr;

use clap::Args;
use fetch_state::{FetchController, FetchState};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

use super::{build_retriever, ConnectionArgs};
use crate::errors::Error;

#[cfg(test)]
#[path = "watch_cmd_tests.rs"]
mod tests;

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Resource to watch, absolute or relative to the base URL
    pub resource: String,

    /// Only fetch when asked to with `refetch`
    #[arg(long)]
    pub manual: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// A command typed into a watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// Start a new attempt against the current resource.
    Refetch,
    /// Switch to another resource.
    Open(String),
    /// Turn manual triggering on or off.
    Manual(bool),
    /// Print the current state.
    State,
    /// Block until no attempt is outstanding, then print the state.
    Wait,
    /// Detach the controller and end the session.
    Quit,
}

impl FromStr for WatchCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            ("refetch", None) => Ok(WatchCommand::Refetch),
            ("open", Some(resource)) => Ok(WatchCommand::Open(resource.to_string())),
            ("manual", Some("on")) => Ok(WatchCommand::Manual(true)),
            ("manual", Some("off")) => Ok(WatchCommand::Manual(false)),
            ("state", None) => Ok(WatchCommand::State),
            ("wait", None) => Ok(WatchCommand::Wait),
            ("quit", None) | ("exit", None) => Ok(WatchCommand::Quit),
            _ => Err(Error::InvalidCommand(line.trim().to_string())),
        }
    }
}

/// Execute the watch command
#[instrument(skip(args), fields(resource = %args.resource))]
pub async fn execute(args: &WatchArgs) -> Result<(), Error> {
    let mut config = args.connection.resolve_config()?;
    config.fetch.manual |= args.manual;
    let retriever = build_retriever(&config)?;

    let controller: FetchController<Value> =
        FetchController::new(args.resource.as_str(), config.fetch_options(), retriever)?;

    // Print transitions as they happen
    let mut receiver = controller.subscribe();
    let printer = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let state = receiver.borrow_and_update().clone();
            println!("{}", render_state(&state));
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let result = run_session(&controller, stdin, &mut std::io::stdout()).await;

    controller.detach();
    printer.abort();
    result
}

/// Runs commands read from `input` against the controller until `quit` or end
/// of input. Anything the session prints goes to `output`.
///
/// Unknown commands are reported and skipped.
pub async fn run_session<R, W>(
    controller: &FetchController<Value>,
    input: R,
    output: &mut W,
) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<WatchCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(line = %line, "Unknown command");
                writeln!(output, "{e}")?;
                continue;
            }
        };

        debug!(command = ?command, "Running command");
        match command {
            WatchCommand::Refetch => controller.refetch(),
            WatchCommand::Open(resource) => controller.set_resource(resource),
            WatchCommand::Manual(manual) => controller.set_manual(manual),
            WatchCommand::State => writeln!(output, "{}", render_state(&controller.snapshot()))?,
            WatchCommand::Wait => {
                let state = controller.settled().await;
                writeln!(output, "{}", render_state(&state))?;
            }
            WatchCommand::Quit => {
                controller.detach();
                break;
            }
        }
    }

    info!(resource = %controller.resource(), "Watch session finished");
    Ok(())
}

/// Renders a state as a single line.
pub fn render_state(state: &FetchState<Value>) -> String {
    let data = state
        .data
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_else(|| "-".to_string());
    let error = state
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());

    format!(
        "generation={} loading={} data={} error={}",
        state.generation, state.loading, data, error
    )
}
