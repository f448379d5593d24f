//! Line-oriented console front-end.
//!
//! Reads commands from stdin and turns them into [`UiEvent`]s for the
//! coordinator. Runs on its own task and only talks to the coordinator
//! through the event channel and the read-only [`Countdown`].

use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::display::Display;
use crate::coordinator::{UiEvent, UiEventSender};
use crate::input::{ManualInputSource, PointerButton};
use crate::scheduler::Countdown;
use crate::types::HideReason;

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    /// Forwarded to the coordinator
    Ui(UiEvent),
    /// Simulated press outside the panel
    Click,
    /// Print the countdown
    Status,
    /// Print the command summary
    Help,
}

/// A console line that could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// `interval` without a value.
    #[error("usage: interval <hours>")]
    MissingHours,

    /// The interval argument is not a finite number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Extra words after a complete command.
    #[error("too many arguments for '{0}'")]
    TooManyArguments(String),

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`ConsoleError`] for unknown commands or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ConsoleError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "show" | "open" => ConsoleCommand::Ui(UiEvent::ShowRequested),
        "hide" | "close" => ConsoleCommand::Ui(UiEvent::HideRequested(HideReason::Explicit)),
        "toggle" | "t" => ConsoleCommand::Ui(UiEvent::ToggleRequested),
        "reset" | "r" => ConsoleCommand::Ui(UiEvent::ResetRequested),
        "quit" | "exit" | "q" => ConsoleCommand::Ui(UiEvent::QuitRequested),
        "interval" | "i" => {
            let value = words.next().ok_or(ConsoleError::MissingHours)?;
            let raw = value
                .parse::<f64>()
                .ok()
                .filter(|raw| raw.is_finite())
                .ok_or_else(|| ConsoleError::NotANumber(value.to_string()))?;
            ConsoleCommand::Ui(UiEvent::IntervalCommitted(raw))
        }
        "click" => ConsoleCommand::Click,
        "status" | "s" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };

    if words.next().is_some() {
        return Err(ConsoleError::TooManyArguments(command.to_string()));
    }
    Ok(Some(parsed))
}

/// Reads commands until `quit` or end of input.
///
/// `clicker` is the injectable input source used when no OS-level hook is
/// compiled in; `click` presses it.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails.
pub async fn run_console<R>(
    reader: R,
    ui: UiEventSender,
    countdown: Countdown,
    clicker: Option<ManualInputSource>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                Display::show_error(&e.to_string());
                continue;
            }
        };

        match command {
            ConsoleCommand::Ui(event) => {
                if !ui.send(event) || event == UiEvent::QuitRequested {
                    return Ok(());
                }
            }
            ConsoleCommand::Click => match &clicker {
                Some(source) => {
                    if !source.press(PointerButton::Left) {
                        println!("(panel is not open)");
                    }
                }
                None => println!("(clicks are read from the system)"),
            },
            ConsoleCommand::Status => Display::show_status(&countdown.snapshot()),
            ConsoleCommand::Help => Display::show_console_help(),
        }
    }

    tracing::debug!("console input closed");
    Ok(())
}
