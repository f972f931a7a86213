//! Shell effect types.
//!
//! Effects are commands returned by the driver that the runtime executes.
//! The driver only mutates its own state and returns effects; it never
//! touches the agent or the terminal directly.

use tokio_util::sync::CancellationToken;

/// A line printed above the live area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    /// A message as it is submitted to the agent.
    User(String),
    /// Output produced by a turn.
    Agent(String),
    /// Informational notice from the shell.
    Notice(String),
    /// A failed turn.
    Error(String),
}

/// Effects returned by the driver for the runtime to execute.
#[derive(Debug)]
pub enum ShellEffect {
    /// Start a turn for this message.
    Submit(String),
    /// Cancel the active turn.
    CancelTurn(CancellationToken),
    /// Print a transcript line above the live area.
    Transcript(TranscriptLine),
    /// Leave the shell.
    Quit,
}
