//! Type-ahead interactive shell for gtsh.
//!
//! Raw terminal bytes are decoded into keys, a pure driver turns keys and
//! agent events into effects, and the runtime executes them while keeping a
//! small live area (queue preview, status, input line) at the bottom of the
//! terminal.

pub mod common;
pub mod driver;
pub mod effects;
pub mod features;
pub mod keyboard;
pub mod render;
pub mod runtime;
pub mod terminal;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use features::{input, queue};
use gtsh_core::agent::create_event_channel;
use gtsh_core::agents::build_agent;
use gtsh_core::config::Config;
use gtsh_core::convoy::ConvoyContext;
pub use runtime::{RuntimeOptions, ShellRuntime};
use tokio_util::sync::CancellationToken;

/// Runs the interactive shell on the process terminal.
///
/// # Errors
/// Returns an error if stdin is not a terminal, the agent cannot be built,
/// or terminal I/O fails.
pub async fn run_interactive_shell(config: &Config, shutdown: CancellationToken) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "The interactive shell requires a terminal on stdin.\n\
             Use `gtsh convoy info` for non-interactive output."
        );
    }

    let mut err = stderr();
    writeln!(err, "gtsh - type-ahead agent shell")?;
    writeln!(err, "Agent: {:?}", config.agent.kind)?;
    if let Some(banner) = ConvoyContext::from_env().banner() {
        writeln!(err, "Convoy: {banner}")?;
    }
    writeln!(err, "Type while the agent works; Enter queues the line.")?;
    err.flush()?;

    let (notifier, events) = create_event_channel();
    let agent = build_agent(&config.agent, notifier)?;
    let options = RuntimeOptions::from(&config.shell);

    terminal::install_panic_hook();
    let term = terminal::setup_terminal(render::viewport_height(options.queue_preview))?;
    let guard = terminal::TerminalGuard;

    let mut runtime = ShellRuntime::new(term, tokio::io::stdin(), agent, events, options, shutdown);
    let result = runtime.run().await;

    drop(guard);
    let _ = writeln!(stderr(), "Goodbye!");
    result
}
