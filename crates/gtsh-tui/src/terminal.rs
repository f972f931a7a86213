//! Terminal lifecycle management.
//!
//! The shell draws into an inline viewport at the bottom of the normal
//! screen, so scrollback keeps the transcript. Terminal state is restored on:
//! - Normal exit (via `TerminalGuard` drop)
//! - Panic (via the panic hook)

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};

/// Enables raw mode and creates an inline terminal `height` rows tall.
///
/// Raw mode delivers every keystroke as bytes without echo or line
/// buffering. Call `install_panic_hook()` before this.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn setup_terminal(height: u16) -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restores terminal state. Idempotent.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn restore_terminal() -> Result<()> {
    let _ = execute!(io::stdout(), Show);
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restores the terminal when dropped.
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal() {
            tracing::warn!("failed to restore terminal: {err:#}");
        }
    }
}
