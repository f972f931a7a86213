//! Shell runtime: owns the terminal, runs the event loop, executes effects.
//!
//! The driver stays pure and produces effects; every side effect (starting
//! turns, cancelling them, printing transcript lines, redrawing) happens here.
//!
//! One loop iteration waits for the first of: shutdown, terminal bytes, an
//! agent event, or the redraw tick. It then feeds the driver, executes the
//! returned effects, lets a draining driver submit its next queued message,
//! and redraws the live area.

use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{Context, Result};
use gtsh_core::agent::{Agent, AgentEvent, AgentEventReceiver};
use gtsh_core::config::ShellConfig;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::widgets::{Paragraph, Widget};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::driver::ShellDriver;
use crate::effects::{ShellEffect, TranscriptLine};
use crate::features::input::LiveView;
use crate::keyboard::KeyDecoder;
use crate::render;

/// Bytes read from the terminal per wakeup.
const READ_CHUNK: usize = 1024;

/// Presentation settings for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub prompt: String,
    pub tick: Duration,
    pub queue_preview: usize,
}

impl From<&ShellConfig> for RuntimeOptions {
    fn from(config: &ShellConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            tick: config.tick_interval(),
            queue_preview: config.queue_preview,
        }
    }
}

enum Wake {
    Shutdown,
    Input(usize),
    Agent(AgentEvent),
    Tick,
}

/// Interactive shell runtime.
///
/// Generic over the terminal backend, the byte source and the agent so the
/// whole loop runs under `TestBackend` with an in-memory pipe.
pub struct ShellRuntime<B: Backend, R, A> {
    terminal: Terminal<B>,
    input: R,
    agent: A,
    events: AgentEventReceiver,
    decoder: KeyDecoder,
    driver: ShellDriver,
    live_view: LiveView,
    queue_preview: usize,
    tick: Duration,
    spinner_frame: usize,
    shutdown: CancellationToken,
}

impl<B, R, A> ShellRuntime<B, R, A>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
    R: AsyncRead + Unpin,
    A: Agent,
{
    pub fn new(
        terminal: Terminal<B>,
        input: R,
        agent: A,
        events: AgentEventReceiver,
        options: RuntimeOptions,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            terminal,
            input,
            agent,
            events,
            decoder: KeyDecoder::new(),
            driver: ShellDriver::new(),
            live_view: LiveView::new(options.prompt),
            queue_preview: options.queue_preview,
            tick: options.tick,
            spinner_frame: 0,
            shutdown,
        }
    }

    pub fn driver(&self) -> &ShellDriver {
        &self.driver
    }

    /// Runs until the user quits, input closes, or `shutdown` is cancelled.
    ///
    /// # Errors
    /// Returns an error if reading input or drawing fails.
    pub async fn run(&mut self) -> Result<()> {
        let result = self.event_loop().await;
        let finished = self.finish();
        result.and(finished)
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut read_buf = [0u8; READ_CHUNK];

        self.draw()?;
        loop {
            let wake = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => Wake::Shutdown,
                read = self.input.read(&mut read_buf) => {
                    Wake::Input(read.context("Failed to read terminal input")?)
                }
                Some(event) = self.events.recv() => Wake::Agent(event),
                _ = ticker.tick() => Wake::Tick,
            };

            let flow = match wake {
                Wake::Shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                Wake::Input(0) => {
                    tracing::info!("terminal input closed");
                    break;
                }
                Wake::Input(n) => self.handle_keys(&read_buf[..n])?,
                Wake::Agent(event) => {
                    let effects = self.driver.handle_agent_event(event);
                    self.execute_effects(effects)?
                }
                Wake::Tick => {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                    ControlFlow::Continue(())
                }
            };

            if flow.is_break() {
                break;
            }
            let drained = self.driver.drain_step();
            if self.execute_effects(drained)?.is_break() {
                break;
            }
            self.draw()?;
        }
        Ok(())
    }

    /// Feeds one read chunk to the driver, executing each key's effects before
    /// the next key so a started turn is active for the keys that follow.
    fn handle_keys(&mut self, bytes: &[u8]) -> Result<ControlFlow<()>> {
        for key in self.decoder.decode(bytes) {
            let effects = self.driver.handle_input(key);
            if self.execute_effects(effects)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn execute_effects(&mut self, effects: Vec<ShellEffect>) -> Result<ControlFlow<()>> {
        for effect in effects {
            match effect {
                ShellEffect::Submit(message) => {
                    let handle = self.agent.submit(message);
                    self.driver.turn_started(handle);
                }
                ShellEffect::CancelTurn(cancel) => cancel.cancel(),
                ShellEffect::Transcript(line) => self.print_transcript(&line)?,
                ShellEffect::Quit => return Ok(ControlFlow::Break(())),
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Prints a line into the scrollback above the inline viewport.
    fn print_transcript(&mut self, line: &TranscriptLine) -> Result<()> {
        let width = self.terminal.size().context("Failed to read terminal size")?.width;
        let lines = render::transcript_lines(line, usize::from(width));
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        self.terminal
            .insert_before(height, |buf| {
                Paragraph::new(lines).render(buf.area, buf);
            })
            .context("Failed to print transcript")?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let view = self
            .driver
            .view(&self.live_view, self.queue_preview, self.spinner_frame);
        self.terminal
            .draw(|frame| render::render(frame, &view))
            .context("Failed to draw")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(cancel) = self.driver.shutdown() {
            cancel.cancel();
        }
        self.terminal.clear().context("Failed to clear live area")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
