//! Shell driver: the phase state machine.
//!
//! Owns the input buffer and the pending queue. Keyboard input and agent
//! events go in, `ShellEffect`s come out; the runtime executes them.
//!
//! Phases:
//! - `Prompting`: idle, the next finalized line is submitted directly
//! - `Busy`: a turn is running, finalized lines are queued (type-ahead)
//! - `Draining`: a turn just ended with messages queued; `drain_step`
//!   submits the head or returns to `Prompting`
//!
//! Typing, backspace and clear-line are applied in every phase and never
//! change it.

use gtsh_core::agent::{AgentEvent, TurnHandle, TurnId, TurnOutcome};
use tokio_util::sync::CancellationToken;

use crate::effects::{ShellEffect, TranscriptLine};
use crate::features::input::{InputBuffer, LiveView};
use crate::features::queue::PendingQueue;
use crate::keyboard::{KeyEvent, KeyboardInput};
use crate::render::ShellView;

/// Shell driver phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellPhase {
    #[default]
    Prompting,
    Busy,
    Draining,
}

impl ShellPhase {
    pub fn is_prompting(self) -> bool {
        matches!(self, ShellPhase::Prompting)
    }
}

/// The orchestrating state machine.
#[derive(Debug, Default)]
pub struct ShellDriver {
    phase: ShellPhase,
    buffer: InputBuffer,
    queue: PendingQueue,
    /// Handle of the running turn, recorded once the runtime has submitted it.
    active: Option<TurnHandle>,
}

impl ShellDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn active_turn(&self) -> Option<TurnId> {
        self.active.as_ref().map(|handle| handle.id)
    }

    /// Applies one decoded keyboard input.
    pub fn handle_input(&mut self, input: KeyboardInput) -> Vec<ShellEffect> {
        match input {
            KeyboardInput::Char(c) => {
                self.buffer.append(c.ch);
                vec![]
            }
            KeyboardInput::Key(KeyEvent::Backspace) => {
                self.buffer.delete_last();
                vec![]
            }
            KeyboardInput::Key(KeyEvent::CtrlU) => {
                self.buffer.clear();
                vec![]
            }
            KeyboardInput::Key(KeyEvent::Enter) => self.finalize(),
            KeyboardInput::Key(KeyEvent::Interrupt) => self.interrupt(),
            KeyboardInput::Key(KeyEvent::Eof) => {
                if self.phase.is_prompting() && self.buffer.is_empty() {
                    vec![ShellEffect::Quit]
                } else {
                    vec![]
                }
            }
        }
    }

    fn finalize(&mut self) -> Vec<ShellEffect> {
        if self.buffer.is_empty() {
            return vec![];
        }
        let message = self.buffer.take();

        if self.phase.is_prompting() {
            self.phase = ShellPhase::Busy;
            return submit(message);
        }

        self.queue.enqueue(message);
        tracing::debug!(queued = self.queue.len(), phase = ?self.phase, "message queued");
        vec![]
    }

    fn interrupt(&mut self) -> Vec<ShellEffect> {
        if let Some(handle) = &self.active {
            tracing::info!(turn = %handle.id, "cancelling turn");
            return vec![ShellEffect::CancelTurn(handle.cancel.clone())];
        }
        if !self.buffer.is_empty() {
            self.buffer.clear();
            return vec![];
        }
        if self.phase.is_prompting() {
            return vec![ShellEffect::Quit];
        }
        vec![]
    }

    /// Records the handle returned by the agent for the turn just submitted.
    pub fn turn_started(&mut self, handle: TurnHandle) {
        tracing::debug!(turn = %handle.id, "turn started");
        self.active = Some(handle);
    }

    /// Routes an event from the agent collaborator.
    pub fn handle_agent_event(&mut self, event: AgentEvent) -> Vec<ShellEffect> {
        match event {
            AgentEvent::Output { line, .. } => {
                vec![ShellEffect::Transcript(TranscriptLine::Agent(line))]
            }
            AgentEvent::TurnCompleted { turn, outcome } => self.turn_completed(turn, &outcome),
        }
    }

    /// Ends the active turn. Every outcome counts as a completion.
    pub fn turn_completed(&mut self, turn: TurnId, outcome: &TurnOutcome) -> Vec<ShellEffect> {
        if self.active_turn() != Some(turn) {
            tracing::warn!(%turn, active = ?self.active_turn(), "ignoring stale turn completion");
            return vec![];
        }
        self.active = None;

        let mut effects = Vec::new();
        match outcome {
            TurnOutcome::Completed => {}
            TurnOutcome::Failed(reason) => {
                tracing::warn!(%turn, %reason, "turn failed");
                effects.push(ShellEffect::Transcript(TranscriptLine::Error(reason.clone())));
            }
            TurnOutcome::Cancelled => {
                effects.push(ShellEffect::Transcript(TranscriptLine::Notice(
                    "Turn cancelled.".to_string(),
                )));
            }
        }

        self.phase = if self.queue.is_empty() {
            ShellPhase::Prompting
        } else {
            ShellPhase::Draining
        };
        effects
    }

    /// Advances `Draining` by one step: submit the head or go back to `Prompting`.
    ///
    /// Polls the queue without waiting; a no-op in any other phase.
    pub fn drain_step(&mut self) -> Vec<ShellEffect> {
        if self.phase != ShellPhase::Draining {
            return vec![];
        }
        match self.queue.try_dequeue() {
            Some(message) => {
                self.phase = ShellPhase::Busy;
                tracing::debug!(remaining = self.queue.len(), "submitting queued message");
                submit(message)
            }
            None => {
                self.phase = ShellPhase::Prompting;
                vec![]
            }
        }
    }

    /// Tears down for exit: returns the active turn's cancel token, drops the queue.
    pub fn shutdown(&mut self) -> Option<CancellationToken> {
        let dropped = self.queue.clear();
        if dropped > 0 {
            tracing::info!(dropped, "discarding queued messages on exit");
        }
        self.active.take().map(|handle| handle.cancel)
    }

    /// Read-only snapshot for one redraw.
    pub fn view(&self, live_view: &LiveView, preview: usize, spinner_frame: usize) -> ShellView {
        ShellView {
            live: live_view.compose(self.buffer.as_str(), self.queue.len()),
            phase: self.phase,
            queue_preview: self.queue.summaries(preview),
            queued: self.queue.len(),
            spinner_frame,
        }
    }
}

fn submit(message: String) -> Vec<ShellEffect> {
    vec![
        ShellEffect::Transcript(TranscriptLine::User(message.clone())),
        ShellEffect::Submit(message),
    ]
}
