//! Agent collaborator contract.
//!
//! The shell only knows how to start a turn and how to hear about it ending.
//! `Agent::submit` starts a turn without blocking and returns a [`TurnHandle`];
//! output and the final [`TurnOutcome`] arrive later as [`AgentEvent`]s on the
//! channel created by [`create_event_channel`].

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Identifies one submitted turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic turn id allocator.
#[derive(Debug, Default)]
pub struct TurnSeq {
    next: u64,
}

impl TurnSeq {
    pub fn next_id(&mut self) -> TurnId {
        let id = TurnId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Handle to a running turn.
#[derive(Debug, Clone)]
pub struct TurnHandle {
    pub id: TurnId,
    pub cancel: CancellationToken,
}

impl TurnHandle {
    pub fn new(id: TurnId) -> Self {
        Self {
            id,
            cancel: CancellationToken::new(),
        }
    }
}

/// How a turn ended. The shell treats every variant as a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Failed(String),
    Cancelled,
}

/// Events delivered from running turns to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A line of output produced by a turn.
    Output { turn: TurnId, line: String },
    /// The turn finished. Sent exactly once per submitted turn.
    TurnCompleted { turn: TurnId, outcome: TurnOutcome },
}

pub type AgentEventReceiver = mpsc::UnboundedReceiver<AgentEvent>;

/// Sending side of the agent event channel.
#[derive(Debug, Clone)]
pub struct TurnNotifier {
    tx: mpsc::UnboundedSender<AgentEvent>,
}

/// Creates the channel agents report on and the shell drains.
pub fn create_event_channel() -> (TurnNotifier, AgentEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TurnNotifier { tx }, rx)
}

impl TurnNotifier {
    /// Output sink scoped to one turn.
    pub fn for_turn(&self, turn: TurnId) -> TurnOutput {
        TurnOutput {
            turn,
            notifier: self.clone(),
        }
    }

    pub fn complete(&self, turn: TurnId, outcome: TurnOutcome) {
        // Receiver gone means the shell is shutting down.
        let _ = self.tx.send(AgentEvent::TurnCompleted { turn, outcome });
    }

    fn output(&self, turn: TurnId, line: String) {
        let _ = self.tx.send(AgentEvent::Output { turn, line });
    }
}

/// Per-turn output sink handed to turn bodies.
#[derive(Debug, Clone)]
pub struct TurnOutput {
    turn: TurnId,
    notifier: TurnNotifier,
}

impl TurnOutput {
    pub fn line(&self, line: impl Into<String>) {
        self.notifier.output(self.turn, line.into());
    }
}

/// The agent-processing collaborator.
pub trait Agent {
    /// Starts a turn for `message` and returns immediately.
    fn submit(&mut self, message: String) -> TurnHandle;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn submit(&mut self, message: String) -> TurnHandle {
        (**self).submit(message)
    }
}

/// Spawns a turn body with a uniform completion lifecycle.
///
/// Cancelling `handle.cancel` drops the body and reports `TurnOutcome::Cancelled`.
/// Exactly one `TurnCompleted` is sent either way.
pub fn spawn_turn<F, Fut>(notifier: &TurnNotifier, handle: &TurnHandle, body: F)
where
    F: FnOnce(TurnOutput) -> Fut + Send + 'static,
    Fut: Future<Output = TurnOutcome> + Send + 'static,
{
    let notifier = notifier.clone();
    let cancel = handle.cancel.clone();
    let turn = handle.id;
    tokio::spawn(async move {
        let output = notifier.for_turn(turn);
        let outcome = tokio::select! {
            () = cancel.cancelled() => TurnOutcome::Cancelled,
            outcome = body(output) => outcome,
        };
        tracing::debug!(%turn, ?outcome, "turn finished");
        notifier.complete(turn, outcome);
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_turn_seq_is_monotonic() {
        let mut seq = TurnSeq::default();
        assert_eq!(seq.next_id(), TurnId(0));
        assert_eq!(seq.next_id(), TurnId(1));
        assert_eq!(seq.next_id(), TurnId(2));
    }

    #[tokio::test]
    async fn test_spawn_turn_reports_output_then_completion() {
        let (notifier, mut rx) = create_event_channel();
        let handle = TurnHandle::new(TurnId(7));

        spawn_turn(&notifier, &handle, |out| async move {
            out.line("working");
            TurnOutcome::Completed
        });

        assert_eq!(
            rx.recv().await,
            Some(AgentEvent::Output {
                turn: TurnId(7),
                line: "working".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(AgentEvent::TurnCompleted {
                turn: TurnId(7),
                outcome: TurnOutcome::Completed
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_turn_still_completes() {
        let (notifier, mut rx) = create_event_channel();
        let handle = TurnHandle::new(TurnId(1));

        spawn_turn(&notifier, &handle, |_| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            TurnOutcome::Completed
        });
        handle.cancel.cancel();

        assert_eq!(
            rx.recv().await,
            Some(AgentEvent::TurnCompleted {
                turn: TurnId(1),
                outcome: TurnOutcome::Cancelled
            })
        );
    }
}
