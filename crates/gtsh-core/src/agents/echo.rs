//! Built-in agent that echoes each message after a fixed delay.

use std::time::Duration;

use crate::agent::{Agent, TurnHandle, TurnNotifier, TurnOutcome, TurnSeq, spawn_turn};

/// Answers every message with an echo after `delay`.
pub struct EchoAgent {
    notifier: TurnNotifier,
    seq: TurnSeq,
    delay: Duration,
}

impl EchoAgent {
    pub fn new(notifier: TurnNotifier, delay: Duration) -> Self {
        Self {
            notifier,
            seq: TurnSeq::default(),
            delay,
        }
    }
}

impl Agent for EchoAgent {
    fn submit(&mut self, message: String) -> TurnHandle {
        let handle = TurnHandle::new(self.seq.next_id());
        let delay = self.delay;
        spawn_turn(&self.notifier, &handle, move |out| async move {
            tokio::time::sleep(delay).await;
            for line in message.lines() {
                out.line(format!("echo: {line}"));
            }
            TurnOutcome::Completed
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentEvent, TurnId, create_event_channel};

    #[tokio::test(start_paused = true)]
    async fn test_echo_replies_after_delay() {
        let (notifier, mut rx) = create_event_channel();
        let mut agent = EchoAgent::new(notifier, Duration::from_millis(500));

        let handle = agent.submit("hi".to_string());
        assert_eq!(handle.id, TurnId(0));
        assert!(rx.try_recv().is_err());

        assert_eq!(
            rx.recv().await,
            Some(AgentEvent::Output {
                turn: TurnId(0),
                line: "echo: hi".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(AgentEvent::TurnCompleted {
                turn: TurnId(0),
                outcome: TurnOutcome::Completed
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_echo_turns_get_distinct_ids() {
        let (notifier, _rx) = create_event_channel();
        let mut agent = EchoAgent::new(notifier, Duration::from_millis(10));

        let first = agent.submit("a".to_string());
        let second = agent.submit("b".to_string());
        assert_ne!(first.id, second.id);
    }
}
