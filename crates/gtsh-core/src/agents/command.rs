//! Agent that runs an external program once per turn.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

use crate::agent::{Agent, TurnHandle, TurnNotifier, TurnOutcome, TurnOutput, TurnSeq, spawn_turn};

/// Longest stderr excerpt carried in a failure outcome.
const MAX_STDERR_CHARS: usize = 400;

/// Runs `program args.. <message>` for each turn, streaming stdout lines.
pub struct CommandAgent {
    notifier: TurnNotifier,
    seq: TurnSeq,
    program: String,
    args: Vec<String>,
}

impl CommandAgent {
    pub fn new(notifier: TurnNotifier, program: String, args: Vec<String>) -> Self {
        Self {
            notifier,
            seq: TurnSeq::default(),
            program,
            args,
        }
    }
}

impl Agent for CommandAgent {
    fn submit(&mut self, message: String) -> TurnHandle {
        let handle = TurnHandle::new(self.seq.next_id());
        let program = self.program.clone();
        let args = self.args.clone();
        spawn_turn(&self.notifier, &handle, move |out| {
            run_command(program, args, message, out)
        });
        handle
    }
}

async fn run_command(
    program: String,
    args: Vec<String>,
    message: String,
    out: TurnOutput,
) -> TurnOutcome {
    // kill_on_drop: a cancelled turn drops this future and takes the child with it.
    let spawned = tokio::process::Command::new(&program)
        .args(&args)
        .arg(&message)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => return TurnOutcome::Failed(format!("failed to start {program}: {e}")),
    };

    let stderr_task = child.stderr.take().map(|mut stderr| {
        tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        })
    });

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => out.line(line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "reading agent stdout failed");
                    break;
                }
            }
        }
    }

    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => return TurnOutcome::Failed(format!("failed to wait for {program}: {e}")),
    };

    if status.success() {
        return TurnOutcome::Completed;
    }

    let stderr = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    };
    let stderr = stderr.trim();
    let mut reason = format!("{program} exited with {status}");
    if !stderr.is_empty() {
        let excerpt: String = stderr.chars().take(MAX_STDERR_CHARS).collect();
        reason.push_str(": ");
        reason.push_str(&excerpt);
    }
    TurnOutcome::Failed(reason)
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::agent::{AgentEvent, AgentEventReceiver, TurnId, create_event_channel};

    fn sh_agent(script: &str) -> (CommandAgent, AgentEventReceiver) {
        let (notifier, rx) = create_event_channel();
        let agent = CommandAgent::new(
            notifier,
            "sh".to_string(),
            vec!["-c".to_string(), script.to_string()],
        );
        (agent, rx)
    }

    async fn collect_turn(rx: &mut AgentEventReceiver) -> (Vec<String>, TurnOutcome) {
        let mut lines = Vec::new();
        loop {
            match rx.recv().await.expect("channel open") {
                AgentEvent::Output { line, .. } => lines.push(line),
                AgentEvent::TurnCompleted { outcome, .. } => return (lines, outcome),
            }
        }
    }

    #[tokio::test]
    async fn test_message_is_last_argument() {
        // With `sh -c script arg`, the first trailing argument becomes $0.
        let (mut agent, mut rx) = sh_agent("printf '%s\\n' \"got $0\"");

        agent.submit("hello world".to_string());
        let (lines, outcome) = collect_turn(&mut rx).await;

        assert_eq!(lines, vec!["got hello world".to_string()]);
        assert_eq!(outcome, TurnOutcome::Completed);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_with_stderr() {
        let (mut agent, mut rx) = sh_agent("echo boom >&2; exit 3");

        agent.submit("x".to_string());
        let (_, outcome) = collect_turn(&mut rx).await;

        match outcome {
            TurnOutcome::Failed(reason) => {
                assert!(reason.contains("boom"), "reason: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_failure() {
        let (notifier, mut rx) = create_event_channel();
        let mut agent = CommandAgent::new(notifier, "gtsh-no-such-program".to_string(), vec![]);

        agent.submit("x".to_string());
        let (_, outcome) = collect_turn(&mut rx).await;

        assert!(matches!(
            outcome,
            TurnOutcome::Failed(reason) if reason.contains("failed to start")
        ));
    }

    #[tokio::test]
    async fn test_cancel_stops_long_running_turn() {
        let (mut agent, mut rx) = sh_agent("sleep 30");

        let handle = agent.submit("x".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel.cancel();

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("completion before timeout");
        assert_eq!(
            event,
            Some(AgentEvent::TurnCompleted {
                turn: TurnId(0),
                outcome: TurnOutcome::Cancelled
            })
        );
    }
}
