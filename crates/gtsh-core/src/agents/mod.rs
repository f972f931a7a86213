//! Concrete agent collaborators.
//!
//! - `echo`: built-in agent that answers after a fixed delay
//! - `command`: runs an external program once per turn

mod command;
mod echo;

use anyhow::Result;
pub use command::CommandAgent;
pub use echo::EchoAgent;

use crate::agent::{Agent, TurnNotifier};
use crate::config::{AgentConfig, AgentKind};

/// Builds the agent selected by `config`.
///
/// # Errors
/// Returns an error if the command agent is selected without a command.
pub fn build_agent(config: &AgentConfig, notifier: TurnNotifier) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match config.kind {
        AgentKind::Echo => Box::new(EchoAgent::new(
            notifier,
            std::time::Duration::from_millis(config.echo_delay_ms),
        )),
        AgentKind::Command => {
            let Some(program) = config.command.clone().filter(|c| !c.is_empty()) else {
                anyhow::bail!("agent.command is required when agent.kind = \"command\"");
            };
            Box::new(CommandAgent::new(notifier, program, config.args.clone()))
        }
    };
    tracing::info!(kind = ?config.kind, "agent ready");
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::create_event_channel;

    #[test]
    fn test_command_kind_without_command_fails() {
        let (notifier, _rx) = create_event_channel();
        let config = AgentConfig {
            kind: AgentKind::Command,
            ..AgentConfig::default()
        };
        assert!(build_agent(&config, notifier).is_err());
    }

    #[test]
    fn test_echo_kind_builds() {
        let (notifier, _rx) = create_event_channel();
        assert!(build_agent(&AgentConfig::default(), notifier).is_ok());
    }
}
