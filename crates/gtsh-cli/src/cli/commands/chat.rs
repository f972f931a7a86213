//! Chat command handler.

use anyhow::Result;
use gtsh_core::config::Config;
use gtsh_core::shutdown;
use tokio_util::sync::CancellationToken;

pub async fn run(config: &Config) -> Result<()> {
    let shutdown = CancellationToken::new();
    shutdown::spawn_signal_listener(shutdown.clone())?;
    tracing::info!(agent = ?config.agent.kind, "starting interactive shell");
    let result = gtsh_tui::run_interactive_shell(config, shutdown.clone()).await;
    shutdown.cancel();
    result
}
