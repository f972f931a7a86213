//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use gtsh_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "gtsh")]
#[command(version)]
#[command(about = "Type-ahead agent shell for Gas Town convoys")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Chat,
    /// Show the Gas Town convoy this shell runs in
    Convoy {
        #[command(subcommand)]
        command: ConvoyCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConvoyCommands {
    /// Print convoy context from the environment
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Alias for `info`
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Write a default config file
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Terminal reads park a blocking thread; shut down without waiting on it.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create tokio runtime")?;
    let result = rt.block_on(dispatch(cli));
    rt.shutdown_background();
    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let config = config::Config::load().context("load config")?;
            let _log_guard = logging::init_file_logging(&config.log)?;
            commands::chat::run(&config).await
        }
        Commands::Convoy { command } => {
            logging::init_stderr_logging();
            match command {
                ConvoyCommands::Info { json } | ConvoyCommands::Status { json } => {
                    commands::convoy::info(json)
                }
            }
        }
        Commands::Config { command } => {
            logging::init_stderr_logging();
            match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
            }
        }
    }
}
