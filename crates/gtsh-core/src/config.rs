//! Configuration management for gtsh.
//!
//! Loads configuration from ${GTSH_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for gtsh configuration and data directories.
    //!
    //! GTSH_HOME resolution order:
    //! 1. GTSH_HOME environment variable (if set)
    //! 2. ~/.config/gtsh (default)
    //! 3. ./.gtsh when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the gtsh home directory.
    pub fn gtsh_home() -> PathBuf {
        if let Ok(home) = std::env::var("GTSH_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".gtsh"),
            |h| h.join(".config").join("gtsh"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        gtsh_home().join("config.toml")
    }

    /// Returns the default log file path.
    pub fn log_path() -> PathBuf {
        gtsh_home().join("gtsh.log")
    }
}

/// Which agent collaborator processes submitted turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Built-in agent that echoes each message after a delay.
    #[default]
    Echo,
    /// External program run once per turn.
    Command,
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Text shown in front of the line being typed.
    pub prompt: String,
    /// Redraw interval for the live input area, in milliseconds.
    pub tick_ms: u64,
    /// Number of queued messages previewed above the input line.
    pub queue_preview: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            tick_ms: 100,
            queue_preview: 3,
        }
    }
}

impl ShellConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Agent collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub kind: AgentKind,
    /// Program to run for `kind = "command"`.
    pub command: Option<String>,
    /// Arguments placed before the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Simulated turn duration for the echo agent.
    pub echo_delay_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: AgentKind::Echo,
            command: None,
            args: Vec::new(),
            echo_delay_ms: 800,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `GTSH_LOG` is unset.
    pub level: String,
    /// Log file path override.
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .as_ref()
            .map_or_else(paths::log_path, PathBuf::from)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shell: ShellConfig,
    pub agent: AgentConfig,
    pub log: LogConfig,
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };
        config
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// # Errors
    /// Returns an error describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.shell.tick_ms == 0 {
            anyhow::bail!("shell.tick_ms must be greater than zero");
        }
        if self.agent.kind == AgentKind::Command
            && self.agent.command.as_deref().is_none_or(str::is_empty)
        {
            anyhow::bail!("agent.command is required when agent.kind = \"command\"");
        }
        Ok(())
    }

    /// Writes the commented default config to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
