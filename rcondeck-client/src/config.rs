//! Configuration loading
//!
//! The config file is YAML (`config.yaml`) or TOML when the path ends in
//! `.toml`. Only `servers` is required; every other section has defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use rcondeck_protocol::ClientSettings;
use rcondeck_utils::{config_file, local_config_file, DeckError, Result};

use crate::executor::DEFAULT_PROGRAM;
use crate::input::{KeyBinding, Keymap};
use crate::registry::{ServerDescriptor, ServerRegistry};

/// Lowest accepted tick rate
const MIN_TICK_RATE_MS: u64 = 10;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub servers: Vec<ServerEntry>,
    pub keybindings: KeybindingConfig,
    pub ui: UiConfig,
    pub container: ContainerConfig,
    pub rcon: RconConfig,
}

/// One `servers` entry as written in the file
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    pub name: String,
    pub address: String,
    #[serde(default, alias = "secret")]
    pub password: String,
    #[serde(default)]
    pub container: Option<String>,
}

impl ServerEntry {
    pub fn to_descriptor(&self) -> ServerDescriptor {
        ServerDescriptor::new(
            self.name.trim(),
            self.address.trim(),
            self.password.clone(),
            self.container.as_ref().map(|c| c.trim().to_string()),
        )
    }
}

/// Key binding strings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub select_next: String,
    pub start: String,
    pub stop: String,
    pub restart: String,
    pub status: String,
    pub quit: String,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            select_next: "Tab".into(),
            start: "Ctrl-s".into(),
            stop: "Ctrl-x".into(),
            restart: "Ctrl-r".into(),
            status: "Ctrl-d".into(),
            quit: "Ctrl-c".into(),
        }
    }
}

impl KeybindingConfig {
    /// Parse every binding; the error names the offending entry
    pub fn keymap(&self) -> std::result::Result<Keymap, String> {
        let parse = |field: &str, value: &str| {
            value
                .parse::<KeyBinding>()
                .map_err(|e| format!("keybindings.{}: {}", field, e))
        };

        Ok(Keymap {
            select_next: parse("select_next", &self.select_next)?,
            start: parse("start", &self.start)?,
            stop: parse("stop", &self.stop)?,
            restart: parse("restart", &self.restart)?,
            status: parse("status", &self.status)?,
            quit: parse("quit", &self.quit)?,
        })
    }
}

/// Dashboard behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds before a finished status reverts to the server description
    /// (0 = never). "Sending…" and other in-progress statuses are held until
    /// the result arrives.
    pub status_timeout_secs: u64,
    /// Input poll / tick interval
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_timeout_secs: 5,
            tick_rate_ms: 250,
        }
    }
}

impl UiConfig {
    pub fn status_timeout(&self) -> Option<Duration> {
        (self.status_timeout_secs > 0).then(|| Duration::from_secs(self.status_timeout_secs))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Container management program
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub program: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
        }
    }
}

/// RCON client timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RconConfig {
    pub dial_timeout_secs: u64,
    pub io_timeout_secs: u64,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: 5,
            io_timeout_secs: 5,
        }
    }
}

impl RconConfig {
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            dial_timeout: Duration::from_secs(self.dial_timeout_secs),
            io_timeout: Duration::from_secs(self.io_timeout_secs),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Pick the config file: explicit path, then `./config.yaml`, then the user config dir
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        Self::resolve_path_in(explicit, &local_config_file(), &config_file())
    }

    fn resolve_path_in(explicit: Option<&Path>, local: &Path, user: &Path) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if local.exists() {
            return Ok(local.to_path_buf());
        }
        if user.exists() {
            return Ok(user.to_path_buf());
        }
        Err(DeckError::ConfigNotFound(local.to_path_buf()))
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<DeckConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| DeckError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration from string, choosing the format by extension
    pub fn parse(content: &str, path: &Path) -> Result<DeckConfig> {
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed: std::result::Result<DeckConfig, String> = if is_toml {
            toml::from_str(content).map_err(|e| e.to_string())
        } else if content.trim().is_empty() {
            Ok(DeckConfig::default())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| DeckError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Validate configuration
    pub fn validate(config: &DeckConfig, path: &Path) -> Result<()> {
        let invalid = |message: String| DeckError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        };

        for (i, server) in config.servers.iter().enumerate() {
            if server.name.trim().is_empty() {
                return Err(invalid(format!("servers[{}]: name must not be empty", i)));
            }
            if server.address.trim().is_empty() {
                return Err(invalid(format!(
                    "servers[{}] '{}': address must not be empty",
                    i, server.name
                )));
            }
        }

        let keymap = config.keybindings.keymap().map_err(invalid)?;
        if let Some(binding) = keymap.find_conflict() {
            return Err(invalid(format!(
                "keybindings: {} is bound to more than one action",
                binding
            )));
        }

        if let Some(binding) = keymap.find_reserved() {
            return Err(invalid(format!(
                "keybindings: {} is needed for typing or submitting commands",
                binding
            )));
        }

        if config.ui.tick_rate_ms < MIN_TICK_RATE_MS {
            return Err(invalid(format!(
                "ui.tick_rate_ms must be at least {}",
                MIN_TICK_RATE_MS
            )));
        }

        if config.container.program.trim().is_empty() {
            return Err(invalid("container.program must not be empty".into()));
        }

        Ok(())
    }

    /// Load and validate
    pub fn load_and_validate(path: &Path) -> Result<DeckConfig> {
        let config = Self::load_from_path(path)?;
        Self::validate(&config, path)?;
        Ok(config)
    }

    /// Build the server registry from a validated config
    pub fn registry(config: &DeckConfig, path: &Path) -> Result<ServerRegistry> {
        let servers = config.servers.iter().map(ServerEntry::to_descriptor).collect();
        ServerRegistry::load(servers).map_err(|e| match e {
            DeckError::Config(message) => DeckError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }
}
