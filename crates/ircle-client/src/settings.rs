//! Settings for the `ircle` binary.
//!
//! Settings can be loaded from:
//! - A TOML file given as the first argument
//! - `ircle.toml` or `~/.config/ircle/ircle.toml`
//! - Environment variables (`IRCLE_HOST`, `IRCLE_PORT`, `IRCLE_NICK`)

use anyhow::{Context, Result};
use ircle_client::{ClientConfig, RegistrationInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Binary settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Server to connect to.
    #[serde(default)]
    pub server: ServerSettings,

    /// Registration identity.
    #[serde(default)]
    pub identity: IdentitySettings,

    /// Session tunables.
    #[serde(default)]
    pub session: ClientConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Prometheus export.
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// Server address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Identity presented at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySettings {
    #[serde(default = "default_nickname")]
    pub nickname: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_realname")]
    pub realname: String,

    #[serde(default)]
    pub password: Option<String>,

    /// Requested modes, e.g. `["i"]`.
    #[serde(default)]
    pub user_modes: BTreeSet<char>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Enable the Prometheus endpoint.
    #[serde(default)]
    pub enabled: bool,

    /// Metrics port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default value functions
fn default_host() -> String {
    std::env::var("IRCLE_HOST").unwrap_or_else(|_| "localhost".to_string())
}

fn default_port() -> u16 {
    std::env::var("IRCLE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6667)
}

fn default_nickname() -> String {
    std::env::var("IRCLE_NICK").unwrap_or_else(|_| "Twoflower".to_string())
}

fn default_username() -> String {
    "ircle".to_string()
}

fn default_realname() -> String {
    "ircle user".to_string()
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            username: default_username(),
            realname: default_realname(),
            password: None,
            user_modes: BTreeSet::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Settings {
    /// Load settings from the default paths, or defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let paths = ["ircle.toml", "~/.config/ircle/ircle.toml"];

        for path in &paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Build the registration info for the session.
    #[must_use]
    pub fn registration(&self) -> RegistrationInfo {
        let identity = &self.identity;
        RegistrationInfo {
            nickname: identity.nickname.clone(),
            username: identity.username.clone(),
            realname: identity.realname.clone(),
            password: identity.password.clone(),
            user_modes: identity.user_modes.clone(),
        }
    }
}
