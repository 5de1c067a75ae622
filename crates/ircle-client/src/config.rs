//! Session configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a client session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Size of each read from the stream, in bytes.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Longest accepted line, in bytes, terminator excluded.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

fn default_read_buffer_size() -> usize {
    4096
}

fn default_max_line_length() -> usize {
    ircle_transport::DEFAULT_MAX_LINE_LENGTH
}

fn default_connect_timeout() -> u64 {
    10_000 // 10 seconds
}

impl ClientConfig {
    /// Get the connect timeout as a duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: default_read_buffer_size(),
            max_line_length: default_max_line_length(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.max_line_length, 16 * 1024);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml() {
        let config: ClientConfig = toml::from_str("read_buffer_size = 256").unwrap();
        assert_eq!(config.read_buffer_size, 256);
        assert_eq!(config.connect_timeout_ms, 10_000);
    }
}
