//! Connection lifecycle.

use std::fmt;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No session has been started.
    #[default]
    Disconnected,
    /// Opening the stream and writing the handshake.
    Connecting,
    /// Handshake written, waiting for `001`.
    Registering,
    /// The server accepted the registration.
    Registered,
    /// Ended by the peer or by a local close.
    Closed,
    /// Ended by a transport failure.
    Failed,
}

impl ConnectionState {
    /// Check whether a session is running and accepts outbound commands.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Connecting | Self::Registering | Self::Registered)
    }

    /// Get the state name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Registering => "registering",
            Self::Registered => "registered",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_states() {
        assert!(!ConnectionState::Disconnected.is_live());
        assert!(ConnectionState::Connecting.is_live());
        assert!(ConnectionState::Registering.is_live());
        assert!(ConnectionState::Registered.is_live());
        assert!(!ConnectionState::Closed.is_live());
        assert!(!ConnectionState::Failed.is_live());
    }

    #[test]
    fn test_display() {
        assert_eq!(ConnectionState::default().to_string(), "disconnected");
        assert_eq!(ConnectionState::Registered.to_string(), "registered");
    }
}
