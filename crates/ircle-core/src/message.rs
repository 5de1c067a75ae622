//! Messages as delivered to handlers.

use crate::entity::Source;
use crate::registry::Registry;
use ircle_protocol::command::PROTOCOL_ERROR;
use ircle_protocol::{numeric, Line, ProtocolError};

/// A parsed message with its resolved source.
#[derive(Debug, Clone)]
pub struct Message {
    /// Origin as written on the wire, empty if absent.
    pub prefix: String,
    /// Upper-cased command verb or three-digit numeric code.
    pub command: String,
    /// Parameters in order, at most 15.
    pub parameters: Vec<String>,
    /// The entity named by the prefix.
    pub source: Option<Source>,
    /// The line exactly as received.
    pub raw: String,
}

impl Message {
    /// Build a message from a parsed line and its resolved source.
    #[must_use]
    pub fn new(line: Line, source: Option<Source>) -> Self {
        Self {
            prefix: line.prefix,
            command: line.command,
            parameters: line.parameters,
            source,
            raw: line.raw,
        }
    }

    /// Parse a raw line and resolve its prefix through `registry`.
    ///
    /// # Errors
    ///
    /// Returns the parser's error for malformed lines.
    pub fn parse(raw: &str, registry: &Registry) -> Result<Self, ProtocolError> {
        let line = ircle_protocol::parse(raw)?;
        let source = registry.resolve_prefix(&line.prefix);
        Ok(Self::new(line, source))
    }

    /// Get a parameter by position.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Get the last parameter.
    #[must_use]
    pub fn trailing(&self) -> Option<&str> {
        self.parameters.last().map(String::as_str)
    }

    /// Get the numeric reply code, if the command is one.
    #[must_use]
    pub fn numeric(&self) -> Option<u16> {
        numeric::parse_code(&self.command)
    }

    /// Check whether this is a numeric error reply (400-599).
    #[must_use]
    pub fn is_error_reply(&self) -> bool {
        numeric::is_error_command(&self.command)
    }

    /// The event key this message is dispatched under.
    #[must_use]
    pub fn dispatch_key(&self) -> &str {
        if self.is_error_reply() {
            PROTOCOL_ERROR
        } else {
            &self.command
        }
    }
}
