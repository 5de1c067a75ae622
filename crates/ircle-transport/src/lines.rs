//! Reassembly of protocol lines from arbitrary reads.
//!
//! A read may end in the middle of a line. The unterminated tail stays
//! in the buffer and is completed by the next read.

use bytes::BytesMut;

use crate::traits::TransportError;

/// Default limit for a single line, terminator excluded.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 16 * 1024;

/// Buffers received bytes and yields complete lines.
#[derive(Debug)]
pub struct LineBuffer {
    pending: BytesMut,
    max_line_length: usize,
}

impl LineBuffer {
    /// Create a buffer with the default line limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a buffer with a custom line limit.
    #[must_use]
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            pending: BytesMut::with_capacity(1024),
            max_line_length,
        }
    }

    /// Append received bytes.
    pub fn extend(&mut self, data: &[u8]) {
        self.pending.extend_from_slice(data);
    }

    /// Take the next complete line, without its `\n` or trailing `\r`.
    ///
    /// Empty lines are skipped. Returns `Ok(None)` when only a partial
    /// line (or nothing) is buffered.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::LineTooLong`] when a line exceeds the
    /// limit; the offending bytes are discarded.
    pub fn next_line(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let Some(newline) = self.pending.iter().position(|&b| b == b'\n') else {
                if self.pending.len() > self.max_line_length {
                    let length = self.pending.len();
                    self.pending.clear();
                    return Err(TransportError::LineTooLong(length));
                }
                return Ok(None);
            };

            let mut line = self.pending.split_to(newline + 1);
            line.truncate(newline);
            if line.last() == Some(&b'\r') {
                line.truncate(newline - 1);
            }

            if line.len() > self.max_line_length {
                return Err(TransportError::LineTooLong(line.len()));
            }
            if line.is_empty() {
                continue;
            }

            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }
    }

    /// Get the buffered bytes of the unfinished line.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Check whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
