//! Outbound command handle.

use crate::client::ClientError;
use crate::state::ConnectionState;
use ircle_protocol::command::{JOIN, NICK, NOTICE, PART, PONG, PRIVMSG, QUIT};
use ircle_protocol::writer;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

/// Work queued for the session loop.
#[derive(Debug)]
pub(crate) enum Outbound {
    /// A complete wire line, CRLF included.
    Line(String),
    /// Shut the stream down and end the session.
    Close,
}

/// Cloneable handle that queues commands for the session loop.
///
/// Methods never block or `.await`, so they can be called from event
/// handlers and from other threads. Lines are written in the order they
/// were queued.
#[derive(Debug, Clone)]
pub struct Sender {
    tx: mpsc::UnboundedSender<Outbound>,
    state: Arc<Mutex<ConnectionState>>,
}

impl Sender {
    pub(crate) fn new(
        tx: mpsc::UnboundedSender<Outbound>,
        state: Arc<Mutex<ConnectionState>>,
    ) -> Self {
        Self { tx, state }
    }

    /// Queue a raw line; CRLF is appended.
    ///
    /// # Errors
    ///
    /// Fails if the line contains CR, LF or NUL, or no session is live.
    pub fn send_raw(&self, line: &str) -> Result<(), ClientError> {
        writer::validate_text(line, "line")?;
        self.push(format!("{line}{}", writer::CRLF))
    }

    /// Queue a command. The last parameter is sent as trailing.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be formatted or no session is live.
    pub fn write<S: AsRef<str>>(&self, command: &str, parameters: &[S]) -> Result<(), ClientError> {
        self.push(writer::format_line(None, command, parameters)?)
    }

    /// Queue a command carrying a prefix.
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be formatted or no session is live.
    pub fn write_with_prefix<S: AsRef<str>>(
        &self,
        prefix: &str,
        command: &str,
        parameters: &[S],
    ) -> Result<(), ClientError> {
        self.push(writer::format_line(Some(prefix), command, parameters)?)
    }

    /// Send a PRIVMSG to a nickname or channel.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn privmsg(&self, target: &str, text: &str) -> Result<(), ClientError> {
        self.write(PRIVMSG, &[target, text])
    }

    /// Send a NOTICE to a nickname or channel.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn notice(&self, target: &str, text: &str) -> Result<(), ClientError> {
        self.write(NOTICE, &[target, text])
    }

    /// Join a channel.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn join(&self, channel: &str) -> Result<(), ClientError> {
        self.write(JOIN, &[channel])
    }

    /// Leave a channel, optionally with a reason.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn part(&self, channel: &str, reason: Option<&str>) -> Result<(), ClientError> {
        match reason {
            Some(reason) => self.write(PART, &[channel, reason]),
            None => self.write(PART, &[channel]),
        }
    }

    /// Request a new nickname.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn nick(&self, nickname: &str) -> Result<(), ClientError> {
        self.write(NICK, &[nickname])
    }

    /// Quit, optionally with a message. The server closes the stream.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn quit(&self, reason: Option<&str>) -> Result<(), ClientError> {
        match reason {
            Some(reason) => self.write(QUIT, &[reason]),
            None => self.write::<&str>(QUIT, &[]),
        }
    }

    /// Answer a keep-alive token.
    ///
    /// # Errors
    ///
    /// See [`Sender::write`].
    pub fn pong(&self, token: &str) -> Result<(), ClientError> {
        self.push(writer::format_compact(PONG, &[token])?)
    }

    /// Ask the session loop to shut the stream down.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] if no session is live.
    pub fn close(&self) -> Result<(), ClientError> {
        self.ensure_live()?;
        self.tx
            .send(Outbound::Close)
            .map_err(|_| ClientError::NotConnected)
    }

    /// Get the current session state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    fn ensure_live(&self) -> Result<(), ClientError> {
        if self.state().is_live() {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn push(&self, line: String) -> Result<(), ClientError> {
        self.ensure_live()?;
        trace!(line = %line.trim_end(), "Queued");
        self.tx
            .send(Outbound::Line(line))
            .map_err(|_| ClientError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(state: ConnectionState) -> (Sender, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Sender::new(tx, Arc::new(Mutex::new(state))), rx)
    }

    fn next_line(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> String {
        match rx.try_recv().unwrap() {
            Outbound::Line(line) => line,
            Outbound::Close => panic!("expected a line"),
        }
    }

    #[test]
    fn test_not_connected() {
        let (sender, _rx) = sender(ConnectionState::Disconnected);
        assert!(matches!(
            sender.privmsg("#rust", "hi"),
            Err(ClientError::NotConnected)
        ));
        assert!(matches!(sender.close(), Err(ClientError::NotConnected)));
    }

    #[test]
    fn test_commands_are_formatted() {
        let (sender, mut rx) = sender(ConnectionState::Registered);

        sender.privmsg("#rust", "hello there").unwrap();
        sender.join("#rust").unwrap();
        sender.part("#rust", None).unwrap();
        sender.quit(None).unwrap();
        sender.pong("abc123").unwrap();
        sender.send_raw("MODE Twoflower +i").unwrap();

        assert_eq!(next_line(&mut rx), "PRIVMSG #rust :hello there\r\n");
        assert_eq!(next_line(&mut rx), "JOIN :#rust\r\n");
        assert_eq!(next_line(&mut rx), "PART :#rust\r\n");
        assert_eq!(next_line(&mut rx), "QUIT\r\n");
        assert_eq!(next_line(&mut rx), "PONG abc123\r\n");
        assert_eq!(next_line(&mut rx), "MODE Twoflower +i\r\n");
    }

    #[test]
    fn test_raw_line_break_rejected() {
        let (sender, mut rx) = sender(ConnectionState::Registered);
        assert!(matches!(
            sender.send_raw("PRIVMSG #a :x\r\nQUIT"),
            Err(ClientError::Protocol(_))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_close_is_queued() {
        let (sender, mut rx) = sender(ConnectionState::Connecting);
        sender.close().unwrap();
        assert!(matches!(rx.try_recv().unwrap(), Outbound::Close));
    }
}
