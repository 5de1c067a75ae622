//! Connection session.
//!
//! A [`Client`] owns the registry and dispatcher for one connection at a
//! time. [`Client::connect`] (or [`Client::run`] with a ready stream)
//! writes the registration handshake and then drives a single loop that
//! reads lines from the stream and writes queued commands, until the
//! stream ends.

use crate::config::ClientConfig;
use crate::metrics;
use crate::registration::RegistrationInfo;
use crate::sender::{Outbound, Sender};
use crate::state::ConnectionState;
use ircle_core::{Dispatcher, ListenerId, Message, Registry, Source, User};
use ircle_protocol::command::{
    self, ALL_MESSAGES, NETWORK_ERROR, NICK, PING, PONG, PROTOCOL_ERROR,
};
use ircle_protocol::numeric::{self, RPL_WELCOME};
use ircle_protocol::{writer, ProtocolError};
use ircle_transport::{ByteStream, Connector, Endpoint, LineBuffer, TcpConnector, TransportError};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, MutexGuard};
use tracing::{debug, info, trace, warn};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Not connected")]
    NotConnected,

    #[error("A session is already running")]
    AlreadyRunning,
}

/// How a session loop ended.
#[derive(Debug)]
enum SessionEnd {
    PeerClosed,
    LocalClose,
    Failed(TransportError),
}

type Outbox = mpsc::UnboundedReceiver<Outbound>;

/// An IRC client session.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

struct Shared {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    dispatcher: Dispatcher,
    registry: Registry,
    state: Arc<Mutex<ConnectionState>>,
    sender: Sender,
    /// Held by the running session loop.
    outbox: tokio::sync::Mutex<Outbox>,
}

impl Client {
    /// Create a client that connects over plain TCP.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let connector = Arc::new(TcpConnector::with_timeout(config.connect_timeout()));
        Self::with_connector(config, connector)
    }

    /// Create a client with a custom connector.
    #[must_use]
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(ConnectionState::Disconnected));

        Self {
            shared: Arc::new(Shared {
                config,
                connector,
                dispatcher: Dispatcher::new(),
                registry: Registry::new(),
                sender: Sender::new(tx, state.clone()),
                state,
                outbox: tokio::sync::Mutex::new(rx),
            }),
        }
    }

    /// Register a handler for any event key and payload type.
    ///
    /// Keys are normalized as in [`Client::on_message`].
    pub fn on<P, F>(&self, key: impl Into<String>, handler: F) -> ListenerId
    where
        P: Any,
        F: Fn(&P) + Send + Sync + 'static,
    {
        let key: String = key.into();
        self.shared.dispatcher.on(event_key(&key), handler)
    }

    /// Register a handler for messages with the given command.
    ///
    /// Verbs are matched case-insensitively; numerics by their three
    /// digits. `"message"` receives every message.
    pub fn on_message<F>(&self, key: &str, handler: F) -> ListenerId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.shared.dispatcher.on::<Message, _>(event_key(key), handler)
    }

    /// Register a handler for numeric error replies (400-599).
    pub fn on_protocol_error<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.shared.dispatcher.on::<Message, _>(PROTOCOL_ERROR, handler)
    }

    /// Register a handler for transport failures and stream closes.
    pub fn on_network_error<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared
            .dispatcher
            .on::<String, _>(NETWORK_ERROR, move |description: &String| handler(description))
    }

    /// Remove a handler.
    pub fn off(&self, id: ListenerId) -> bool {
        self.shared.dispatcher.off(id)
    }

    /// Get a handle for queueing commands.
    #[must_use]
    pub fn sender(&self) -> Sender {
        self.shared.sender.clone()
    }

    /// Get the session state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.lock()
    }

    /// Get the session configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }

    /// Get the entity registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.shared.registry
    }

    /// Get the event dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.shared.dispatcher
    }

    /// Get the session's own user, once the handshake was written.
    #[must_use]
    pub fn local_user(&self) -> Option<Arc<User>> {
        self.shared.registry.local_user()
    }

    /// Queue a raw line. See [`Sender::send_raw`].
    ///
    /// # Errors
    ///
    /// Fails if the line contains CR, LF or NUL, or no session is live.
    pub fn send_raw(&self, line: &str) -> Result<(), ClientError> {
        self.shared.sender.send_raw(line)
    }

    /// Queue a command. See [`Sender::write`].
    ///
    /// # Errors
    ///
    /// Fails if the command cannot be formatted or no session is live.
    pub fn write<S: AsRef<str>>(&self, command: &str, parameters: &[S]) -> Result<(), ClientError> {
        self.shared.sender.write(command, parameters)
    }

    /// Ask the running session to shut the stream down.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] if no session is live.
    pub fn close(&self) -> Result<(), ClientError> {
        self.shared.sender.close()
    }

    /// Connect to `host:port`, register, and run the session until the
    /// stream ends.
    ///
    /// Returns `Ok(())` when the peer or the application closed the
    /// connection. Every ending is also reported as a `network-error`
    /// event.
    ///
    /// # Errors
    ///
    /// Fails if the registration info is invalid, a session is already
    /// running, the connection cannot be opened, or the stream fails.
    pub async fn connect(
        &self,
        host: &str,
        port: u16,
        info: &RegistrationInfo,
    ) -> Result<(), ClientError> {
        let handshake = info.handshake_lines()?;
        let mut outbox = self.claim()?;
        self.begin(&mut outbox);

        let endpoint = Endpoint::new(host, port);
        info!(
            endpoint = %endpoint,
            connector = self.shared.connector.name(),
            "Connecting"
        );

        let stream = match self.shared.connector.connect(&endpoint).await {
            Ok(stream) => stream,
            Err(e) => {
                self.fail(&e);
                return Err(e.into());
            }
        };

        self.session(&mut outbox, stream, &handshake, info).await
    }

    /// Register and run the session over an already open stream.
    ///
    /// # Errors
    ///
    /// See [`Client::connect`].
    pub async fn run<S: ByteStream>(
        &self,
        stream: S,
        info: &RegistrationInfo,
    ) -> Result<(), ClientError> {
        let handshake = info.handshake_lines()?;
        let mut outbox = self.claim()?;
        self.begin(&mut outbox);

        self.session(&mut outbox, stream, &handshake, info).await
    }

    fn claim(&self) -> Result<MutexGuard<'_, Outbox>, ClientError> {
        self.shared
            .outbox
            .try_lock()
            .map_err(|_| ClientError::AlreadyRunning)
    }

    /// Reset per-session state.
    fn begin(&self, outbox: &mut Outbox) {
        while outbox.try_recv().is_ok() {}
        self.shared.registry.clear();
        self.set_state(ConnectionState::Connecting);
    }

    async fn session<S: ByteStream>(
        &self,
        outbox: &mut Outbox,
        stream: S,
        handshake: &[String],
        info: &RegistrationInfo,
    ) -> Result<(), ClientError> {
        let (mut reader, mut writer) = tokio::io::split(stream);

        for line in handshake {
            debug!(line = %line.trim_end(), "Handshake");
            if let Err(e) = write_line(&mut writer, line).await {
                self.fail(&e);
                return Err(e.into());
            }
        }
        self.shared
            .registry
            .register_local_user(&info.nickname, &info.username);
        self.set_state(ConnectionState::Registering);
        info!(nickname = %info.nickname, "Registering");

        let mut lines = LineBuffer::with_max_line_length(self.shared.config.max_line_length);
        let mut chunk = vec![0u8; self.shared.config.read_buffer_size.max(1)];

        let end = loop {
            let step = tokio::select! {
                biased;

                outbound = outbox.recv() => match outbound {
                    Some(Outbound::Line(line)) => {
                        write_line(&mut writer, &line).await.err().map(SessionEnd::Failed)
                    }
                    Some(Outbound::Close) | None => Some(SessionEnd::LocalClose),
                },

                read = reader.read(&mut chunk) => match read {
                    Ok(0) => Some(SessionEnd::PeerClosed),
                    Ok(n) => self.handle_bytes(&chunk[..n], &mut lines, &mut writer).await,
                    Err(e) => Some(SessionEnd::Failed(TransportError::ReceiveFailed(e.to_string()))),
                },
            };

            if let Some(end) = step {
                break end;
            }
        };

        self.finish(end, &mut writer).await
    }

    async fn handle_bytes<W: AsyncWrite + Unpin>(
        &self,
        data: &[u8],
        lines: &mut LineBuffer,
        writer: &mut W,
    ) -> Option<SessionEnd> {
        metrics::record_bytes_received(data.len());
        lines.extend(data);

        loop {
            match lines.next_line() {
                Ok(Some(line)) => {
                    if let Err(e) = self.handle_line(&line, writer).await {
                        return Some(SessionEnd::Failed(e));
                    }
                }
                Ok(None) => return None,
                Err(e) => return Some(SessionEnd::Failed(e)),
            }
        }
    }

    async fn handle_line<W: AsyncWrite + Unpin>(
        &self,
        line: &str,
        writer: &mut W,
    ) -> Result<(), TransportError> {
        trace!(line = %line, "<-");
        metrics::record_line_received();

        let message = match Message::parse(line, &self.shared.registry) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, line = %line, "Dropping malformed line");
                metrics::record_parse_failure();
                return Ok(());
            }
        };

        if message.command == PING {
            answer_ping(&message, writer).await?;
        }
        if message.numeric() == Some(RPL_WELCOME) {
            self.welcome(&message);
        }
        if message.is_error_reply() {
            self.note_error_reply(&message);
        } else if message.numeric().is_none() && !command::is_known(&message.command) {
            trace!(command = %message.command, "Unrecognized command");
        }

        self.shared.dispatcher.emit(message.dispatch_key(), &message);
        self.shared.dispatcher.emit(ALL_MESSAGES, &message);

        if message.command == NICK {
            self.follow_nick_change(&message);
        }
        Ok(())
    }

    fn note_error_reply(&self, message: &Message) {
        metrics::record_protocol_error(&message.command);

        let name = message
            .numeric()
            .and_then(numeric::name)
            .unwrap_or("unknown");
        if self.shared.dispatcher.has_listeners(PROTOCOL_ERROR) {
            debug!(code = %message.command, name, "Error reply");
        } else {
            warn!(code = %message.command, name, reply = %message.raw, "Unhandled error reply");
        }
    }

    fn welcome(&self, message: &Message) {
        self.set_state(ConnectionState::Registered);

        if let (Some(confirmed), Some(local)) = (message.param(0), self.local_user()) {
            let current = local.nickname();
            if current != confirmed {
                debug!(from = %current, to = %confirmed, "Server assigned nickname");
                self.shared.registry.rename_user(&current, confirmed);
            }
        }

        info!(nickname = %message.param(0).unwrap_or_default(), "Registered");
    }

    fn follow_nick_change(&self, message: &Message) {
        let user = message.source.as_ref().and_then(Source::as_user);
        if let (Some(user), Some(new)) = (user, message.param(0)) {
            let old = user.nickname();
            self.shared.registry.rename_user(&old, new);
            debug!(from = %old, to = %new, "Nickname changed");
        }
    }

    async fn finish<W: AsyncWrite + Unpin>(
        &self,
        end: SessionEnd,
        writer: &mut W,
    ) -> Result<(), ClientError> {
        match end {
            SessionEnd::PeerClosed => {
                self.set_state(ConnectionState::Closed);
                info!("Connection closed by peer");
                self.network_error(&TransportError::ConnectionClosed.to_string());
                Ok(())
            }
            SessionEnd::LocalClose => {
                if let Err(e) = writer.shutdown().await {
                    debug!(error = %e, "Shutdown failed");
                }
                self.set_state(ConnectionState::Closed);
                info!("Connection closed");
                self.network_error("Connection closed locally");
                Ok(())
            }
            SessionEnd::Failed(error) => {
                if let Err(e) = writer.shutdown().await {
                    debug!(error = %e, "Shutdown failed");
                }
                self.fail(&error);
                Err(error.into())
            }
        }
    }

    fn fail(&self, error: &TransportError) {
        self.set_state(ConnectionState::Failed);
        warn!(error = %error, "Session failed");
        self.network_error(&error.to_string());
    }

    fn network_error(&self, description: &str) {
        metrics::record_network_error();
        self.shared
            .dispatcher
            .emit(NETWORK_ERROR, &description.to_string());
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = std::mem::replace(&mut *self.shared.state.lock(), state);
        if previous != state {
            trace!(from = %previous, to = %state, "State changed");
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state())
            .field("connector", &self.shared.connector.name())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

/// Normalize a handler key: verbs are upper-cased, event names kept.
fn event_key(key: &str) -> String {
    match key {
        NETWORK_ERROR | PROTOCOL_ERROR | ALL_MESSAGES => key.to_string(),
        _ => key.to_ascii_uppercase(),
    }
}

async fn answer_ping<W: AsyncWrite + Unpin>(
    message: &Message,
    writer: &mut W,
) -> Result<(), TransportError> {
    let Some(token) = message.param(0) else {
        warn!("PING without parameters, not replying");
        return Ok(());
    };

    match writer::format_compact(PONG, &[token]) {
        Ok(reply) => write_line(writer, &reply).await,
        Err(e) => {
            warn!(error = %e, "Cannot answer PING");
            Ok(())
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<(), TransportError> {
    trace!(line = %line.trim_end(), "->");
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| TransportError::SendFailed(e.to_string()))?;
    metrics::record_line_sent(line.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_key() {
        assert_eq!(event_key("privmsg"), "PRIVMSG");
        assert_eq!(event_key("433"), "433");
        assert_eq!(event_key(NETWORK_ERROR), NETWORK_ERROR);
        assert_eq!(event_key(PROTOCOL_ERROR), PROTOCOL_ERROR);
        assert_eq!(event_key(ALL_MESSAGES), ALL_MESSAGES);
    }

    #[test]
    fn test_new_client_is_disconnected() {
        let client = Client::new(ClientConfig::default());
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(client.local_user().is_none());
        assert!(matches!(
            client.send_raw("PING :x"),
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_invalid_registration_is_rejected_early() {
        let client = Client::new(ClientConfig::default());
        let (stream, _peer) = tokio::io::duplex(64);
        let info = RegistrationInfo::new("", "u", "r");

        assert!(matches!(
            client.run(stream, &info).await,
            Err(ClientError::Protocol(_))
        ));
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
