//! # ircle-transport
//!
//! Transport layer for the ircle IRC client.
//!
//! - **ByteStream** - Any tokio `AsyncRead + AsyncWrite` stream
//! - **Connector** - Opens a stream for a host and port (plain TCP built in)
//! - **LineBuffer** - Reassembles CRLF lines split across reads
//!
//! ```rust,ignore
//! use ircle_transport::{Connector, Endpoint, TcpConnector};
//!
//! let stream = TcpConnector::new()
//!     .connect(&Endpoint::new("irc.libera.chat", 6667))
//!     .await?;
//! ```

pub mod lines;
pub mod tcp;
pub mod traits;

pub use lines::{LineBuffer, DEFAULT_MAX_LINE_LENGTH};
pub use tcp::TcpConnector;
pub use traits::{BoxedStream, ByteStream, Connector, Endpoint, TransportError};
