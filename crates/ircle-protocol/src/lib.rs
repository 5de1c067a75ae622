//! # ircle-protocol
//!
//! Wire format of the IRC client protocol (RFC 1459 / RFC 2812).
//!
//! This crate knows nothing about sockets or sessions. It turns a single
//! raw line into a [`Line`] and turns a command plus parameters back into
//! a CRLF-terminated line.
//!
//! ```text
//! message =  [ ":" prefix SPACE ] command [ params ] crlf
//! params  =  *14( SPACE middle ) [ SPACE ":" trailing ]
//!         =/ 14( SPACE middle ) [ SPACE [ ":" ] trailing ]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ircle_protocol::{parse, writer};
//!
//! let line = parse(":nick!user@host PRIVMSG #rust :hello there").unwrap();
//! assert_eq!(line.command, "PRIVMSG");
//! assert_eq!(line.parameters, vec!["#rust", "hello there"]);
//!
//! let wire = writer::format_line(None, "PRIVMSG", &["#rust", "hi"]).unwrap();
//! assert_eq!(wire, "PRIVMSG #rust :hi\r\n");
//! ```

pub mod command;
pub mod line;
pub mod numeric;
pub mod writer;

pub use line::{parse, Line, ProtocolError, MAX_PARAMETERS};
pub use writer::{encode_into, format_compact, format_line};
