//! # ircle-client
//!
//! Session layer for the ircle IRC client: registration handshake,
//! receive loop, keep-alive replies and outbound commands.
//!
//! ```rust,ignore
//! use ircle_client::{Client, ClientConfig, RegistrationInfo};
//!
//! let client = Client::new(ClientConfig::default());
//! let sender = client.sender();
//!
//! client.on_message("001", move |_| {
//!     let _ = sender.join("#rust");
//! });
//! client.on_message("PRIVMSG", |msg| {
//!     println!("{}: {}", msg.prefix, msg.trailing().unwrap_or_default());
//! });
//! client.on_network_error(|description| eprintln!("{description}"));
//!
//! let info = RegistrationInfo::new("Twoflower", "tf", "Twoflower the Tourist");
//! client.connect("irc.libera.chat", 6667, &info).await?;
//! ```

pub mod client;
pub mod config;
pub mod metrics;
pub mod registration;
pub mod sender;
pub mod state;

pub use client::{Client, ClientError};
pub use config::ClientConfig;
pub use registration::RegistrationInfo;
pub use sender::Sender;
pub use state::ConnectionState;

pub use ircle_core::{Entity, ListenerId, Message, Registry, Server, Source, User};
pub use ircle_protocol::command;
