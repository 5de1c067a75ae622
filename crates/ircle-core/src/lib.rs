//! # ircle-core
//!
//! Core types for the ircle IRC client.
//!
//! - **Entity** - Users and servers named by message prefixes
//! - **Registry** - Resolves prefixes to shared entities
//! - **Dispatcher** - Named-event publish/subscribe
//! - **Message** - A parsed line with its resolved source
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Line     │────▶│  Registry   │────▶│ Dispatcher  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                      prefix → Source     key → handlers
//! ```

pub mod dispatcher;
pub mod entity;
pub mod message;
pub mod registry;

pub use dispatcher::{Dispatcher, Handler, ListenerId};
pub use entity::{Entity, Server, Source, User};
pub use message::Message;
pub use registry::Registry;
