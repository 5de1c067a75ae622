//! Participants seen on the network.
//!
//! Users and servers are shared: every message that names the same
//! participant points at the same instance, so updates made while
//! resolving a later prefix are visible through earlier messages too.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Something that can originate a message.
pub trait Entity {
    /// The name the entity is known by (nickname or hostname).
    fn name(&self) -> String;
}

/// Fold a nickname or hostname into its lookup key.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[derive(Debug, Default, Clone)]
struct UserDetails {
    nickname: String,
    username: String,
    hostname: String,
}

/// A user on the network.
///
/// The local user is the session's own identity.
#[derive(Debug)]
pub struct User {
    details: RwLock<UserDetails>,
    local: bool,
}

impl User {
    /// Create a remote user.
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self::with_kind(nickname, false)
    }

    /// Create the local user.
    #[must_use]
    pub fn local(nickname: impl Into<String>) -> Self {
        Self::with_kind(nickname, true)
    }

    fn with_kind(nickname: impl Into<String>, local: bool) -> Self {
        Self {
            details: RwLock::new(UserDetails {
                nickname: nickname.into(),
                ..UserDetails::default()
            }),
            local,
        }
    }

    /// Get the nickname.
    #[must_use]
    pub fn nickname(&self) -> String {
        self.details.read().nickname.clone()
    }

    /// Get the username (ident), empty if never seen.
    #[must_use]
    pub fn username(&self) -> String {
        self.details.read().username.clone()
    }

    /// Get the hostname, empty if never seen.
    #[must_use]
    pub fn hostname(&self) -> String {
        self.details.read().hostname.clone()
    }

    /// Check whether this is the session's own user.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn set_nickname(&self, nickname: impl Into<String>) {
        self.details.write().nickname = nickname.into();
    }

    pub fn set_username(&self, username: impl Into<String>) {
        self.details.write().username = username.into();
    }

    pub fn set_hostname(&self, hostname: impl Into<String>) {
        self.details.write().hostname = hostname.into();
    }
}

impl Entity for User {
    fn name(&self) -> String {
        self.nickname()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self.details.read();
        write!(f, "{}", details.nickname)?;
        if !details.username.is_empty() {
            write!(f, "!{}", details.username)?;
        }
        if !details.hostname.is_empty() {
            write!(f, "@{}", details.hostname)?;
        }
        Ok(())
    }
}

/// A server on the network.
#[derive(Debug)]
pub struct Server {
    hostname: String,
}

impl Server {
    /// Create a server.
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Get the hostname.
    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

impl Entity for Server {
    fn name(&self) -> String {
        self.hostname.clone()
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hostname)
    }
}

/// The origin of a message, shared with the registry.
#[derive(Debug, Clone)]
pub enum Source {
    User(Arc<User>),
    Server(Arc<Server>),
}

impl Source {
    /// Get the user, if the source is one.
    #[must_use]
    pub fn as_user(&self) -> Option<&Arc<User>> {
        match self {
            Source::User(user) => Some(user),
            Source::Server(_) => None,
        }
    }

    /// Get the server, if the source is one.
    #[must_use]
    pub fn as_server(&self) -> Option<&Arc<Server>> {
        match self {
            Source::Server(server) => Some(server),
            Source::User(_) => None,
        }
    }

    /// Check whether the source is the session's own user.
    #[must_use]
    pub fn is_local_user(&self) -> bool {
        self.as_user().is_some_and(|user| user.is_local())
    }

    /// Check whether both sources are the same instance.
    #[must_use]
    pub fn same_entity(&self, other: &Source) -> bool {
        match (self, other) {
            (Source::User(a), Source::User(b)) => Arc::ptr_eq(a, b),
            (Source::Server(a), Source::Server(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Entity for Source {
    fn name(&self) -> String {
        match self {
            Source::User(user) => user.name(),
            Source::Server(server) => server.name(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::User(user) => fmt::Display::fmt(user.as_ref(), f),
            Source::Server(server) => fmt::Display::fmt(server.as_ref(), f),
        }
    }
}
