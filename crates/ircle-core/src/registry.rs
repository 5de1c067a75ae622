//! Entity registry.
//!
//! The registry owns every user and server seen during a session and
//! resolves message prefixes to them. Names are matched case-insensitively;
//! each lookup-or-insert is a single map entry operation.

use crate::entity::{fold_name, Server, Source, User};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Users and servers known to a session.
#[derive(Debug, Default)]
pub struct Registry {
    /// Users indexed by folded nickname.
    users: DashMap<String, Arc<User>>,
    /// Servers indexed by folded hostname.
    servers: DashMap<String, Arc<Server>>,
    /// The session's own user, once registered.
    local_user: RwLock<Option<Arc<User>>>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a message prefix to the entity it names.
    ///
    /// Rules, first match wins:
    ///
    /// 1. `nick!user@host` or `nick!user`: a user, whose username and
    ///    hostname are updated from the prefix.
    /// 2. `nick@host`: a user, whose hostname is updated.
    /// 3. anything containing `.`: a server.
    /// 4. otherwise a bare nickname.
    ///
    /// An empty prefix names nothing.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<Source> {
        if prefix.is_empty() {
            return None;
        }

        if let Some((nickname, rest)) = prefix.split_once('!') {
            let user = self.user_from_nickname(nickname);
            match rest.split_once('@') {
                Some((username, hostname)) => {
                    user.set_username(username);
                    user.set_hostname(hostname);
                }
                None => user.set_username(rest),
            }
            return Some(Source::User(user));
        }

        if let Some((nickname, hostname)) = prefix.split_once('@') {
            let user = self.user_from_nickname(nickname);
            user.set_hostname(hostname);
            return Some(Source::User(user));
        }

        if prefix.contains('.') {
            return Some(Source::Server(self.server_from_hostname(prefix)));
        }

        Some(Source::User(self.user_from_nickname(prefix)))
    }

    /// Look up a user by nickname, creating it on first sight.
    pub fn user_from_nickname(&self, nickname: &str) -> Arc<User> {
        self.users
            .entry(fold_name(nickname))
            .or_insert_with(|| {
                debug!(nickname = %nickname, "New user");
                Arc::new(User::new(nickname))
            })
            .value()
            .clone()
    }

    /// Look up a server by hostname, creating it on first sight.
    pub fn server_from_hostname(&self, hostname: &str) -> Arc<Server> {
        self.servers
            .entry(fold_name(hostname))
            .or_insert_with(|| {
                debug!(hostname = %hostname, "New server");
                Arc::new(Server::new(hostname))
            })
            .value()
            .clone()
    }

    /// Register the session's own user.
    ///
    /// Any user already known under the nickname is replaced.
    pub fn register_local_user(&self, nickname: &str, username: &str) -> Arc<User> {
        let user = Arc::new(User::local(nickname));
        user.set_username(username);

        self.users.insert(fold_name(nickname), user.clone());
        *self.local_user.write() = Some(user.clone());

        debug!(nickname = %nickname, "Registered local user");
        user
    }

    /// Get the session's own user.
    #[must_use]
    pub fn local_user(&self) -> Option<Arc<User>> {
        self.local_user.read().clone()
    }

    /// Get a known user.
    #[must_use]
    pub fn user(&self, nickname: &str) -> Option<Arc<User>> {
        self.users.get(&fold_name(nickname)).map(|u| u.value().clone())
    }

    /// Get a known server.
    #[must_use]
    pub fn server(&self, hostname: &str) -> Option<Arc<Server>> {
        self.servers.get(&fold_name(hostname)).map(|s| s.value().clone())
    }

    /// Move a user to a new nickname.
    ///
    /// Returns the renamed user, or `None` if the old nickname is unknown.
    /// A different user already stored under the new nickname is replaced.
    pub fn rename_user(&self, old: &str, new: &str) -> Option<Arc<User>> {
        let (_, user) = self.users.remove(&fold_name(old))?;
        user.set_nickname(new);
        self.users.insert(fold_name(new), user.clone());

        trace!(old = %old, new = %new, "Renamed user");
        Some(user)
    }

    /// Get the number of known users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Get the number of known servers.
    #[must_use]
    pub fn server_count(&self) -> usize {
        self.servers.len()
    }

    /// Forget every entity, including the local user.
    pub fn clear(&self) {
        self.users.clear();
        self.servers.clear();
        *self.local_user.write() = None;
    }
}
