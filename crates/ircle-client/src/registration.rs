//! Registration handshake.

use ircle_protocol::command::{NICK, PASS, USER};
use ircle_protocol::{writer, ProtocolError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Mode bit requested in USER for `+w` (wallops).
pub const MODE_BIT_WALLOPS: u8 = 0x02;

/// Mode bit requested in USER for `+i` (invisible).
pub const MODE_BIT_INVISIBLE: u8 = 0x04;

/// Identity presented to the server when registering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    /// Connection password, sent as PASS when present and non-empty.
    #[serde(default)]
    pub password: Option<String>,
    /// Requested user modes, e.g. `i` and `w`.
    #[serde(default)]
    pub user_modes: BTreeSet<char>,
}

impl RegistrationInfo {
    /// Create registration info without password or modes.
    #[must_use]
    pub fn new(
        nickname: impl Into<String>,
        username: impl Into<String>,
        realname: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            username: username.into(),
            realname: realname.into(),
            ..Self::default()
        }
    }

    /// Set the connection password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Request a user mode.
    #[must_use]
    pub fn with_mode(mut self, mode: char) -> Self {
        self.user_modes.insert(mode);
        self
    }

    /// The USER mode bitmask: `0x02` for `w`, `0x04` for `i`.
    #[must_use]
    pub fn mode_bits(&self) -> u8 {
        let mut bits = 0;
        if self.user_modes.contains(&'w') {
            bits |= MODE_BIT_WALLOPS;
        }
        if self.user_modes.contains(&'i') {
            bits |= MODE_BIT_INVISIBLE;
        }
        bits
    }

    /// Build the handshake: optional PASS, then NICK, then USER.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidLine`] if the nickname or username
    /// is empty or contains a space, or any field breaks the line.
    pub fn handshake_lines(&self) -> Result<Vec<String>, ProtocolError> {
        for (value, what) in [(&self.nickname, "nickname"), (&self.username, "username")] {
            if value.is_empty() || value.contains(' ') {
                return Err(ProtocolError::InvalidLine(format!("invalid {what} {value:?}")));
            }
        }

        let mut lines = Vec::with_capacity(3);
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            lines.push(writer::format_line(None, PASS, &[password])?);
        }
        lines.push(writer::format_line(None, NICK, &[self.nickname.as_str()])?);

        let mode_bits = self.mode_bits().to_string();
        lines.push(writer::format_line(
            None,
            USER,
            &[
                self.username.as_str(),
                mode_bits.as_str(),
                "*",
                self.realname.as_str(),
            ],
        )?);

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits() {
        let info = RegistrationInfo::new("tf", "tf", "Twoflower");
        assert_eq!(info.mode_bits(), 0);
        assert_eq!(info.clone().with_mode('w').mode_bits(), 0x02);
        assert_eq!(info.clone().with_mode('i').mode_bits(), 0x04);
        assert_eq!(info.clone().with_mode('i').with_mode('w').mode_bits(), 0x06);
        assert_eq!(info.with_mode('o').mode_bits(), 0);
    }

    #[test]
    fn test_handshake_without_password() {
        let info = RegistrationInfo::new("Twoflower", "tf", "Twoflower the Tourist");
        assert_eq!(
            info.handshake_lines().unwrap(),
            vec![
                "NICK :Twoflower\r\n",
                "USER tf 0 * :Twoflower the Tourist\r\n",
            ]
        );
    }

    #[test]
    fn test_handshake_with_password_and_modes() {
        let info = RegistrationInfo::new("Rincewind", "wizzard", "Rincewind")
            .with_password("octarine")
            .with_mode('i');
        assert_eq!(
            info.handshake_lines().unwrap(),
            vec![
                "PASS :octarine\r\n",
                "NICK :Rincewind\r\n",
                "USER wizzard 4 * :Rincewind\r\n",
            ]
        );
    }

    #[test]
    fn test_empty_password_is_skipped() {
        let info = RegistrationInfo::new("a", "b", "c").with_password("");
        assert_eq!(info.handshake_lines().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_identity() {
        assert!(RegistrationInfo::new("", "u", "r").handshake_lines().is_err());
        assert!(RegistrationInfo::new("n", "bad user", "r")
            .handshake_lines()
            .is_err());
    }

    #[test]
    fn test_from_toml() {
        let info: RegistrationInfo = toml::from_str(
            r#"
            nickname = "Twoflower"
            username = "tf"
            realname = "Twoflower the Tourist"
            user_modes = ["i", "w"]
        "#,
        )
        .unwrap();
        assert_eq!(info.mode_bits(), 0x06);
        assert!(info.password.is_none());
    }
}
