//! Command verbs and synthetic event keys.

pub const PING: &str = "PING";
pub const PONG: &str = "PONG";
pub const NICK: &str = "NICK";
pub const USER: &str = "USER";
pub const PASS: &str = "PASS";
pub const QUIT: &str = "QUIT";
pub const ERROR: &str = "ERROR";
pub const VERSION: &str = "VERSION";
pub const ADMIN: &str = "ADMIN";
pub const INFO: &str = "INFO";
pub const PRIVMSG: &str = "PRIVMSG";
pub const NOTICE: &str = "NOTICE";
pub const JOIN: &str = "JOIN";
pub const NAMES: &str = "NAMES";
pub const PART: &str = "PART";
pub const KICK: &str = "KICK";
pub const MODE: &str = "MODE";
pub const TOPIC: &str = "TOPIC";
pub const WHO: &str = "WHO";
pub const MOTD: &str = "MOTD";
pub const RULES: &str = "RULES";
pub const OPER: &str = "OPER";
pub const LIST: &str = "LIST";
pub const LUSERS: &str = "LUSERS";
pub const STATS: &str = "STATS";
pub const USERHOST: &str = "USERHOST";
pub const AWAY: &str = "AWAY";
pub const ISON: &str = "ISON";
pub const SUMMON: &str = "SUMMON";
pub const USERS: &str = "USERS";
pub const INVITE: &str = "INVITE";
pub const WHOWAS: &str = "WHOWAS";
pub const WHOIS: &str = "WHOIS";
pub const TIME: &str = "TIME";
pub const LINKS: &str = "LINKS";
pub const MAP: &str = "MAP";
pub const COMMANDS: &str = "COMMANDS";

/// Event key for transport failures; the payload is a description.
pub const NETWORK_ERROR: &str = "network-error";

/// Event key for numeric replies in the 400-599 range; the payload is the message.
pub const PROTOCOL_ERROR: &str = "protocol-error";

/// Event key receiving every parsed message, after its specific key.
pub const ALL_MESSAGES: &str = "message";

/// Check whether a verb is one the client knows about.
///
/// Matching is case-insensitive. Numeric replies are not verbs.
#[must_use]
pub fn is_known(verb: &str) -> bool {
    const ALL: &[&str] = &[
        PING, PONG, NICK, USER, PASS, QUIT, ERROR, VERSION, ADMIN, INFO, PRIVMSG, NOTICE, JOIN,
        NAMES, PART, KICK, MODE, TOPIC, WHO, MOTD, RULES, OPER, LIST, LUSERS, STATS, USERHOST,
        AWAY, ISON, SUMMON, USERS, INVITE, WHOWAS, WHOIS, TIME, LINKS, MAP, COMMANDS,
    ];
    ALL.iter().any(|known| known.eq_ignore_ascii_case(verb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_verbs() {
        assert!(is_known("privmsg"));
        assert!(is_known("TOPIC"));
        assert!(!is_known("433"));
        assert!(!is_known(NETWORK_ERROR));
        assert!(!is_known(ALL_MESSAGES));
    }
}
