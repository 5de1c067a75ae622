//! Numeric reply codes.
//!
//! Servers answer with three-digit codes. Codes from 400 to 599 are
//! errors and are routed under a single event key by the client.

use std::ops::RangeInclusive;

/// Codes treated as protocol errors.
pub const ERROR_RANGE: RangeInclusive<u16> = 400..=599;

macro_rules! numerics {
    ($($name:ident = $code:literal,)*) => {
        $(pub const $name: u16 = $code;)*

        /// Get the symbolic name of a known numeric code.
        #[must_use]
        pub fn name(code: u16) -> Option<&'static str> {
            match code {
                $($code => Some(stringify!($name)),)*
                _ => None,
            }
        }
    };
}

numerics! {
    RPL_WELCOME = 1,
    RPL_YOURHOST = 2,
    RPL_CREATED = 3,
    RPL_MYINFO = 4,
    RPL_ISUPPORT = 5,
    RPL_MOTDSTART = 375,
    RPL_MOTD = 372,
    RPL_ENDOFMOTD = 376,
    ERR_UNKNOWNERROR = 400,
    ERR_NOSUCHNICK = 401,
    ERR_NOSUCHSERVER = 402,
    ERR_NOSUCHCHANNEL = 403,
    ERR_CANNOTSENDTOCHAN = 404,
    ERR_TOOMANYCHANNELS = 405,
    ERR_WASNOSUCHNICK = 406,
    ERR_TOOMANYTARGETS = 407,
    ERR_NOSUCHSERVICE = 408,
    ERR_NOORIGIN = 409,
    ERR_NORECIPIENT = 411,
    ERR_NOTEXTTOSEND = 412,
    ERR_NOTOPLEVEL = 413,
    ERR_WILDTOPLEVEL = 414,
    ERR_BADMASK = 415,
    ERR_TOOMANYMATCHES = 416,
    ERR_LENGTHTRUNCATED = 419,
    ERR_UNKNOWNCOMMAND = 421,
    ERR_NOMOTD = 422,
    ERR_NOADMININFO = 423,
    ERR_FILEERROR = 424,
    ERR_NOOPERMOTD = 425,
    ERR_TOOMANYAWAY = 429,
    ERR_EVENTNICKCHANGE = 430,
    ERR_NONICKNAMEGIVEN = 431,
    ERR_ERRONEUSNICKNAME = 432,
    ERR_NICKNAMEINUSE = 433,
    ERR_SERVICENAMEINUSE = 434,
    ERR_BANONCHAN = 435,
    ERR_NICKCOLLISION = 436,
    ERR_BANNICKCHANGE = 437,
    ERR_NICKTOOFAST = 438,
    ERR_TARGETTOOFAST = 439,
    ERR_SERVICESDOWN = 440,
    ERR_USERNOTINCHANNEL = 441,
    ERR_NOTONCHANNEL = 442,
    ERR_USERONCHANNEL = 443,
    ERR_NOLOGIN = 444,
    ERR_SUMMONDISABLED = 445,
    ERR_USERSDISABLED = 446,
    ERR_NONICKCHANGE = 447,
    ERR_NOTIMPLEMENTED = 449,
    ERR_NOTREGISTERED = 451,
    ERR_IDCOLLISION = 452,
    ERR_NICKLOST = 453,
    ERR_HOSTILENAME = 455,
    ERR_ACCEPTFULL = 456,
    ERR_ACCEPTEXIST = 457,
    ERR_ACCEPTNOT = 458,
    ERR_NOHIDING = 459,
    ERR_NOTFORHALFOPS = 460,
    ERR_NEEDMOREPARAMS = 461,
    ERR_ALREADYREGISTERED = 462,
    ERR_NOPERMFORHOST = 463,
    ERR_PASSWDMISMATCH = 464,
    ERR_YOUREBANNEDCREEP = 465,
    ERR_YOUWILLBEBANNED = 466,
    ERR_KEYSET = 467,
    ERR_INVALIDUSERNAME = 468,
    ERR_LINKSET = 469,
    ERR_LINKCHANNEL = 470,
    ERR_CHANNELISFULL = 471,
    ERR_UNKNOWNMODE = 472,
    ERR_INVITEONLYCHAN = 473,
    ERR_BANNEDFROMCHAN = 474,
    ERR_BADCHANNELKEY = 475,
    ERR_BADCHANMASK = 476,
    ERR_NOCHANMODES = 477,
    ERR_BANLISTFULL = 478,
    ERR_BADCHANNAME = 479,
    ERR_NOULINE = 480,
    ERR_NOPRIVILEGES = 481,
    ERR_CHANOPRIVSNEEDED = 482,
    ERR_CANTKILLSERVER = 483,
    ERR_RESTRICTED = 484,
    ERR_CANTKICKADMIN = 485,
    ERR_NONONREG = 486,
    ERR_CHANTOORECENT = 487,
    ERR_TSLESSCHAN = 488,
    ERR_VOICENEEDED = 489,
    ERR_NOOPERHOST = 491,
    ERR_NOSERVICEHOST = 492,
    ERR_NOFEATURE = 493,
    ERR_BADFEATURE = 494,
    ERR_BADLOGTYPE = 495,
    ERR_BADLOGSYS = 496,
    ERR_BADLOGVALUE = 497,
    ERR_ISOPERLCHAN = 498,
    ERR_CHANOWNPRIVNEEDED = 499,
    ERR_UMODEUNKNOWNFLAG = 501,
    ERR_USERSDONTMATCH = 502,
    ERR_GHOSTEDCLIENT = 503,
    ERR_USERNOTONSERV = 504,
    ERR_SILELISTFULL = 511,
    ERR_TOOMANYWATCH = 512,
    ERR_BADPING = 513,
    ERR_BADEXPIRE = 515,
    ERR_DONTCHEAT = 516,
    ERR_DISABLED = 517,
    ERR_NOINVITE = 518,
    ERR_ADMONLY = 519,
    ERR_OPERONLY = 520,
    ERR_LISTSYNTAX = 521,
    ERR_WHOSYNTAX = 522,
    ERR_WHOLIMEXCEED = 523,
    ERR_QUARANTINED = 524,
    ERR_REMOTEPFX = 525,
    ERR_PFXUNROUTABLE = 526,
    ERR_BADHOSTMASK = 550,
    ERR_HOSTUNAVAIL = 551,
    ERR_USINGSLINE = 552,
    ERR_STATSSLINE = 553,
}

/// Parse a command as a numeric code.
///
/// Only exactly three ASCII digits qualify.
#[must_use]
pub fn parse_code(command: &str) -> Option<u16> {
    if command.len() == 3 && command.bytes().all(|b| b.is_ascii_digit()) {
        command.parse().ok()
    } else {
        None
    }
}

/// Check whether a numeric code is an error reply.
#[must_use]
pub fn is_error(code: u16) -> bool {
    ERROR_RANGE.contains(&code)
}

/// Check whether a command string is a numeric error reply.
#[must_use]
pub fn is_error_command(command: &str) -> bool {
    parse_code(command).is_some_and(is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("001"), Some(RPL_WELCOME));
        assert_eq!(parse_code("433"), Some(ERR_NICKNAMEINUSE));
        assert_eq!(parse_code("43"), None);
        assert_eq!(parse_code("4333"), None);
        assert_eq!(parse_code("PING"), None);
        assert_eq!(parse_code("+12"), None);
    }

    #[test]
    fn test_error_range() {
        assert!(is_error_command("400"));
        assert!(is_error_command("599"));
        assert!(!is_error_command("399"));
        assert!(!is_error_command("600"));
        assert!(!is_error_command("001"));
        assert!(!is_error_command("NOTICE"));
    }

    #[test]
    fn test_names() {
        assert_eq!(name(433), Some("ERR_NICKNAMEINUSE"));
        assert_eq!(name(1), Some("RPL_WELCOME"));
        assert_eq!(name(999), None);
    }
}
