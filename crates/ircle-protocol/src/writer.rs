//! Formatting of outbound lines.
//!
//! Lines are produced as `[": " prefix " "] command [" " param]* [" :" last] "\r\n"`.
//! The last parameter always carries the `" :"` marker in [`format_line`];
//! [`format_compact`] only adds it when the parameter needs it.

use bytes::{BufMut, BytesMut};

use crate::line::{ProtocolError, MAX_PARAMETERS};

/// Line terminator.
pub const CRLF: &str = "\r\n";

/// Format a line, always marking the last parameter as trailing.
///
/// A prefix is written as `": " + prefix + " "`.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidLine`] if the command is empty, any
/// part contains CR, LF or NUL, or more than 15 parameters are given.
pub fn format_line<S: AsRef<str>>(
    prefix: Option<&str>,
    command: &str,
    parameters: &[S],
) -> Result<String, ProtocolError> {
    build(prefix, command, parameters, false)
}

/// Format a line without prefix, marking the last parameter as trailing
/// only when it is empty, contains a space or starts with `:`.
///
/// # Errors
///
/// Same conditions as [`format_line`].
pub fn format_compact<S: AsRef<str>>(
    command: &str,
    parameters: &[S],
) -> Result<String, ProtocolError> {
    build(None, command, parameters, true)
}

/// Format a line into an existing buffer.
///
/// # Errors
///
/// Same conditions as [`format_line`]; the buffer is untouched on error.
pub fn encode_into<S: AsRef<str>>(
    buf: &mut BytesMut,
    prefix: Option<&str>,
    command: &str,
    parameters: &[S],
) -> Result<(), ProtocolError> {
    let line = format_line(prefix, command, parameters)?;
    buf.reserve(line.len());
    buf.put_slice(line.as_bytes());
    Ok(())
}

/// Check whether a final parameter must be written with the `:` marker.
#[must_use]
pub fn needs_trailing_marker(parameter: &str) -> bool {
    parameter.is_empty() || parameter.contains(' ') || parameter.starts_with(':')
}

/// Reject text that would end the line early or confuse the peer.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidLine`] naming the offending part.
pub fn validate_text(text: &str, what: &str) -> Result<(), ProtocolError> {
    if text.contains(['\r', '\n', '\0']) {
        return Err(ProtocolError::InvalidLine(format!(
            "{what} contains a line break or NUL"
        )));
    }
    Ok(())
}

fn build<S: AsRef<str>>(
    prefix: Option<&str>,
    command: &str,
    parameters: &[S],
    compact: bool,
) -> Result<String, ProtocolError> {
    if command.is_empty() || command.contains(' ') {
        return Err(ProtocolError::InvalidLine(format!(
            "invalid command {command:?}"
        )));
    }
    validate_text(command, "command")?;

    if parameters.len() > MAX_PARAMETERS {
        return Err(ProtocolError::InvalidLine(format!(
            "{} parameters exceed the maximum of {MAX_PARAMETERS}",
            parameters.len()
        )));
    }

    let mut line = String::with_capacity(
        command.len()
            + parameters.iter().map(|p| p.as_ref().len() + 2).sum::<usize>()
            + prefix.map_or(0, |p| p.len() + 3)
            + CRLF.len(),
    );

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        if prefix.contains(' ') {
            return Err(ProtocolError::InvalidLine("prefix contains a space".into()));
        }
        validate_text(prefix, "prefix")?;
        line.push_str(": ");
        line.push_str(prefix);
        line.push(' ');
    }

    line.push_str(command);

    if let Some((last, middle)) = parameters.split_last() {
        for param in middle {
            let param = param.as_ref();
            validate_text(param, "parameter")?;
            line.push(' ');
            line.push_str(param);
        }

        let last = last.as_ref();
        validate_text(last, "parameter")?;
        if compact && !needs_trailing_marker(last) {
            line.push(' ');
        } else {
            line.push_str(" :");
        }
        line.push_str(last);
    }

    line.push_str(CRLF);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::parse;

    #[test]
    fn test_format_trailing_always_marked() {
        let line = format_line(None, "NICK", &["Twoflower"]).unwrap();
        assert_eq!(line, "NICK :Twoflower\r\n");

        let line = format_line(None, "USER", &["tf", "0", "*", "Twoflower the Tourist"]).unwrap();
        assert_eq!(line, "USER tf 0 * :Twoflower the Tourist\r\n");
    }

    #[test]
    fn test_format_without_parameters() {
        let params: [&str; 0] = [];
        assert_eq!(format_line(None, "QUIT", &params).unwrap(), "QUIT\r\n");
    }

    #[test]
    fn test_format_prefix_is_colon_space() {
        let line = format_line(Some("irc.example.org"), "PING", &["token"]).unwrap();
        assert_eq!(line, ": irc.example.org PING :token\r\n");

        // An empty prefix is the same as none
        let line = format_line(Some(""), "PING", &["token"]).unwrap();
        assert_eq!(line, "PING :token\r\n");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact("PONG", &["abc123"]).unwrap(), "PONG abc123\r\n");
        assert_eq!(
            format_compact("PONG", &["two words"]).unwrap(),
            "PONG :two words\r\n"
        );
        assert_eq!(format_compact("PONG", &[":x"]).unwrap(), "PONG ::x\r\n");
        assert_eq!(format_compact("PONG", &[""]).unwrap(), "PONG :\r\n");
    }

    #[test]
    fn test_format_rejects_line_breaks() {
        assert!(matches!(
            format_line(None, "PRIVMSG", &["#rust", "hi\r\nQUIT"]),
            Err(ProtocolError::InvalidLine(_))
        ));
        assert!(format_line(None, "", &["x"]).is_err());
        assert!(format_line(Some("bad prefix"), "PING", &["x"]).is_err());
    }

    #[test]
    fn test_format_rejects_too_many_parameters() {
        let params = vec!["p"; MAX_PARAMETERS + 1];
        assert!(format_line(None, "CMD", &params).is_err());
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = BytesMut::new();
        encode_into(&mut buf, None, "JOIN", &["#rust"]).unwrap();
        encode_into(&mut buf, None, "PART", &["#rust", "bye now"]).unwrap();
        assert_eq!(&buf[..], b"JOIN :#rust\r\nPART #rust :bye now\r\n");
    }

    #[test]
    fn test_write_then_parse() {
        let params = ["#rust", "alice", "a longer trailing text"];
        let wire = format_line(None, "KICK", &params).unwrap();
        let parsed = parse(wire.trim_end_matches(CRLF)).unwrap();
        assert_eq!(parsed.command, "KICK");
        assert_eq!(parsed.parameters, params);

        let params: Vec<String> = (0..14).map(|i| format!("m{i}")).collect();
        let wire = format_line(None, "CMD", &params).unwrap();
        let parsed = parse(wire.trim_end_matches(CRLF)).unwrap();
        assert_eq!(parsed.parameters, params);
    }
}
