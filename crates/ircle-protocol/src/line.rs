//! Parsing of a single raw IRC line.
//!
//! The parser works on one line at a time with the CR/LF terminator
//! already removed. Line reassembly from a byte stream lives in the
//! transport crate.

use thiserror::Error;

use crate::numeric;

/// Maximum number of parameters a message may carry.
pub const MAX_PARAMETERS: usize = 15;

/// Protocol errors that can occur while parsing or formatting lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The line had no content at all.
    #[error("Empty line")]
    EmptyLine,

    /// No command token could be found.
    #[error("Missing command in line: {0:?}")]
    MissingCommand(String),

    /// The line cannot be put on the wire as given.
    #[error("Invalid line: {0}")]
    InvalidLine(String),
}

/// A parsed IRC line.
///
/// `prefix` is empty when the line had none. `command` is upper-cased;
/// numeric replies keep their three digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Origin of the message, without the leading colon.
    pub prefix: String,
    /// Upper-cased command verb or numeric reply code.
    pub command: String,
    /// Parameters in order, the trailing parameter last.
    pub parameters: Vec<String>,
    /// The line exactly as received.
    pub raw: String,
}

impl Line {
    /// Get the numeric reply code, if the command is one.
    #[must_use]
    pub fn numeric(&self) -> Option<u16> {
        numeric::parse_code(&self.command)
    }
}

/// Parse a raw line (without CR/LF) into its components.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyLine`] for an empty line and
/// [`ProtocolError::MissingCommand`] when no command token exists.
pub fn parse(line: &str) -> Result<Line, ProtocolError> {
    if line.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }

    let (prefix, rest) = match line.strip_prefix(':') {
        Some(after_colon) => match after_colon.split_once(' ') {
            Some((prefix, rest)) => (prefix, rest),
            // A prefix with nothing after it
            None => return Err(ProtocolError::MissingCommand(line.to_string())),
        },
        None => ("", line),
    };

    let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));
    if command.is_empty() {
        return Err(ProtocolError::MissingCommand(line.to_string()));
    }

    Ok(Line {
        prefix: prefix.to_string(),
        command: command.to_ascii_uppercase(),
        parameters: parse_parameters(params),
        raw: line.to_string(),
    })
}

/// Split the parameter region following the command.
fn parse_parameters(params: &str) -> Vec<String> {
    let mut parameters = Vec::new();
    if params.is_empty() {
        return parameters;
    }

    let mut rest = params;
    loop {
        // The trailing parameter, or the 15th which takes the unsplit tail.
        if rest.starts_with(':') || parameters.len() == MAX_PARAMETERS - 1 {
            let trailing = rest.strip_prefix(':').unwrap_or(rest);
            parameters.push(trailing.to_string());
            break;
        }

        match rest.split_once(' ') {
            Some((middle, tail)) => {
                parameters.push(middle.to_string());
                rest = tail;
            }
            None => {
                parameters.push(rest.to_string());
                break;
            }
        }
    }

    parameters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trailing_parameter() {
        let line = parse("CMD a b :c d e").unwrap();
        assert_eq!(line.command, "CMD");
        assert_eq!(line.parameters, vec!["a", "b", "c d e"]);
        assert!(line.prefix.is_empty());
    }

    #[test]
    fn test_parse_prefix() {
        let line = parse(":Alice!alice@example.org PRIVMSG #rust :hi all").unwrap();
        assert_eq!(line.prefix, "Alice!alice@example.org");
        assert_eq!(line.command, "PRIVMSG");
        assert_eq!(line.parameters, vec!["#rust", "hi all"]);
        assert_eq!(line.raw, ":Alice!alice@example.org PRIVMSG #rust :hi all");
    }

    #[test]
    fn test_parse_uppercases_command_but_keeps_raw() {
        let line = parse("privmsg bob :Hello").unwrap();
        assert_eq!(line.command, "PRIVMSG");
        assert_eq!(line.raw, "privmsg bob :Hello");
    }

    #[test]
    fn test_parse_numeric() {
        let line = parse(":server 433 * newnick :Nickname is already in use").unwrap();
        assert_eq!(line.command, "433");
        assert_eq!(line.numeric(), Some(433));
        assert_eq!(
            line.parameters,
            vec!["*", "newnick", "Nickname is already in use"]
        );
    }

    #[test]
    fn test_parse_whole_region_trailing() {
        let line = parse("PING :abc123").unwrap();
        assert_eq!(line.parameters, vec!["abc123"]);

        let line = parse("NOTICE :spaced out text").unwrap();
        assert_eq!(line.parameters, vec!["spaced out text"]);
    }

    #[test]
    fn test_parse_colon_inside_middle_is_not_trailing() {
        let line = parse("CMD a:b c").unwrap();
        assert_eq!(line.parameters, vec!["a:b", "c"]);
    }

    #[test]
    fn test_parse_zero_parameters() {
        let line = parse("QUIT").unwrap();
        assert_eq!(line.command, "QUIT");
        assert!(line.parameters.is_empty());

        let line = parse(":server.example.org QUIT").unwrap();
        assert!(line.parameters.is_empty());

        let line = parse("QUIT ").unwrap();
        assert!(line.parameters.is_empty());
    }

    #[test]
    fn test_parse_empty_trailing() {
        let line = parse("TOPIC #rust :").unwrap();
        assert_eq!(line.parameters, vec!["#rust", ""]);
    }

    #[test]
    fn test_parse_parameter_cap() {
        let tokens: Vec<String> = (1..=20).map(|i| format!("t{i}")).collect();
        let line = parse(&format!("CMD {}", tokens.join(" "))).unwrap();

        assert_eq!(line.parameters.len(), MAX_PARAMETERS);
        assert_eq!(line.parameters[13], "t14");
        assert_eq!(line.parameters[14], "t15 t16 t17 t18 t19 t20");
    }

    #[test]
    fn test_parse_fifteenth_parameter_strips_colon() {
        let tokens: Vec<String> = (1..=14).map(|i| format!("p{i}")).collect();
        let line = parse(&format!("CMD {} :last one", tokens.join(" "))).unwrap();

        assert_eq!(line.parameters.len(), MAX_PARAMETERS);
        assert_eq!(line.parameters[14], "last one");
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse(""), Err(ProtocolError::EmptyLine));
        assert!(matches!(
            parse(":prefix-only"),
            Err(ProtocolError::MissingCommand(_))
        ));
        assert!(matches!(
            parse(":prefix  CMD"),
            Err(ProtocolError::MissingCommand(_))
        ));
        assert!(matches!(parse(" CMD"), Err(ProtocolError::MissingCommand(_))));
    }
}
