//! IRC message parsing and serialization.
//!
//! Wire form:
//!
//! ```text
//! ["@" tags " "] [":" prefix " "] command [" " arg]* [" :" trailing]
//! ```
//!
//! Parsing never fails. Malformed tag entries are skipped, an odd prefix is
//! kept opaque, and a line with nothing in it yields an empty command which
//! the dispatcher drops.

use std::collections::HashMap;
use std::fmt;

use crate::irc::prefix::Prefix;

/// Message tags, keyed by tag name.
pub type Tags = HashMap<String, String>;

/// One parsed IRC message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub tags: Tags,
    pub prefix: Option<Prefix>,
    /// Command verb, case preserved.
    pub command: String,
    /// Positional arguments. A trailing argument, if any, is the last one.
    pub args: Vec<String>,
}

impl Message {
    /// Build an outgoing message with no tags or prefix.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            ..Self::default()
        }
    }

    /// Parse one line, terminator already stripped.
    pub fn parse(line: &str) -> Message {
        let mut msg = Message::default();
        let mut rest = line.trim_start_matches(' ');

        if let Some(tagged) = rest.strip_prefix('@') {
            let (tag_str, after) = next_token(tagged);
            msg.tags = parse_tags(tag_str);
            rest = after;
        }

        if let Some(prefixed) = rest.strip_prefix(':') {
            let (prefix, after) = next_token(prefixed);
            if !prefix.is_empty() {
                msg.prefix = Some(Prefix::resolve(prefix));
            }
            rest = after;
        }

        let (command, mut rest) = next_token(rest);
        msg.command = command.to_string();

        while !rest.is_empty() {
            if let Some(trailing) = rest.strip_prefix(':') {
                msg.args.push(trailing.to_string());
                break;
            }
            let (arg, after) = next_token(rest);
            msg.args.push(arg.to_string());
            rest = after;
        }

        msg
    }

    /// Parse raw bytes, replacing invalid UTF-8 instead of failing.
    pub fn parse_bytes(line: &[u8]) -> Message {
        Self::parse(&String::from_utf8_lossy(line))
    }

    /// The sender's nick or server name, empty when there is no prefix.
    pub fn source(&self) -> &str {
        self.prefix.as_ref().map(Prefix::name).unwrap_or("")
    }
}

/// Split off the next space-delimited token, skipping any run of spaces
/// after it.
fn next_token(s: &str) -> (&str, &str) {
    match s.split_once(' ') {
        Some((token, rest)) => (token, rest.trim_start_matches(' ')),
        None => (s, ""),
    }
}

fn parse_tags(tag_str: &str) -> Tags {
    let mut tags = Tags::new();
    for piece in tag_str.split([',', ';']) {
        match piece.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                tags.insert(key.to_string(), value.to_string());
            }
            _ => tracing::trace!(tag = piece, "skipping malformed tag"),
        }
    }
    tags
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            let mut pairs: Vec<_> = self.tags.iter().collect();
            pairs.sort();
            f.write_str("@")?;
            for (i, (key, value)) in pairs.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(";")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            f.write_str(" ")?;
        }

        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.args.split_last() {
            for arg in middle {
                write!(f, " {}", arg)?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_message() {
        let msg = Message::parse("@foo=bar :nick!user@host PRIVMSG #chan :hello there");
        assert_eq!(msg.tags.get("foo").map(String::as_str), Some("bar"));
        assert_eq!(msg.tags.len(), 1);
        assert_eq!(msg.prefix.as_ref().map(|p| p.to_string()).as_deref(), Some("nick!user@host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.args, vec!["#chan", "hello there"]);
        assert_eq!(msg.source(), "nick");
    }

    #[test]
    fn test_parse_ping() {
        let msg = Message::parse("PING :server.example");
        assert!(msg.tags.is_empty());
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.args, vec!["server.example"]);
        assert_eq!(msg.source(), "");
    }

    #[test]
    fn test_parse_numeric_with_middle_args() {
        let msg = Message::parse(":irc.example.net 001 crab :Welcome to the network, crab");
        assert_eq!(msg.prefix, Some(Prefix::Server("irc.example.net".into())));
        assert_eq!(msg.command, "001");
        assert_eq!(msg.args, vec!["crab", "Welcome to the network, crab"]);
    }

    #[test]
    fn test_trailing_keeps_inner_spacing_and_colons() {
        let msg = Message::parse("PRIVMSG #c :a  b :c ");
        assert_eq!(msg.args, vec!["#c", "a  b :c "]);
    }

    #[test]
    fn test_empty_trailing() {
        let msg = Message::parse("TOPIC #c :");
        assert_eq!(msg.args, vec!["#c", ""]);
    }

    #[test]
    fn test_verb_only_and_empty_line() {
        let msg = Message::parse("QUIT");
        assert_eq!(msg.command, "QUIT");
        assert!(msg.args.is_empty());

        assert_eq!(Message::parse("").command, "");
        assert_eq!(Message::parse(":only.a.prefix").command, "");
        assert_eq!(Message::parse("@a=b").command, "");
    }

    #[test]
    fn test_consecutive_spaces_between_args() {
        let msg = Message::parse(":n!u@h  MODE   #c  +o   nick");
        assert_eq!(msg.command, "MODE");
        assert_eq!(msg.args, vec!["#c", "+o", "nick"]);
    }

    #[test]
    fn test_malformed_tags_are_skipped() {
        let msg = Message::parse("@good=1,bad,also=x=y;time=2024 PING :x");
        assert_eq!(msg.tags.len(), 3);
        assert_eq!(msg.tags["good"], "1");
        assert_eq!(msg.tags["also"], "x=y");
        assert_eq!(msg.tags["time"], "2024");
        assert_eq!(msg.command, "PING");
    }

    #[test]
    fn test_parse_bytes_replaces_invalid_utf8() {
        let msg = Message::parse_bytes(b"PRIVMSG #c :caf\xe9");
        assert_eq!(msg.args, vec!["#c", "caf\u{fffd}"]);
    }

    #[test]
    fn test_display() {
        let msg = Message::new("PRIVMSG", vec!["#chan".into(), "hello there".into()]);
        assert_eq!(msg.to_string(), "PRIVMSG #chan :hello there");

        let msg = Message::new("JOIN", vec!["#chan".into()]);
        assert_eq!(msg.to_string(), "JOIN #chan");

        let msg = Message::parse("@b=2;a=1 :n!u@h NOTICE me ::)");
        assert_eq!(msg.to_string(), "@a=1;b=2 :n!u@h NOTICE me ::)");
    }
}
