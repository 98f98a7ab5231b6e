//! CTCP (Client-To-Client Protocol) envelopes.
//!
//! CTCP rides inside PRIVMSG and NOTICE text, wrapped in `\x01` markers:
//! `\x01ACTION waves\x01`, `\x01VERSION\x01`.

/// The CTCP marker byte.
pub const MARKER: char = '\x01';

/// An unwrapped CTCP request or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ctcp<'a> {
    /// Sub-command as sent (e.g. `ACTION`, `VERSION`).
    pub command: &'a str,
    /// Everything after the first space, empty if there was none.
    pub payload: &'a str,
}

impl<'a> Ctcp<'a> {
    /// Unwrap a CTCP envelope from message text.
    ///
    /// Returns `None` if the text carries no marker at all. Markers are
    /// stripped from both ends; a missing closing marker is tolerated.
    pub fn parse(text: &'a str) -> Option<Ctcp<'a>> {
        if !is_ctcp(text) {
            return None;
        }
        let inner = text.trim_matches(MARKER);
        let (command, payload) = inner.split_once(' ').unwrap_or((inner, ""));
        Some(Ctcp { command, payload })
    }
}

/// Whether the text contains a CTCP marker.
pub fn is_ctcp(text: &str) -> bool {
    text.contains(MARKER)
}

/// Wrap a sub-command and optional payload in CTCP markers.
///
/// The sub-command is uppercased; an empty payload adds no trailing space.
pub fn wrap(command: &str, payload: &str) -> String {
    if payload.is_empty() {
        format!("{}{}{}", MARKER, command.to_ascii_uppercase(), MARKER)
    } else {
        format!("{}{} {}{}", MARKER, command.to_ascii_uppercase(), payload, MARKER)
    }
}
