//! Error types for the outbound path and the transport.
//!
//! Inbound anomalies (bad tags, odd prefixes, unknown commands) are never
//! errors: the parser recovers and the dispatcher drops what it cannot route.
//! Only sends and connection attempts can fail.

use thiserror::Error;

/// Maximum payload of one IRC line, not counting the trailing CRLF.
pub const MAX_LINE_LEN: usize = 510;

/// A command string that cannot be put on the wire as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The text contains a line terminator or NUL, which would split or
    /// corrupt the line. Always a caller bug.
    #[error("invalid character {0:?} in outgoing message")]
    InvalidCharacter(char),

    /// The text does not fit in a single IRC line.
    #[error("message too long: {actual} bytes (limit {limit})")]
    MessageTooLong { actual: usize, limit: usize },
}

/// Failure of a single send attempt. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// No live transport to write to.
    #[error("not connected")]
    NotConnected,

    /// A scheduled send was cancelled before it fired.
    #[error("scheduled send cancelled")]
    Cancelled,
}

/// Failure to open a connection to the server.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connect to {addr} failed: {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TLS server name {0:?}")]
    InvalidServerName(String),

    #[error("TLS handshake with {addr} failed: {source}")]
    Tls {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_converts_into_send_error() {
        let err: SendError = FrameError::InvalidCharacter('\n').into();
        assert_eq!(err, SendError::Frame(FrameError::InvalidCharacter('\n')));
        assert_eq!(err.to_string(), "invalid character '\\n' in outgoing message");
    }

    #[test]
    fn test_too_long_display() {
        let err = FrameError::MessageTooLong { actual: 615, limit: MAX_LINE_LEN };
        assert_eq!(err.to_string(), "message too long: 615 bytes (limit 510)");
    }

    #[test]
    fn test_connect_error_source_chaining() {
        let err = ConnectError::Io {
            addr: "irc.example.net:6667".into(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        let source = std::error::Error::source(&err);
        assert_eq!(source.map(|s| s.to_string()), Some("refused".to_string()));
        assert!(err.to_string().starts_with("connect to irc.example.net:6667 failed"));
    }
}
