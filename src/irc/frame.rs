//! Outbound line framing.
//!
//! Every line written to the server goes through [`frame`]. Overlong text is
//! rejected rather than truncated, so a final argument is never cut silently;
//! the caller decides whether to shorten and retry.

use crate::error::{FrameError, MAX_LINE_LEN};

/// Validate a command and produce its wire bytes, CRLF included.
pub fn frame(command: &str) -> Result<Vec<u8>, FrameError> {
    if let Some(bad) = command.chars().find(|c| matches!(c, '\r' | '\n' | '\0')) {
        return Err(FrameError::InvalidCharacter(bad));
    }
    if command.len() > MAX_LINE_LEN {
        return Err(FrameError::MessageTooLong {
            actual: command.len(),
            limit: MAX_LINE_LEN,
        });
    }

    let mut bytes = Vec::with_capacity(command.len() + 2);
    bytes.extend_from_slice(command.as_bytes());
    bytes.extend_from_slice(b"\r\n");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_appends_crlf() {
        assert_eq!(frame("PONG :x").unwrap(), b"PONG :x\r\n".to_vec());
    }

    #[test]
    fn test_rejects_newline() {
        assert_eq!(frame("A\nB"), Err(FrameError::InvalidCharacter('\n')));
        assert_eq!(frame("A\rB"), Err(FrameError::InvalidCharacter('\r')));
        assert_eq!(frame("A\0B"), Err(FrameError::InvalidCharacter('\0')));
    }

    #[test]
    fn test_rejects_too_long() {
        let text = format!("PRIVMSG #chan :{}", "x".repeat(600));
        assert_eq!(
            frame(&text),
            Err(FrameError::MessageTooLong { actual: text.len(), limit: 510 })
        );
    }

    #[test]
    fn test_limit_is_in_bytes() {
        let exact = "x".repeat(MAX_LINE_LEN);
        assert_eq!(frame(&exact).map(|b| b.len()), Ok(512));

        // 255 two-byte chars plus one ASCII byte is 511 bytes but only 256 chars.
        let wide = format!("{}x", "\u{e9}".repeat(255));
        assert!(matches!(frame(&wide), Err(FrameError::MessageTooLong { actual: 511, .. })));
    }
}
