//! Incoming line buffer.
//!
//! Socket reads arrive in arbitrary chunks. [`LineBuffer`] accumulates them
//! and hands back every complete line, keeping the unterminated tail for the
//! next read. Lines end at `\r\n` or a bare `\n`.
//!
//! The buffer stores raw bytes and only decodes when a whole line has been
//! cut, so a UTF-8 sequence split across two reads still decodes correctly.

/// Accumulates raw input and splits it into lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of input. Accepts both text and raw bytes.
    pub fn push(&mut self, chunk: impl AsRef<[u8]>) {
        self.buf.extend_from_slice(chunk.as_ref());
    }

    /// Drain the complete lines currently buffered.
    ///
    /// Empty lines are yielded as empty strings; filtering them is up to the
    /// caller. Lines not consumed before the iterator is dropped stay in the
    /// buffer.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines { buffer: self }
    }

    /// Number of buffered bytes not yet returned as a line.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop everything buffered, e.g. when the connection is replaced.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Iterator returned by [`LineBuffer::lines`].
pub struct Lines<'a> {
    buffer: &'a mut LineBuffer,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let buf = &mut self.buffer.buf;
        let pos = buf.iter().position(|b| *b == b'\n')?;

        let mut line: Vec<u8> = buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(chunks: &[&[u8]]) -> Vec<String> {
        let mut buffer = LineBuffer::new();
        let mut out = Vec::new();
        for chunk in chunks {
            buffer.push(chunk);
            out.extend(buffer.lines());
        }
        out
    }

    #[test]
    fn test_crlf_and_bare_lf() {
        let lines = collect(&[b"PING :a\r\nPING :b\nPING :c\r\n"]);
        assert_eq!(lines, vec!["PING :a", "PING :b", "PING :c"]);
    }

    #[test]
    fn test_partial_line_is_retained() {
        let mut buffer = LineBuffer::new();
        buffer.push("PING :a\r\nPRIVMSG #chan :hel");
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["PING :a"]);
        assert_eq!(buffer.len(), "PRIVMSG #chan :hel".len());

        buffer.push("lo\r\n");
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["PRIVMSG #chan :hello"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_empty_lines_are_yielded() {
        let lines = collect(&[b"A\r\n\r\nB\n\n"]);
        assert_eq!(lines, vec!["A", "", "B", ""]);
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let input: &[u8] =
            "@id=1 :n!u@h PRIVMSG #c :h\u{e9}llo w\u{f6}rld\r\nPING :x\n\r\nNOTICE * :end\r\ntail".as_bytes();
        let whole = collect(&[input]);

        for split in 0..=input.len() {
            let (a, b) = input.split_at(split);
            assert_eq!(collect(&[a, b]), whole, "split at {}", split);
        }

        let bytewise: Vec<&[u8]> = input.chunks(1).collect();
        assert_eq!(collect(&bytewise), whole);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let lines = collect(&[b"PRIVMSG #c :\xff\xfeok\r\n"]);
        assert_eq!(lines, vec!["PRIVMSG #c :\u{fffd}\u{fffd}ok"]);
    }

    #[test]
    fn test_unconsumed_lines_stay_buffered() {
        let mut buffer = LineBuffer::new();
        buffer.push("A\nB\n");
        assert_eq!(buffer.lines().next().as_deref(), Some("A"));
        assert_eq!(buffer.lines().collect::<Vec<_>>(), vec!["B"]);
    }
}
