//! Line-based codec for the AT command-mode interface.
//!
//! Commands are transmitted as ASCII lines terminated with `\r\n`. Received
//! bytes are split on `\r` / `\n`; the codec accumulates partial lines until
//! a terminator arrives, so callers can feed it whatever chunk sizes the
//! serial driver produces.

use bytes::{Buf, BytesMut};

/// Maximum command/response line length.
pub const MAX_LINE_LENGTH: usize = 160;

/// Line terminator appended to every transmitted command.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Escape literal that switches the radio into command mode.
///
/// Sent raw, without a terminator: the radio distinguishes it from payload
/// by the guard interval of silence before and after, not by framing.
pub const ESCAPE_SEQUENCE: &[u8] = b"+++";

/// A codec for reading and writing AT protocol lines.
///
/// Incoming bytes are buffered until a complete line is available. A pair of
/// consecutive terminators (`\r\n`) yields a single blank line, which is
/// reported as `Some("")` so callers can tell "blank line received" apart
/// from "no data yet" (`None`).
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl LineCodec {
    /// Create a new line codec.
    pub fn new() -> Self {
        LineCodec {
            buffer: BytesMut::with_capacity(MAX_LINE_LENGTH * 2),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode one complete line from the buffer.
    ///
    /// Returns the line with terminators and surrounding whitespace stripped,
    /// or `None` if no terminator has been buffered yet. Bytes that are not
    /// valid UTF-8 are replaced rather than dropped; the radio's command
    /// interpreter only emits ASCII, so replacement only happens on a
    /// garbled channel.
    pub fn decode_line(&mut self) -> Option<String> {
        let end = self
            .buffer
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')?;

        let line_data = self.buffer.split_to(end);
        let line = String::from_utf8_lossy(&line_data).trim().to_string();
        log::trace!("decoded line: {:?}", line);

        // Consume one line break; the `\n` of a `\r\n` pair belongs to the
        // same break, while a bare `\n` or `\r` is a break on its own.
        let terminator = self.buffer[0];
        self.buffer.advance(1);
        if terminator == b'\r' && self.buffer.first() == Some(&b'\n') {
            self.buffer.advance(1);
        }

        Some(line)
    }

    /// Encode a command line for transmission.
    ///
    /// Appends the `\r\n` terminator. No escaping is required: command
    /// names and register values are plain alphanumerics.
    pub fn encode_command(cmd: &str) -> Vec<u8> {
        let mut buf = Vec::with_capacity(cmd.len() + LINE_TERMINATOR.len());
        buf.extend_from_slice(cmd.as_bytes());
        buf.extend_from_slice(LINE_TERMINATOR.as_bytes());
        buf
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer contents as a string (for debugging).
    pub fn buffer_as_str(&self) -> String {
        String::from_utf8_lossy(&self.buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_command() {
        let encoded = LineCodec::encode_command("ATS3?");
        assert_eq!(encoded, b"ATS3?\r\n");
    }

    #[test]
    fn test_decode_single_line() {
        let mut codec = LineCodec::new();
        codec.push(b"OK\r\n");

        assert_eq!(codec.decode_line(), Some("OK".to_string()));
        assert_eq!(codec.decode_line(), None);
    }

    #[test]
    fn test_decode_multiple_lines() {
        let mut codec = LineCodec::new();
        codec.push(b"25\r\nOK\r\n");

        assert_eq!(codec.decode_line(), Some("25".to_string()));
        assert_eq!(codec.decode_line(), Some("OK".to_string()));
        assert_eq!(codec.decode_line(), None);
    }

    #[test]
    fn test_partial_line() {
        let mut codec = LineCodec::new();
        codec.push(b"RFD SiK 3.57 on RFD900");

        assert_eq!(codec.decode_line(), None);

        codec.push(b"X\r\n");
        assert_eq!(
            codec.decode_line(),
            Some("RFD SiK 3.57 on RFD900X".to_string())
        );
    }

    #[test]
    fn test_blank_line_is_distinct_from_no_data() {
        let mut codec = LineCodec::new();
        codec.push(b"\r\n");

        // A blank line decodes to an empty string, not None.
        assert_eq!(codec.decode_line(), Some(String::new()));
        assert_eq!(codec.decode_line(), None);
    }

    #[test]
    fn test_whitespace_stripped() {
        let mut codec = LineCodec::new();
        codec.push(b"  100 \r\n");

        assert_eq!(codec.decode_line(), Some("100".to_string()));
    }

    #[test]
    fn test_bare_lf_terminators() {
        let mut codec = LineCodec::new();
        codec.push(b"a\nb\n");

        assert_eq!(codec.decode_line(), Some("a".to_string()));
        assert_eq!(codec.decode_line(), Some("b".to_string()));
        assert_eq!(codec.decode_line(), None);
    }

    #[test]
    fn test_clear() {
        let mut codec = LineCodec::new();
        codec.push(b"garbage with no terminator");
        assert!(codec.buffered_len() > 0);

        codec.clear();
        assert_eq!(codec.buffered_len(), 0);
        assert_eq!(codec.decode_line(), None);
    }
}
