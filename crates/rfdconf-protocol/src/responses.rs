//! Response classification for the AT protocol.
//!
//! Every command produces zero or more data lines followed by a terminal
//! status line, exactly `OK` or `ERROR` (case-sensitive). Anything else the
//! radio prints - echoed commands, register values, info page text - is a
//! data line. Classification never fails: unrecognized text is data.

/// A single decoded line, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine {
    /// Terminal success status.
    Ok,
    /// Terminal failure status (e.g. register write out of range).
    Error,
    /// Any other non-blank line.
    Data(String),
}

impl ResponseLine {
    /// Classify a decoded line. The input should already be stripped of
    /// terminators and surrounding whitespace (see `LineCodec::decode_line`).
    pub fn classify(line: &str) -> ResponseLine {
        match line {
            "OK" => ResponseLine::Ok,
            "ERROR" => ResponseLine::Error,
            other => ResponseLine::Data(other.to_string()),
        }
    }

    /// Check if this line terminates a command exchange.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResponseLine::Ok | ResponseLine::Error)
    }

    /// Get the text if this is a data line.
    pub fn as_data(&self) -> Option<&str> {
        match self {
            ResponseLine::Data(text) => Some(text),
            _ => None,
        }
    }
}

/// The collected reply to a single command: the data lines that preceded
/// the terminal status, plus the status itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Data lines in arrival order, echo and blanks already discarded.
    pub data: Vec<String>,
    /// Whether the terminal status was `OK`.
    pub ok: bool,
}

impl CommandReply {
    /// The first data line, if any. Register queries answer with a single
    /// value line, so this is the common accessor.
    pub fn first_line(&self) -> Option<&str> {
        self.data.first().map(String::as_str)
    }

    /// Parse the first data line as an integer register value.
    pub fn value(&self) -> Option<i64> {
        self.first_line()?.trim().parse().ok()
    }

    /// Join all data lines for display.
    pub fn text(&self) -> String {
        self.data.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ok() {
        assert_eq!(ResponseLine::classify("OK"), ResponseLine::Ok);
        assert!(ResponseLine::classify("OK").is_terminal());
    }

    #[test]
    fn test_classify_error() {
        assert_eq!(ResponseLine::classify("ERROR"), ResponseLine::Error);
        assert!(ResponseLine::classify("ERROR").is_terminal());
    }

    #[test]
    fn test_status_is_case_sensitive() {
        // Only the exact uppercase keywords are terminal.
        assert_eq!(
            ResponseLine::classify("ok"),
            ResponseLine::Data("ok".to_string())
        );
        assert_eq!(
            ResponseLine::classify("Error"),
            ResponseLine::Data("Error".to_string())
        );
    }

    #[test]
    fn test_classify_data() {
        let line = ResponseLine::classify("RFD SiK 3.57 on RFD900X");
        assert!(!line.is_terminal());
        assert_eq!(line.as_data(), Some("RFD SiK 3.57 on RFD900X"));
    }

    #[test]
    fn test_reply_value() {
        let reply = CommandReply {
            data: vec!["25".to_string()],
            ok: true,
        };
        assert_eq!(reply.value(), Some(25));
    }

    #[test]
    fn test_reply_value_non_numeric() {
        let reply = CommandReply {
            data: vec!["S3:NETID=25".to_string()],
            ok: true,
        };
        assert_eq!(reply.value(), None);
        assert_eq!(reply.first_line(), Some("S3:NETID=25"));
    }

    #[test]
    fn test_reply_text_joins_lines() {
        let reply = CommandReply {
            data: vec!["line1".to_string(), "line2".to_string()],
            ok: true,
        };
        assert_eq!(reply.text(), "line1\nline2");
    }
}
