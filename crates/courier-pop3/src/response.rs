//! POP3 response shapes.
//!
//! Two shapes cover the whole protocol: a textual response (status line plus
//! optional extra lines, with multiline bodies terminated by the `.` sentinel
//! the producing handler appends) and a streaming response whose body is
//! drained lazily by the transport. [`Pop3Response::write_to`] is the single
//! point where the transport renders either shape onto the wire.

use std::fmt;
use std::io::{self, Read, Write};

/// Line terminator required on the wire.
const CRLF: &[u8] = b"\r\n";

/// Sentinel line terminating a multiline response body.
const MULTILINE_TERMINATOR: &str = ".";

/// Status indicator opening every POP3 response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Positive response (`+OK`).
    Ok,
    /// Negative response (`-ERR`).
    Err,
}

impl StatusIndicator {
    /// Returns the wire form of the indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "+OK",
            Self::Err => "-ERR",
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A textual response: status line plus zero or more extra lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    indicator: StatusIndicator,
    message: Option<String>,
    lines: Vec<String>,
}

impl TextResponse {
    /// Creates a positive response with a first-line message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            indicator: StatusIndicator::Ok,
            message: Some(message.into()),
            lines: Vec::new(),
        }
    }

    /// Creates a negative response with a first-line message.
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            indicator: StatusIndicator::Err,
            message: Some(message.into()),
            lines: Vec::new(),
        }
    }

    /// Creates a bare `-ERR` rejection with no explanatory message.
    ///
    /// Used when a command is issued outside the session state that permits
    /// it.
    #[must_use]
    pub fn rejection() -> Self {
        Self {
            indicator: StatusIndicator::Err,
            message: None,
            lines: Vec::new(),
        }
    }

    /// Appends an extra body line.
    pub fn append_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns the status indicator.
    #[must_use]
    pub fn indicator(&self) -> StatusIndicator {
        self.indicator
    }

    /// Returns the first-line message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the extra body lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        match &self.message {
            Some(message) => write!(writer, "{} {}", self.indicator, message)?,
            None => write!(writer, "{}", self.indicator)?,
        }
        writer.write_all(CRLF)?;
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(CRLF)?;
        }
        Ok(())
    }
}

/// A streaming response: status line followed by a lazily-consumed body.
///
/// The body is owned by the response; whoever writes the response drains and
/// releases it, also on early connection termination.
pub struct StreamResponse {
    indicator: StatusIndicator,
    message: String,
    body: Box<dyn Read + Send>,
}

impl StreamResponse {
    /// Creates a positive streaming response.
    #[must_use]
    pub fn ok(message: impl Into<String>, body: Box<dyn Read + Send>) -> Self {
        Self {
            indicator: StatusIndicator::Ok,
            message: message.into(),
            body,
        }
    }

    /// Returns the status indicator.
    #[must_use]
    pub fn indicator(&self) -> StatusIndicator {
        self.indicator
    }

    /// Returns the header message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn write_to(mut self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{} {}", self.indicator, self.message)?;
        writer.write_all(CRLF)?;
        io::copy(&mut self.body, writer)?;
        // The body stream ends with CRLF, so the sentinel sits on its own line.
        writer.write_all(MULTILINE_TERMINATOR.as_bytes())?;
        writer.write_all(CRLF)?;
        Ok(())
    }
}

impl fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamResponse")
            .field("indicator", &self.indicator)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Either POP3 response shape.
#[derive(Debug)]
pub enum Pop3Response {
    /// Single- or multi-line textual response.
    Text(TextResponse),
    /// Streaming response with a lazily-consumed body.
    Stream(StreamResponse),
}

impl Pop3Response {
    /// Renders the response onto the wire, consuming it.
    ///
    /// For streaming responses this drains the body and appends the
    /// multiline terminator.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when writing or draining the body fails.
    pub fn write_to(self, writer: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Text(text) => text.write_to(writer),
            Self::Stream(stream) => stream.write_to(writer),
        }
    }

    /// Returns the textual response, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextResponse> {
        match self {
            Self::Text(text) => Some(text),
            Self::Stream(_) => None,
        }
    }
}

impl From<TextResponse> for Pop3Response {
    fn from(response: TextResponse) -> Self {
        Self::Text(response)
    }
}

impl From<StreamResponse> for Pop3Response {
    fn from(response: StreamResponse) -> Self {
        Self::Stream(response)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn render(response: Pop3Response) -> String {
        let mut output = Vec::new();
        response.write_to(&mut output).expect("render response");
        String::from_utf8(output).expect("ascii output")
    }

    #[test]
    fn renders_single_line_ok() {
        let rendered = render(TextResponse::ok("2 messages").into());
        assert_eq!(rendered, "+OK 2 messages\r\n");
    }

    #[test]
    fn renders_bare_rejection_without_trailing_space() {
        let rendered = render(TextResponse::rejection().into());
        assert_eq!(rendered, "-ERR\r\n");
    }

    #[test]
    fn renders_multiline_body_with_sentinel_line() {
        let mut response = TextResponse::ok("Capability list follows");
        response.append_line("PIPELINING");
        response.append_line(".");
        let rendered = render(response.into());
        assert_eq!(
            rendered,
            "+OK Capability list follows\r\nPIPELINING\r\n.\r\n"
        );
    }

    #[test]
    fn stream_response_drains_body_and_terminates() {
        let body: Box<dyn Read + Send> = Box::new(Cursor::new(b"line\r\n".to_vec()));
        let rendered = render(StreamResponse::ok("Message follows", body).into());
        assert_eq!(rendered, "+OK Message follows\r\nline\r\n.\r\n");
    }
}
