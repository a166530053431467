//! Command line decoding and parsing.
//!
//! A framed line arrives from the transport as raw bytes. The dispatcher
//! decodes it with a fixed [`LineDecoder`], trims surrounding whitespace, and
//! splits it into a normalized [`Verb`] plus an optional argument. The split
//! happens at the first literal space only and the argument is passed through
//! untrimmed, because protocol arguments may be whitespace-significant.

use std::fmt;

/// Character decoding applied to every inbound line.
///
/// Line-oriented mail protocols are 7-bit ASCII on the wire, so [`Ascii`]
/// is the default. Decoding is lossy: bytes outside the selected encoding
/// are replaced with U+FFFD rather than failing the request.
///
/// [`Ascii`]: LineDecoder::Ascii
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineDecoder {
    /// 7-bit US-ASCII; bytes above 0x7F are replaced.
    #[default]
    Ascii,
    /// UTF-8 with invalid sequences replaced.
    Utf8,
}

impl LineDecoder {
    /// Decodes a raw line into text.
    #[must_use]
    pub fn decode(self, line: &[u8]) -> String {
        match self {
            Self::Ascii => line
                .iter()
                .map(|&byte| {
                    if byte.is_ascii() {
                        char::from(byte)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Self::Utf8 => String::from_utf8_lossy(line).into_owned(),
        }
    }
}

/// A case-normalized command keyword.
///
/// Verbs compare and hash on their normalized form (trimmed, ASCII
/// uppercased), so `retr`, `Retr`, and `RETR` all address the same handler
/// chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Verb(String);

impl Verb {
    /// Creates a verb from a raw token, trimming and uppercasing it.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self(token.trim().to_ascii_uppercase())
    }

    /// Returns the normalized token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable parsed command line: verb plus optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    verb: Verb,
    argument: Option<String>,
}

impl Request {
    /// Creates a request directly from its parts.
    #[must_use]
    pub fn new(verb: Verb, argument: Option<String>) -> Self {
        Self { verb, argument }
    }

    /// Parses a decoded line into a request.
    ///
    /// The line is trimmed, then split at the first literal space. The left
    /// part becomes the verb; the remainder, if any, is the argument and is
    /// not trimmed or re-split. A trimmed line with no space is a bare verb
    /// with an absent argument, so `"CAPA "` parses to verb `CAPA` and no
    /// argument.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.split_once(' ') {
            Some((head, rest)) => Self {
                verb: Verb::new(head),
                argument: Some(rest.to_owned()),
            },
            None => Self {
                verb: Verb::new(trimmed),
                argument: None,
            },
        }
    }

    /// Returns the parsed verb.
    #[must_use]
    pub fn verb(&self) -> &Verb {
        &self.verb
    }

    /// Returns the argument, if one was present on the line.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }
}
