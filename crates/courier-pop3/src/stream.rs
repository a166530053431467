//! Lazy payload transforms for multiline message bodies.
//!
//! RETR must send message content with CRLF line terminators and with any
//! line that begins with the multiline terminator `.` escaped by doubling the
//! dot. Both transforms are implemented as [`Read`] adapters so the transport
//! can drain a message of any size without buffering it: the retrieval
//! handler wraps the mailbox stream as
//! `CrlfNormalizingReader::new(DotStuffedReader::new(content))` and hands the
//! composition to the response.

use std::io::{self, BufRead, BufReader, Read};

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const DOT: u8 = b'.';

/// Pulls one byte from a buffered reader.
fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let available = reader.fill_buf()?;
    let Some(&byte) = available.first() else {
        return Ok(None);
    };
    reader.consume(1);
    Ok(Some(byte))
}

/// Escapes the multiline terminator by doubling a leading dot on every line.
///
/// Line starts are detected on LF, so the adapter works on raw mailbox
/// content regardless of whether its terminators are already CRLF.
pub struct DotStuffedReader<R> {
    inner: BufReader<R>,
    pending: Option<u8>,
    at_line_start: bool,
}

impl<R: Read> DotStuffedReader<R> {
    /// Wraps a content stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: None,
            at_line_start: true,
        }
    }
}

impl<R: Read> Read for DotStuffedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            if let Some(byte) = self.pending.take() {
                buf[filled] = byte;
                filled += 1;
                continue;
            }
            let Some(byte) = next_byte(&mut self.inner)? else {
                break;
            };
            if self.at_line_start && byte == DOT {
                // Emit the escape dot now, the original dot on the next pull.
                self.pending = Some(DOT);
            }
            buf[filled] = byte;
            filled += 1;
            self.at_line_start = byte == LF;
        }
        Ok(filled)
    }
}

/// Rewrites lone LF and bare CR terminators to CRLF and guarantees the
/// stream ends with CRLF.
///
/// An empty source normalizes to a single CRLF, so a streamed body always
/// leaves the terminating sentinel on a line of its own.
pub struct CrlfNormalizingReader<R> {
    inner: BufReader<R>,
    pending: Option<u8>,
    skip_next_lf: bool,
    last_was_lf: bool,
    terminated: bool,
}

impl<R: Read> CrlfNormalizingReader<R> {
    /// Wraps a content stream.
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            pending: None,
            skip_next_lf: false,
            last_was_lf: false,
            terminated: false,
        }
    }

    fn emit(&mut self, buf: &mut [u8], filled: &mut usize, byte: u8) {
        buf[*filled] = byte;
        *filled += 1;
        self.last_was_lf = byte == LF;
    }
}

impl<R: Read> Read for CrlfNormalizingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            if let Some(byte) = self.pending.take() {
                self.emit(buf, &mut filled, byte);
                continue;
            }
            match next_byte(&mut self.inner)? {
                None => {
                    if self.terminated {
                        break;
                    }
                    self.terminated = true;
                    if self.last_was_lf {
                        break;
                    }
                    self.pending = Some(LF);
                    self.emit(buf, &mut filled, CR);
                }
                Some(CR) => {
                    // Emit the pair now; swallow the LF if the source already
                    // had one.
                    self.skip_next_lf = true;
                    self.pending = Some(LF);
                    self.emit(buf, &mut filled, CR);
                }
                Some(LF) => {
                    if self.skip_next_lf {
                        self.skip_next_lf = false;
                        continue;
                    }
                    self.pending = Some(LF);
                    self.emit(buf, &mut filled, CR);
                }
                Some(byte) => {
                    self.skip_next_lf = false;
                    self.emit(buf, &mut filled, byte);
                }
            }
        }
        Ok(filled)
    }
}
