//! Streaming reader for Telegram JSON exports.
//!
//! Telegram exports are structured as:
//! ```json
//! {
//!   "name": "Chat Name",
//!   "type": "personal_chat",
//!   "id": 42,
//!   "messages": [
//!     {"id": 1, "type": "message", ...},
//!     {"id": 2, "type": "message", ...}
//!   ]
//! }
//! ```
//!
//! The reader scans bytes until it reaches the top-level `messages` array,
//! then cuts out one record at a time by tracking brace depth outside of
//! string literals. Each record is decoded on its own, so memory use is
//! bounded by the largest record rather than the file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::config::SERVICE_KIND;
use crate::error::{Result, TgchatError};
use crate::message::{Message, parse_message};

use super::{MessageIterator, StreamingConfig};

const FORMAT: &str = "Telegram JSON";

/// Opens an export file and returns a stream over its messages.
///
/// # Errors
///
/// Returns [`TgchatError::Io`] if the file cannot be opened and
/// [`TgchatError::InvalidFormat`] if it has no top-level `messages` array.
pub fn stream_file(path: impl AsRef<Path>, config: StreamingConfig) -> Result<MessageStream<BufReader<File>>> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();

    let reader = BufReader::with_capacity(config.buffer_size, file);
    Ok(MessageStream::new(reader, config)?.with_total_bytes(file_size))
}

/// Iterator over the messages of a Telegram export.
///
/// # Example
///
/// ```rust
/// use tgchat::streaming::{MessageStream, StreamingConfig};
///
/// let json = br#"{"name": "Bob", "type": "personal_chat", "id": 1, "messages": [
///     {"id": 1, "type": "message", "from": "Bob", "text": "hi"},
///     {"id": 2, "type": "service", "action": "phone_call"},
///     {"id": 3, "type": "message", "from": "Alice", "text": "hello"}
/// ]}"#;
///
/// let stream = MessageStream::new(&json[..], StreamingConfig::default())?;
/// let texts: Vec<String> = stream
///     .filter_map(Result::ok)
///     .map(|m| m.text().to_string())
///     .collect();
/// assert_eq!(texts, ["hi", "hello"]);
/// # Ok::<(), tgchat::TgchatError>(())
/// ```
pub struct MessageStream<R: BufRead> {
    reader: R,
    config: StreamingConfig,
    bytes_read: u64,
    total_bytes: Option<u64>,
    service_kind: String,
    buffer: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> MessageStream<R> {
    /// Creates a stream, consuming input up to the start of the `messages` array.
    pub fn new(reader: R, config: StreamingConfig) -> Result<Self> {
        let mut stream = Self {
            reader,
            config,
            bytes_read: 0,
            total_bytes: None,
            service_kind: SERVICE_KIND.to_string(),
            buffer: Vec::new(),
            finished: false,
        };
        stream.seek_messages_array()?;
        debug!(offset = stream.bytes_read, "found messages array");
        Ok(stream)
    }

    /// Sets the total input size used for progress reporting.
    #[must_use]
    pub fn with_total_bytes(mut self, total: u64) -> Self {
        self.total_bytes = Some(total);
        self
    }

    /// Sets the message kind skipped as a service event.
    #[must_use]
    pub fn with_service_kind(mut self, kind: impl Into<String>) -> Self {
        self.service_kind = kind.into();
        self
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = match self.reader.fill_buf()? {
            [] => return Ok(None),
            [b, ..] => *b,
        };
        self.reader.consume(1);
        self.bytes_read += 1;
        Ok(Some(byte))
    }

    /// Advances past the `[` that opens the top-level `messages` array.
    fn seek_messages_array(&mut self) -> Result<()> {
        let mut depth = 0usize;
        let mut scanner = StringScanner::default();
        let mut current = Vec::new();
        let mut last_key = Vec::new();
        let mut awaiting_array = false;

        loop {
            let Some(b) = self.next_byte()? else {
                return Err(TgchatError::invalid_format(FORMAT, "could not find 'messages' array"));
            };

            if scanner.in_string {
                if scanner.feed(b) {
                    last_key = std::mem::take(&mut current);
                } else if depth == 1 && current.len() < 64 {
                    current.push(b);
                }
                continue;
            }

            if awaiting_array {
                match b {
                    b' ' | b'\n' | b'\r' | b'\t' => continue,
                    b'[' => return Ok(()),
                    _ => return Err(TgchatError::invalid_format(FORMAT, "'messages' is not an array")),
                }
            }

            match b {
                b'"' => {
                    scanner.in_string = true;
                    current.clear();
                }
                b'{' | b'[' => {
                    depth += 1;
                    last_key.clear();
                }
                b'}' | b']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Err(TgchatError::invalid_format(FORMAT, "could not find 'messages' array"));
                    }
                }
                b':' if depth == 1 && last_key == b"messages" => awaiting_array = true,
                b',' => last_key.clear(),
                _ => {}
            }
        }
    }

    /// Reads the next record into `buffer`. Returns `false` at the end of the array.
    fn read_next_record(&mut self) -> Result<bool> {
        loop {
            let Some(b) = self.next_byte()? else {
                self.finished = true;
                return Err(TgchatError::unexpected_eof("looking for the next message record"));
            };
            match b {
                b' ' | b'\n' | b'\r' | b'\t' | b',' => {}
                b']' => {
                    self.finished = true;
                    return Ok(false);
                }
                b'{' => break,
                other => {
                    self.finished = true;
                    return Err(TgchatError::invalid_format(
                        FORMAT,
                        format!("unexpected '{}' in messages array", other as char),
                    ));
                }
            }
        }

        self.buffer.clear();
        self.buffer.push(b'{');
        let mut size = 1usize;
        let mut depth = 1usize;
        let mut scanner = StringScanner::default();

        while depth > 0 {
            let Some(b) = self.next_byte()? else {
                self.finished = true;
                return Err(TgchatError::unexpected_eof("reading a message record"));
            };

            size += 1;
            if size <= self.config.max_message_size {
                self.buffer.push(b);
            }

            if scanner.in_string {
                scanner.feed(b);
                continue;
            }
            match b {
                b'"' => scanner.in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth -= 1,
                _ => {}
            }
        }

        if size > self.config.max_message_size {
            return Err(TgchatError::buffer_overflow(self.config.max_message_size, size));
        }
        Ok(true)
    }
}

impl<R: BufRead> MessageIterator for MessageStream<R> {
    fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}

impl<R: BufRead> Iterator for MessageStream<R> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.read_next_record() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) if e.is_io() => {
                    self.finished = true;
                    return Some(Err(e));
                }
                Err(e) if self.config.skip_invalid && !self.finished => {
                    debug!(error = %e, "skipping message record");
                    continue;
                }
                Err(e) => return Some(Err(e)),
            }

            match parse_message(&self.buffer) {
                Ok(msg) if self.config.skip_service_events && msg.kind() == self.service_kind => {}
                Ok(msg) => return Some(Ok(msg)),
                Err(e) if self.config.skip_invalid => {
                    debug!(error = %e, "skipping invalid message record");
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Tracks whether the scanner is inside a JSON string literal.
#[derive(Default)]
struct StringScanner {
    in_string: bool,
    escaped: bool,
}

impl StringScanner {
    /// Consumes one byte inside a string. Returns `true` on the closing quote.
    fn feed(&mut self, b: u8) -> bool {
        if self.escaped {
            self.escaped = false;
        } else if b == b'\\' {
            self.escaped = true;
        } else if b == b'"' {
            self.in_string = false;
            return true;
        }
        false
    }
}
