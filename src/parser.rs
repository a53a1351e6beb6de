//! Loading exports from files, readers, and in-memory content.
//!
//! The decoders in [`conversation`](crate::conversation) and
//! [`message`](crate::message) work on bytes and never touch the file
//! system. [`ExportParser`] is the layer that sources those bytes.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> tgchat::Result<()> {
//! use tgchat::parser::ExportParser;
//!
//! let parser = ExportParser::new();
//! let conv = parser.parse("ChatExport_2024-01-15/result.json")?;
//!
//! println!("{} <-> {}", conv.first_person_name(), conv.partner_name());
//! for msg in conv.messages() {
//!     println!("{}: {}", msg.sender(), msg.text());
//! }
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::DecodeConfig;
use crate::conversation::{Conversation, parse_conversation_with};
use crate::error::Result;
use crate::message::{Message, parse_message};

#[cfg(feature = "streaming")]
use crate::streaming::{MessageStream, StreamingConfig, stream_file};

/// Parser for Telegram Desktop JSON exports.
///
/// Telegram exports a personal chat as `result.json`:
/// ```json
/// {
///   "name": "Partner Name",
///   "type": "personal_chat",
///   "id": 123456789,
///   "messages": [
///     {
///       "id": 12345,
///       "type": "message",
///       "date": "2024-01-15T10:30:00",
///       "date_unixtime": "1705314600",
///       "from": "Sender Name",
///       "from_id": "user123456789",
///       "text": "Hello" | ["Hello", {"type": "link", "text": "url"}],
///       "reply_to_message_id": 12344
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportParser {
    config: DecodeConfig,
}

impl ExportParser {
    /// Creates a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with a custom configuration.
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Reads and decodes an export file.
    ///
    /// # Errors
    ///
    /// Returns [`TgchatError::Io`](crate::TgchatError::Io) if the file cannot
    /// be read, and a decode error carrying the path if it cannot be decoded.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Conversation> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        self.parse_slice(&data).map_err(|e| e.with_path(path))
    }

    /// Decodes an export held in a string.
    pub fn parse_str(&self, content: &str) -> Result<Conversation> {
        self.parse_slice(content.as_bytes())
    }

    /// Decodes an export held in a byte buffer.
    pub fn parse_slice(&self, data: &[u8]) -> Result<Conversation> {
        parse_conversation_with(data, &self.config)
    }

    /// Decodes an export from a reader.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Conversation> {
        Conversation::from_reader(reader, &self.config)
    }

    /// Decodes an export file through a buffered reader instead of reading it whole first.
    pub fn parse_buffered(&self, path: impl AsRef<Path>) -> Result<Conversation> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
            .map_err(|e| e.with_path(path))
    }

    /// Decodes a single message record.
    pub fn parse_message(&self, content: &str) -> Result<Message> {
        parse_message(content.as_bytes())
    }

    /// Streams the messages of an export file one record at a time.
    ///
    /// Service events (by the configured service kind) are skipped unless
    /// the parser keeps them.
    #[cfg(feature = "streaming")]
    pub fn stream(&self, path: impl AsRef<Path>) -> Result<MessageStream<BufReader<File>>> {
        let config = StreamingConfig::default()
            .with_skip_service_events(!self.config.keep_service_events);
        Ok(stream_file(path, config)?.with_service_kind(self.config.service_kind.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOC: &str = r#"{"name": "Bob", "type": "personal_chat", "id": 42, "messages": [
        {"id": 1, "type": "message", "from": "Bob", "from_id": "user42", "text": "hi"},
        {"id": 2, "type": "service", "actor": "Bob", "action": "phone_call"},
        {"id": 3, "type": "message", "from": "Alice", "from_id": "user7", "text": "hello"}
    ]}"#;

    fn temp_export(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_file() {
        let file = temp_export(DOC);
        let conv = ExportParser::new().parse(file.path()).unwrap();
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.first_person_id(), "user7");
    }

    #[test]
    fn test_parse_buffered_matches_parse() {
        let file = temp_export(DOC);
        let parser = ExportParser::new();
        assert_eq!(parser.parse(file.path()).unwrap(), parser.parse_buffered(file.path()).unwrap());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = ExportParser::new().parse("/definitely/not/here.json").unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_parse_error_carries_path() {
        let file = temp_export(r#"{"name": "Bob"}"#);
        let err = ExportParser::new().parse(file.path()).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_parse_str_with_config() {
        let parser = ExportParser::with_config(DecodeConfig::new().with_keep_service_events(true));
        assert_eq!(parser.parse_str(DOC).unwrap().len(), 3);
        assert!(parser.config().keep_service_events);
    }

    #[test]
    fn test_parse_message() {
        let msg = ExportParser::new()
            .parse_message(r#"{"id": 1, "type": "message", "text": ["a", {"type": "bold", "text": "b"}]}"#)
            .unwrap();
        assert_eq!(msg.text(), "ab");
    }

    #[cfg(feature = "streaming")]
    #[test]
    fn test_stream_follows_keep_service() {
        let file = temp_export(DOC);
        let count = ExportParser::new().stream(file.path()).unwrap().count();
        assert_eq!(count, 2);

        let keep = ExportParser::with_config(DecodeConfig::new().with_keep_service_events(true));
        assert_eq!(keep.stream(file.path()).unwrap().count(), 3);
    }
}
