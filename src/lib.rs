//! # tgchat
//!
//! A Rust library for decoding Telegram Desktop JSON exports of personal
//! chats into a typed, normalized conversation model.
//!
//! ## Overview
//!
//! A Telegram export (`result.json`) describes one chat and its full message
//! history. tgchat decodes it into:
//!
//! - a [`Conversation`] with the partner's identity, the derived identity of
//!   the other participant (the "first person"), and the ordered messages;
//! - [`Message`] values with general info, media info, and a flattened text;
//! - [`TextFragment`]s describing the styled spans of a message's text, when
//!   the export provided them in a well-formed shape.
//!
//! Service events (calls, pins) are decoded like any other record but left
//! out of the conversation by default.
//!
//! ## Quick Start
//!
//! ```rust
//! use tgchat::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let export = br#"{
//!         "name": "Bob",
//!         "type": "personal_chat",
//!         "id": 42,
//!         "messages": [
//!             {"id": 1, "type": "message", "from": "Bob", "from_id": "user42",
//!              "date": "2024-01-15T10:30:00", "text": "Hello!"},
//!             {"id": 2, "type": "message", "from": "Alice", "from_id": "user7",
//!              "date": "2024-01-15T10:31:00",
//!              "text": ["Read ", {"type": "bold", "text": "this"}]}
//!         ]
//!     }"#;
//!
//!     let conv = parse_conversation(export)?;
//!     assert_eq!(conv.first_person_name(), "Alice");
//!     assert_eq!(conv.messages()[1].text(), "Read this");
//!     Ok(())
//! }
//! ```
//!
//! ## Large Files
//!
//! With the `streaming` feature, [`streaming::MessageStream`] yields one
//! message at a time without loading the whole export:
//!
//! ```rust,no_run
//! use tgchat::streaming::{StreamingConfig, stream_file};
//!
//! for result in stream_file("huge_export.json", StreamingConfig::default())? {
//!     if let Ok(msg) = result {
//!         println!("{}: {}", msg.sender(), msg.text());
//!     }
//! }
//! # Ok::<(), tgchat::TgchatError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`conversation`] - document decoding and first-person derivation
//! - [`message`] - message records, media info, timestamps
//! - [`text`] - the polymorphic `text` field
//! - [`parser`] - [`ExportParser`](parser::ExportParser), loading from files and readers
//! - [`config`] - [`DecodeConfig`](config::DecodeConfig)
//! - [`streaming`] - bounded-memory message iteration
//! - [`error`] - [`TgchatError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod parser;
#[cfg(feature = "streaming")]
pub mod streaming;
pub mod text;

// Re-export the main types at the crate root for convenience
pub use conversation::{Conversation, derive_first_person, parse_conversation, parse_conversation_with};
pub use error::{Result, TgchatError};
pub use message::{GeneralInfo, MediaInfo, MediaType, Message, parse_message};
pub use text::{FragmentKind, MessageText, TextFragment};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tgchat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::DecodeConfig;
    pub use crate::conversation::{Conversation, derive_first_person, parse_conversation, parse_conversation_with};
    pub use crate::error::{Result, TgchatError};
    pub use crate::message::{GeneralInfo, MediaInfo, MediaType, Message, parse_message};
    pub use crate::parser::ExportParser;
    pub use crate::text::{FragmentKind, MessageText, TextFragment};

    #[cfg(feature = "streaming")]
    pub use crate::streaming::{MessageIterator, MessageStream, StreamingConfig};
}
