//! Decoding of a whole Telegram personal chat export.
//!
//! The top-level document looks like:
//!
//! ```json
//! {
//!   "name": "Bob",
//!   "type": "personal_chat",
//!   "id": 42,
//!   "messages": [
//!     {"id": 1, "type": "message", "from": "Bob", "from_id": "user42", ...},
//!     {"id": 2, "type": "service", "actor": "Bob", "action": "phone_call", ...}
//!   ]
//! }
//! ```
//!
//! The document is read with a serde map visitor: keys are consumed in the
//! order they appear, message records are decoded as they are reached, and
//! keys the decoder does not know are skipped without being materialized.
//! Any key order is accepted.
//!
//! Once every record is decoded, service events are dropped and the first
//! person (the participant who is not the partner) is derived from the
//! remaining messages.

use std::fmt;
use std::io::Read;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{Result, TgchatError};
use crate::message::Message;

/// A decoded personal chat.
///
/// # Example
///
/// ```rust
/// use tgchat::parse_conversation;
///
/// let conv = parse_conversation(br#"{
///     "name": "Bob",
///     "type": "personal_chat",
///     "id": 42,
///     "messages": [
///         {"id": 1, "type": "message", "from": "Bob", "from_id": "user42", "text": "hi"},
///         {"id": 2, "type": "message", "from": "Alice", "from_id": "user7", "text": "hello"}
///     ]
/// }"#)?;
///
/// assert_eq!(conv.partner_id(), "user42");
/// assert_eq!(conv.first_person_name(), "Alice");
/// assert_eq!(conv.messages().len(), 2);
/// # Ok::<(), tgchat::TgchatError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    first_person_name: String,
    first_person_id: String,
    partner_name: String,
    partner_id: String,
    chat_type: String,
    messages: Vec<Message>,
}

impl Conversation {
    /// Decodes a conversation document from any reader.
    ///
    /// Buffer the reader (e.g. with `BufReader`) when reading from a file.
    pub fn from_reader<R: Read>(reader: R, config: &DecodeConfig) -> Result<Self> {
        let raw: RawConversation =
            serde_json::from_reader(reader).map_err(|e| TgchatError::conversation(e, None))?;
        Self::from_raw(raw, config)
    }

    fn from_raw(raw: RawConversation, config: &DecodeConfig) -> Result<Self> {
        if let Some(expected) = &config.expected_chat_type {
            if *expected != raw.chat_type {
                return Err(TgchatError::invalid_format(
                    "Telegram JSON",
                    format!("expected chat type '{}', found '{}'", expected, raw.chat_type),
                ));
            }
        }

        let partner_id = config.partner_id(raw.id);
        let total = raw.messages.len();

        let messages: Vec<Message> = if config.keep_service_events {
            raw.messages
        } else {
            raw.messages
                .into_iter()
                .filter(|msg| !config.is_service(msg.kind()))
                .collect()
        };

        let (first_person_id, first_person_name) =
            derive_first_person_with(&messages, &partner_id, config)
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .unwrap_or_default();

        debug!(
            partner = %partner_id,
            records = total,
            kept = messages.len(),
            first_person_found = !first_person_id.is_empty(),
            "decoded conversation"
        );

        Ok(Conversation {
            first_person_name,
            first_person_id,
            partner_name: raw.name,
            partner_id,
            chat_type: raw.chat_type,
            messages,
        })
    }

    /// Returns the display name of the participant who is not the partner.
    ///
    /// Empty if no qualifying message exists.
    pub fn first_person_name(&self) -> &str {
        &self.first_person_name
    }

    /// Returns the sender id of the participant who is not the partner.
    ///
    /// Empty if no qualifying message exists.
    pub fn first_person_id(&self) -> &str {
        &self.first_person_id
    }

    /// Returns the chat name, which for a personal chat is the partner's name.
    pub fn partner_name(&self) -> &str {
        &self.partner_name
    }

    /// Returns the partner id, e.g. `"user42"`.
    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    /// Returns the document's `type` value verbatim.
    pub fn chat_type(&self) -> &str {
        &self.chat_type
    }

    /// Returns the messages in document order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Consumes the conversation and returns its messages.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Decodes a conversation document with the default configuration.
///
/// # Errors
///
/// Returns [`TgchatError::Decode`] if the document is not an object, a
/// required key (`name`, `type`, `id`, `messages`) is missing, or any value
/// has the wrong shape. Nothing is returned on failure.
pub fn parse_conversation(data: &[u8]) -> Result<Conversation> {
    parse_conversation_with(data, &DecodeConfig::default())
}

/// Decodes a conversation document with a custom configuration.
pub fn parse_conversation_with(data: &[u8], config: &DecodeConfig) -> Result<Conversation> {
    let raw: RawConversation =
        serde_json::from_slice(data).map_err(|e| TgchatError::conversation(e, None))?;
    Conversation::from_raw(raw, config)
}

/// Finds the first person among already decoded messages.
///
/// Returns `(from_id, from)` of the first non-service message whose sender
/// id differs from `partner_id`, or `None` if there is no such message.
///
/// # Example
///
/// ```rust
/// use tgchat::conversation::derive_first_person;
/// use tgchat::message::parse_message;
///
/// let msgs = vec![
///     parse_message(br#"{"type":"message","from":"Bob","from_id":"user42"}"#)?,
///     parse_message(br#"{"type":"message","from":"Alice","from_id":"user7"}"#)?,
/// ];
/// assert_eq!(derive_first_person(&msgs, "user42"), Some(("user7", "Alice")));
/// # Ok::<(), tgchat::TgchatError>(())
/// ```
pub fn derive_first_person<'a>(messages: &'a [Message], partner_id: &str) -> Option<(&'a str, &'a str)> {
    derive_first_person_with(messages, partner_id, &DecodeConfig::default())
}

fn derive_first_person_with<'a>(
    messages: &'a [Message],
    partner_id: &str,
    config: &DecodeConfig,
) -> Option<(&'a str, &'a str)> {
    messages
        .iter()
        .filter(|msg| !config.is_service(msg.kind()))
        .find(|msg| msg.sender_id() != partner_id)
        .map(|msg| (msg.sender_id(), msg.sender()))
}

// ============================================================================
// Document visitor
// ============================================================================

/// Top-level fields of the export, before any conversation-level policy.
struct RawConversation {
    name: String,
    chat_type: String,
    id: i64,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum Field {
    Name,
    Type,
    Id,
    Messages,
    #[serde(other)]
    Other,
}

impl<'de> Deserialize<'de> for RawConversation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RawConversationVisitor)
    }
}

struct RawConversationVisitor;

impl<'de> Visitor<'de> for RawConversationVisitor {
    type Value = RawConversation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a Telegram chat export object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawConversation, A::Error> {
        let mut name = None;
        let mut chat_type = None;
        let mut id = None;
        let mut messages = None;

        while let Some(key) = map.next_key()? {
            match key {
                Field::Name => set_once(&mut name, "name", map.next_value()?)?,
                Field::Type => set_once(&mut chat_type, "type", map.next_value()?)?,
                Field::Id => set_once(&mut id, "id", map.next_value()?)?,
                Field::Messages => set_once(&mut messages, "messages", map.next_value()?)?,
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(RawConversation {
            name: name.ok_or_else(|| de::Error::missing_field("name"))?,
            chat_type: chat_type.ok_or_else(|| de::Error::missing_field("type"))?,
            id: id.ok_or_else(|| de::Error::missing_field("id"))?,
            messages: messages.ok_or_else(|| de::Error::missing_field("messages"))?,
        })
    }
}

fn set_once<T, E: de::Error>(slot: &mut Option<T>, field: &'static str, value: T) -> std::result::Result<(), E> {
    if slot.is_some() {
        return Err(E::duplicate_field(field));
    }
    *slot = Some(value);
    Ok(())
}
