//! Decoding of a single Telegram message record.
//!
//! A record is a flat JSON object. Every key is optional: absent keys (and
//! `null` sender fields, which Telegram writes for deleted accounts) decode
//! to zero values. Only a value of the wrong type fails the decode.
//!
//! # Example
//!
//! ```rust
//! use tgchat::message::parse_message;
//!
//! let msg = parse_message(br#"{
//!     "id": 7,
//!     "type": "message",
//!     "date": "2024-01-15T10:30:00",
//!     "date_unixtime": "1705314600",
//!     "from": "Alice",
//!     "from_id": "user1",
//!     "text": ["see ", {"type": "bold", "text": "this"}]
//! }"#)?;
//!
//! assert_eq!(msg.text(), "see this");
//! assert_eq!(msg.fragments().len(), 2);
//! assert!(!msg.is_media());
//! # Ok::<(), tgchat::TgchatError>(())
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::config::SERVICE_KIND;
use crate::error::{Result, TgchatError};
use crate::text::{MessageText, TextFragment};

/// `chrono` format of the `date` and `edited` fields.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Width and height Telegram uses for round video messages.
pub const ROUND_VIDEO_DIMENSIONS: u32 = 384;

/// Kind of media attached to a message.
///
/// Unknown media types are kept verbatim in [`MediaType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Animation,
    AudioFile,
    Sticker,
    VoiceMessage,
    /// Round video message
    VideoMessage,
    VideoFile,
    /// No media attached
    #[default]
    None,
    Other(String),
}

impl MediaType {
    /// Returns the export spelling of this media type (empty for `None`).
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Animation => "animation",
            MediaType::AudioFile => "audio_file",
            MediaType::Sticker => "sticker",
            MediaType::VoiceMessage => "voice_message",
            MediaType::VideoMessage => "video_message",
            MediaType::VideoFile => "video_file",
            MediaType::None => "",
            MediaType::Other(kind) => kind,
        }
    }

    /// Returns `true` unless this is [`MediaType::None`].
    pub fn is_some(&self) -> bool {
        !matches!(self, MediaType::None)
    }
}

impl From<&str> for MediaType {
    fn from(kind: &str) -> Self {
        match kind {
            "animation" => MediaType::Animation,
            "audio_file" => MediaType::AudioFile,
            "sticker" => MediaType::Sticker,
            "voice_message" => MediaType::VoiceMessage,
            "video_message" => MediaType::VideoMessage,
            "video_file" => MediaType::VideoFile,
            "" => MediaType::None,
            other => MediaType::Other(other.to_string()),
        }
    }
}

impl From<String> for MediaType {
    fn from(kind: String) -> Self {
        match MediaType::from(kind.as_str()) {
            MediaType::Other(_) => MediaType::Other(kind),
            known => known,
        }
    }
}

impl From<MediaType> for String {
    fn from(kind: MediaType) -> Self {
        match kind {
            MediaType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Information present on any kind of message.
///
/// `edited` and `edited_unixtime` are empty for messages that were never
/// edited, and always empty for round video messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GeneralInfo {
    pub id: i64,
    /// Record kind, `"message"` or `"service"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Local send time as `YYYY-MM-DDTHH:MM:SS`
    pub date: String,
    /// Send time as unix seconds, still in string form
    pub date_unixtime: String,
    /// Sender display name
    pub from: String,
    /// Sender id, e.g. `"user123456"`
    pub from_id: String,
    /// Id of the replied-to message, 0 when not a reply
    pub reply_to_message_id: i64,
    pub edited: String,
    pub edited_unixtime: String,
    /// Flattened text and its fragments
    #[serde(flatten)]
    pub text: MessageText,
    /// The record's own `text_entities` list
    pub text_entities: Vec<TextFragment>,
}

/// Media attached to a message.
///
/// If the message carries no media every field holds its zero value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MediaInfo {
    /// Path of the exported file, relative to the export directory
    pub file: String,
    pub thumbnail: String,
    pub duration_seconds: u64,
    pub width: u32,
    pub height: u32,
}

impl MediaInfo {
    /// Returns `true` if every field is at its zero value.
    pub fn is_empty(&self) -> bool {
        *self == MediaInfo::default()
    }
}

/// A single decoded Telegram message.
///
/// Built once by the decoder and read-only afterwards: fields are private
/// and accessors only hand out shared references or owned values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    #[serde(flatten)]
    general: GeneralInfo,
    #[serde(flatten)]
    media: MediaInfo,
    media_type: MediaType,
    mime_type: String,
}

impl Message {
    /// Returns the information common to every message kind.
    pub fn general_info(&self) -> &GeneralInfo {
        &self.general
    }

    /// Returns the attached media, zero-valued if there is none.
    pub fn media_info(&self) -> &MediaInfo {
        &self.media
    }

    /// Returns the kind of attached media, [`MediaType::None`] if there is none.
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// Returns the MIME type of the attached media, empty if there is none.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the message id.
    pub fn id(&self) -> i64 {
        self.general.id
    }

    /// Returns the record kind (`"message"` or `"service"`).
    pub fn kind(&self) -> &str {
        &self.general.kind
    }

    /// Returns the sender display name.
    pub fn sender(&self) -> &str {
        &self.general.from
    }

    /// Returns the sender id.
    pub fn sender_id(&self) -> &str {
        &self.general.from_id
    }

    /// Returns the replied-to message id, if this message is a reply.
    pub fn reply_to(&self) -> Option<i64> {
        Some(self.general.reply_to_message_id).filter(|id| *id != 0)
    }

    /// Returns the flattened text.
    pub fn text(&self) -> &str {
        self.general.text.as_str()
    }

    /// Returns the text fragments, empty unless the text was a well-formed array.
    pub fn fragments(&self) -> &[TextFragment] {
        self.general.text.fragments()
    }

    /// Returns the record's `text_entities` list.
    pub fn text_entities(&self) -> &[TextFragment] {
        &self.general.text_entities
    }

    /// Returns the send time parsed from the `date` field.
    ///
    /// Returns `None` if the field is empty or malformed.
    pub fn date(&self) -> Option<NaiveDateTime> {
        parse_export_date(&self.general.date).ok()
    }

    /// Returns the send time parsed from `date_unixtime`.
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        parse_unix_timestamp(&self.general.date_unixtime)
    }

    /// Returns the edit time parsed from `edited_unixtime`, if the message was edited.
    pub fn edited_at(&self) -> Option<DateTime<Utc>> {
        parse_unix_timestamp(&self.general.edited_unixtime)
    }

    /// Returns `true` if the message has media attached.
    pub fn is_media(&self) -> bool {
        self.media_type.is_some()
    }

    /// Returns `true` for round video messages.
    pub fn is_round_video(&self) -> bool {
        self.media_type == MediaType::VideoMessage
    }

    /// Returns `true` if the record kind is the default service kind.
    pub fn is_service(&self) -> bool {
        self.general.kind == SERVICE_KIND
    }
}

/// Decodes one message record.
///
/// # Errors
///
/// Returns [`TgchatError::Decode`] if the input is not a JSON object or a
/// typed key has a value of the wrong type.
pub fn parse_message(data: &[u8]) -> Result<Message> {
    serde_json::from_slice(data).map_err(TgchatError::message)
}

/// Parses an export date such as `"2024-01-15T10:30:00"`.
///
/// # Example
///
/// ```rust
/// use tgchat::message::parse_export_date;
///
/// let date = parse_export_date("2024-01-15T10:30:00").unwrap();
/// assert_eq!(date.to_string(), "2024-01-15 10:30:00");
/// assert!(parse_export_date("15.01.2024").is_err());
/// ```
pub fn parse_export_date(date: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date, EXPORT_DATE_FORMAT)
        .map_err(|_| TgchatError::invalid_date(date))
}

/// Parses a Unix timestamp string to DateTime.
///
/// Telegram stores timestamps as strings like "1234567890".
pub fn parse_unix_timestamp(ts_str: &str) -> Option<DateTime<Utc>> {
    ts_str
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

// ============================================================================
// Wire record
// ============================================================================

/// Message record as it appears in the export.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageRecord {
    id: i64,
    #[serde(rename = "type")]
    kind: String,
    date: String,
    date_unixtime: String,
    #[serde(deserialize_with = "null_as_default")]
    from: String,
    #[serde(deserialize_with = "null_as_default")]
    from_id: String,
    reply_to_message_id: i64,
    edited: String,
    edited_unixtime: String,
    text: Option<Box<RawValue>>,
    text_entities: Vec<TextFragment>,
    media_type: MediaType,
    mime_type: String,
    file: String,
    thumbnail: String,
    duration_seconds: u64,
    width: u32,
    height: u32,
}

impl From<MessageRecord> for Message {
    fn from(record: MessageRecord) -> Self {
        let text = record
            .text
            .as_deref()
            .map(MessageText::decode_raw)
            .unwrap_or_default();

        Message {
            general: GeneralInfo {
                id: record.id,
                kind: record.kind,
                date: record.date,
                date_unixtime: record.date_unixtime,
                from: record.from,
                from_id: record.from_id,
                reply_to_message_id: record.reply_to_message_id,
                edited: record.edited,
                edited_unixtime: record.edited_unixtime,
                text,
                text_entities: record.text_entities,
            },
            media: MediaInfo {
                file: record.file,
                thumbnail: record.thumbnail,
                duration_seconds: record.duration_seconds,
                width: record.width,
                height: record.height,
            },
            media_type: record.media_type,
            mime_type: record.mime_type,
        }
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        MessageRecord::deserialize(deserializer).map(Message::from)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
