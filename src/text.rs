//! Decoding of Telegram's polymorphic `text` field.
//!
//! In a Telegram export the `text` of a message is either a plain string or an
//! array mixing bare strings with entity objects:
//!
//! ```json
//! "text": "hello"
//! "text": ["he said ", {"type": "link", "text": "this"}, " to me"]
//! ```
//!
//! [`MessageText::decode`] normalizes both shapes into one flattened string.
//! Decoding runs in two tiers:
//!
//! 1. **Strict**: the value must be a string, or an array whose elements are
//!    bare strings or objects with exactly `type` and `text`. On success the
//!    typed [`TextFragment`] sequence is kept alongside the flattened text.
//! 2. **Tolerant**: anything the strict tier rejects (entities with extra keys
//!    such as `href`, unexpected nesting) is rescanned with a streaming
//!    visitor that only collects text. Fragments stay empty on this path.
//!
//! The text field never fails a message decode.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::{debug, warn};

/// Style tag of a text fragment.
///
/// The named variants are the kinds Telegram is known to emit in personal
/// chats. Anything else is kept verbatim in [`FragmentKind::Other`], so an
/// unknown kind survives a decode/serialize cycle unchanged.
///
/// # Example
///
/// ```rust
/// use tgchat::text::FragmentKind;
///
/// assert_eq!(FragmentKind::from("link"), FragmentKind::Link);
/// assert_eq!(FragmentKind::from("spoiler").as_str(), "spoiler");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FragmentKind {
    Bold,
    Code,
    Italic,
    Link,
    Phone,
    #[default]
    Plain,
    Strikethrough,
    /// A kind outside the known vocabulary, preserved as written.
    Other(String),
}

impl FragmentKind {
    /// Returns the export spelling of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            FragmentKind::Bold => "bold",
            FragmentKind::Code => "code",
            FragmentKind::Italic => "italic",
            FragmentKind::Link => "link",
            FragmentKind::Phone => "phone",
            FragmentKind::Plain => "plain",
            FragmentKind::Strikethrough => "strikethrough",
            FragmentKind::Other(kind) => kind,
        }
    }

    /// Returns `true` for kinds outside the known vocabulary.
    pub fn is_other(&self) -> bool {
        matches!(self, FragmentKind::Other(_))
    }
}

impl From<&str> for FragmentKind {
    fn from(kind: &str) -> Self {
        match kind {
            "bold" => FragmentKind::Bold,
            "code" => FragmentKind::Code,
            "italic" => FragmentKind::Italic,
            "link" => FragmentKind::Link,
            "phone" => FragmentKind::Phone,
            "plain" => FragmentKind::Plain,
            "strikethrough" => FragmentKind::Strikethrough,
            other => FragmentKind::Other(other.to_string()),
        }
    }
}

impl From<String> for FragmentKind {
    fn from(kind: String) -> Self {
        match FragmentKind::from(kind.as_str()) {
            FragmentKind::Other(_) => FragmentKind::Other(kind),
            known => known,
        }
    }
}

impl From<FragmentKind> for String {
    fn from(kind: FragmentKind) -> Self {
        match kind {
            FragmentKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous span of message text carrying one style tag.
///
/// Deserializing a `TextFragment` directly ignores unknown keys, which is
/// what the `text_entities` list needs (`text_link` entities carry `href`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextFragment {
    /// Style tag
    #[serde(rename = "type", default)]
    pub kind: FragmentKind,
    /// Text covered by this fragment
    #[serde(default)]
    pub text: String,
}

impl TextFragment {
    /// Creates a fragment of the given kind.
    pub fn new(kind: impl Into<FragmentKind>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }

    /// Creates a plain fragment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(FragmentKind::Plain, text)
    }
}

/// The normalized form of a message's `text` field.
///
/// Invariant: when `fragments` is non-empty, concatenating their texts in
/// order yields `text` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MessageText {
    text: String,
    fragments: Vec<TextFragment>,
}

impl MessageText {
    /// Creates a text with no fragment structure.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fragments: Vec::new(),
        }
    }

    /// Decodes the raw JSON of a `text` field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tgchat::text::{FragmentKind, MessageText};
    ///
    /// let text = MessageText::decode(r#"["he said ", {"type": "link", "text": "this"}, " to me"]"#);
    /// assert_eq!(text.as_str(), "he said this to me");
    /// assert_eq!(text.fragments()[1].kind, FragmentKind::Link);
    ///
    /// let text = MessageText::decode(r#""hello""#);
    /// assert_eq!(text.as_str(), "hello");
    /// assert!(text.fragments().is_empty());
    /// ```
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<StrictText>(raw) {
            Ok(StrictText::Plain(text)) => Self::plain(text),
            Ok(StrictText::Fragments(parts)) => parts.into_iter().map(TextFragment::from).collect(),
            Err(err) => {
                debug!(error = %err, "text rejected by strict decode, falling back to tolerant scan");
                match serde_json::from_str::<TolerantText>(raw) {
                    Ok(TolerantText(text)) => Self::plain(text),
                    Err(err) => {
                        warn!(error = %err, "text field could not be scanned, leaving it empty");
                        Self::default()
                    }
                }
            }
        }
    }

    /// Decodes a `text` field captured as a raw JSON value.
    pub fn decode_raw(raw: &RawValue) -> Self {
        Self::decode(raw.get())
    }

    /// Returns the flattened text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the typed fragments, empty for plain strings and tolerant decodes.
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Returns `true` if the text carried fragment structure.
    pub fn is_structured(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// Returns `true` if the flattened text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl FromIterator<TextFragment> for MessageText {
    fn from_iter<I: IntoIterator<Item = TextFragment>>(iter: I) -> Self {
        let mut out = MessageText::default();
        for fragment in iter {
            out.text.push_str(&fragment.text);
            out.fragments.push(fragment);
        }
        out
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// Strict tier
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StrictText {
    Fragments(Vec<StrictFragment>),
    Plain(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrictFragment {
    Bare(String),
    Entity(StrictEntity),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictEntity {
    #[serde(rename = "type")]
    kind: FragmentKind,
    text: String,
}

impl From<StrictFragment> for TextFragment {
    fn from(fragment: StrictFragment) -> Self {
        match fragment {
            StrictFragment::Bare(text) => TextFragment::plain(text),
            StrictFragment::Entity(StrictEntity { kind, text }) => TextFragment { kind, text },
        }
    }
}

// ============================================================================
// Tolerant tier
// ============================================================================

/// Flattened text collected by walking any JSON shape.
///
/// Strings are taken as-is, arrays concatenate their elements, objects
/// contribute only the value under their `text` key. Other scalars are empty.
struct TolerantText(String);

impl<'de> Deserialize<'de> for TolerantText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TolerantVisitor).map(TolerantText)
    }
}

struct TolerantVisitor;

impl<'de> Visitor<'de> for TolerantVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, an array of text fragments, or a fragment object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
        let mut out = String::new();
        while let Some(TolerantText(part)) = seq.next_element()? {
            out.push_str(&part);
        }
        Ok(out)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        let mut out = String::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == "text" {
                let TolerantText(part) = map.next_value()?;
                out.push_str(&part);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(out)
    }
}
