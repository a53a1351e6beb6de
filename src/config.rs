//! Configuration types for decoding.
//!
//! [`DecodeConfig`] controls the conversation-level policies of the decoder:
//! which message kind counts as a service event, how the partner id is
//! rendered, and whether a specific chat type is required.
//!
//! # Example
//!
//! ```rust
//! use tgchat::config::DecodeConfig;
//! use tgchat::parser::ExportParser;
//!
//! let config = DecodeConfig::new()
//!     .with_keep_service_events(true)
//!     .with_expected_chat_type("personal_chat");
//!
//! let parser = ExportParser::with_config(config);
//! ```

use serde::{Deserialize, Serialize};

/// Message kind Telegram uses for non-content events (calls, pins, joins).
pub const SERVICE_KIND: &str = "service";

/// Prefix Telegram puts in front of numeric user ids in `from_id`.
pub const PARTNER_ID_PREFIX: &str = "user";

/// Chat type marker of a one-to-one conversation.
pub const PERSONAL_CHAT: &str = "personal_chat";

/// Configuration for conversation decoding.
///
/// # Example
///
/// ```rust
/// use tgchat::config::DecodeConfig;
///
/// let config = DecodeConfig::default();
/// assert_eq!(config.service_kind, "service");
/// assert_eq!(config.partner_id_prefix, "user");
/// assert!(!config.keep_service_events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Message kind treated as a service event (default: "service")
    pub service_kind: String,

    /// Prefix joined with the numeric document id to form the partner id (default: "user")
    pub partner_id_prefix: String,

    /// Keep service events in the message list (default: false)
    pub keep_service_events: bool,

    /// Reject documents whose `type` differs from this value (default: None)
    pub expected_chat_type: Option<String>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            service_kind: SERVICE_KIND.to_string(),
            partner_id_prefix: PARTNER_ID_PREFIX.to_string(),
            keep_service_events: false,
            expected_chat_type: None,
        }
    }
}

impl DecodeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that only accepts personal chats.
    pub fn personal_only() -> Self {
        Self::default().with_expected_chat_type(PERSONAL_CHAT)
    }

    /// Sets the message kind treated as a service event.
    #[must_use]
    pub fn with_service_kind(mut self, kind: impl Into<String>) -> Self {
        self.service_kind = kind.into();
        self
    }

    /// Sets the partner id prefix.
    #[must_use]
    pub fn with_partner_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partner_id_prefix = prefix.into();
        self
    }

    /// Sets whether service events stay in the message list.
    #[must_use]
    pub fn with_keep_service_events(mut self, keep: bool) -> Self {
        self.keep_service_events = keep;
        self
    }

    /// Requires the document's chat type to equal `chat_type`.
    #[must_use]
    pub fn with_expected_chat_type(mut self, chat_type: impl Into<String>) -> Self {
        self.expected_chat_type = Some(chat_type.into());
        self
    }

    /// Renders a numeric document id as a partner id, e.g. `42` -> `"user42"`.
    pub fn partner_id(&self, id: i64) -> String {
        format!("{}{}", self.partner_id_prefix, id)
    }

    /// Returns `true` if `kind` is the configured service kind.
    pub fn is_service(&self, kind: &str) -> bool {
        kind == self.service_kind
    }
}
