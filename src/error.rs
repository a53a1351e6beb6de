//! Unified error types for tgchat.
//!
//! This module provides a single [`TgchatError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! - **Structural errors** (missing keys, wrong shapes) abort the whole decode
//!   and always reach the caller
//! - **Text shape errors** are absorbed by the tolerant text scan and never
//!   surface
//! - **Timestamp errors** are absorbed by the timestamp accessors, and only
//!   surface from [`parse_export_date`](crate::message::parse_export_date)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for tgchat operations.
///
/// # Example
///
/// ```rust
/// use tgchat::error::Result;
/// use tgchat::Conversation;
///
/// fn load(bytes: &[u8]) -> Result<Conversation> {
///     tgchat::parse_conversation(bytes)
/// }
/// ```
pub type Result<T> = std::result::Result<T, TgchatError>;

/// The error type for all tgchat operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TgchatError {
    /// An I/O error occurred while loading an export.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document does not have the expected structure.
    ///
    /// Raised when a required key is missing, a value has the wrong type,
    /// or the input is not valid JSON at all. No partial result is produced.
    #[error("Failed to decode Telegram {target}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Decode {
        /// What was being decoded ("conversation" or "message")
        target: &'static str,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The document is well-formed but not what the caller asked for.
    ///
    /// This occurs when:
    /// - The chat type does not match [`DecodeConfig::expected_chat_type`](crate::config::DecodeConfig)
    /// - The streaming scanner cannot find the top-level `messages` array
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A date string does not match the export date format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A single message record exceeded the streaming size limit.
    #[error("Message too large: {actual_size} bytes (maximum: {max_size} bytes)")]
    BufferOverflow {
        /// Maximum allowed size in bytes
        max_size: usize,
        /// Size at which the record was abandoned
        actual_size: usize,
    },

    /// The input ended in the middle of a record.
    #[error("Unexpected end of file while {context}")]
    UnexpectedEof {
        /// Context about what was being parsed
        context: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TgchatError {
    /// Creates a structural decode error for a whole conversation document.
    pub fn conversation(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TgchatError::Decode {
            target: "conversation",
            source,
            path,
        }
    }

    /// Creates a structural decode error for a single message record.
    pub fn message(source: serde_json::Error) -> Self {
        TgchatError::Decode {
            target: "message",
            source,
            path: None,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        TgchatError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        TgchatError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DDTHH:MM:SS",
        }
    }

    /// Creates a buffer overflow error.
    pub fn buffer_overflow(max_size: usize, actual_size: usize) -> Self {
        TgchatError::BufferOverflow {
            max_size,
            actual_size,
        }
    }

    /// Creates an unexpected EOF error.
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        TgchatError::UnexpectedEof {
            context: context.into(),
        }
    }

    /// Attaches a file path to a decode error. Other variants pass through.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            TgchatError::Decode { target, source, .. } => TgchatError::Decode {
                target,
                source,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TgchatError::Io(_))
    }

    /// Returns `true` if this is a structural decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, TgchatError::Decode { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, TgchatError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, TgchatError::InvalidDate { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
