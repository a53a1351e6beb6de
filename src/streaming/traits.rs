//! Core traits and configuration for streaming.
//!
//! - [`MessageIterator`] - Iterator with progress tracking
//! - [`StreamingConfig`] - Configuration options

use crate::error::Result;
use crate::message::Message;

/// Iterator over messages with progress tracking.
///
/// Extends the standard [`Iterator`] trait with methods for monitoring
/// parsing progress, useful for progress bars and logging.
///
/// # Object Safety
///
/// This trait is object-safe, enabling dynamic dispatch via `Box<dyn MessageIterator>`.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> tgchat::Result<()> {
/// use tgchat::streaming::{MessageIterator, StreamingConfig, stream_file};
///
/// let mut iter = stream_file("result.json", StreamingConfig::default())?;
///
/// while let Some(result) = iter.next() {
///     let msg = result?;
///
///     if let Some(pct) = iter.progress() {
///         eprintln!("\r{:.1}% {}", pct, msg.id());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub trait MessageIterator: Iterator<Item = Result<Message>> {
    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if the total size is unknown.
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return None;
        }
        Some((self.bytes_processed() as f64 / total as f64) * 100.0)
    }

    /// Returns the number of bytes processed so far.
    fn bytes_processed(&self) -> u64;

    /// Returns the total input size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}

/// Configuration options for streaming.
///
/// # Examples
///
/// ```
/// use tgchat::streaming::StreamingConfig;
///
/// let config = StreamingConfig::new()
///     .with_buffer_size(128 * 1024)  // 128KB buffer
///     .with_skip_invalid(false);      // Return errors instead of skipping
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamingConfig {
    /// Buffer size for file reading.
    ///
    /// Default: 64KB.
    pub buffer_size: usize,

    /// Maximum size of a single message record in bytes.
    ///
    /// Default: 10MB. Larger records are skipped or reported as
    /// [`TgchatError::BufferOverflow`](crate::TgchatError::BufferOverflow).
    pub max_message_size: usize,

    /// Whether to skip invalid records or return errors.
    ///
    /// Default: `true`. Truncated input is reported either way.
    pub skip_invalid: bool,

    /// Whether to skip service events.
    ///
    /// Default: `true`.
    pub skip_service_events: bool,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024,             // 64KB
            max_message_size: 10 * 1024 * 1024, // 10MB
            skip_invalid: true,
            skip_service_events: true,
        }
    }
}

impl StreamingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the maximum message record size.
    #[must_use]
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Sets whether to skip invalid records.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    /// Sets whether to skip service events.
    #[must_use]
    pub fn with_skip_service_events(mut self, skip: bool) -> Self {
        self.skip_service_events = skip;
        self
    }
}
