//! Streaming access to the messages of large exports.
//!
//! [`parse_conversation`](crate::parse_conversation) needs the whole document
//! in memory. For multi-gigabyte exports, [`MessageStream`] yields one
//! decoded [`Message`](crate::Message) at a time instead, holding at most one
//! record in memory.
//!
//! The stream does not derive the first person or the partner; those need
//! the full document.
//!
//! # Example
//!
//! ```rust,no_run
//! use tgchat::streaming::{StreamingConfig, stream_file};
//!
//! for result in stream_file("result.json", StreamingConfig::default())? {
//!     match result {
//!         Ok(message) => println!("{}: {}", message.sender(), message.text()),
//!         Err(e) => eprintln!("Skipped invalid message: {}", e),
//!     }
//! }
//! # Ok::<(), tgchat::TgchatError>(())
//! ```

mod telegram;
mod traits;

pub use telegram::{MessageStream, stream_file};
pub use traits::{MessageIterator, StreamingConfig};
