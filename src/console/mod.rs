//! Serial command console
//!
//! Interrupt-fed byte pipeline to a cooperative foreground loop.
//! Zero heap allocation - all static buffers.

pub mod console;
pub mod error;
pub mod format;
pub mod history;
pub mod ring_buffer;
pub mod router;
pub mod tokenizer;

pub use console::{Console, VERSION};
pub use error::ConsoleError;
pub use history::History;
pub use ring_buffer::{RingBuffer, RING_BUFFER_SIZE};
pub use router::{dispatch_library, ApplicationHook, CommandContext, CommandEntry, LIBRARY_COMMANDS};
pub use tokenizer::{tokenize, TokenSet, TOKEN_COUNT, TOKEN_LEN};
