//! Line tokenizer
//!
//! Splits the line buffer on single spaces into a bounded token set.
//! Tokens are NUL-terminated in fixed slots; nothing is heap allocated.

use super::error::ConsoleError;
use super::ring_buffer::RingBuffer;

/// Token slot width: 15 usable characters plus the terminator.
pub const TOKEN_LEN: usize = 16;

/// Maximum number of tokens per line.
pub const TOKEN_COUNT: usize = 3;

/// Tokens extracted from one submitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    tokens: [[u8; TOKEN_LEN]; TOKEN_COUNT],
    count: usize,
}

impl TokenSet {
    /// Create empty token set
    pub const fn empty() -> Self {
        Self {
            tokens: [[0u8; TOKEN_LEN]; TOKEN_COUNT],
            count: 0,
        }
    }

    /// Number of complete tokens produced
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get token by index, up to its terminator
    ///
    /// A token ended by buffer exhaustion keeps its final byte, so a line
    /// with a trailing space yields a token that still carries that space.
    pub fn get(&self, idx: usize) -> Option<&str> {
        if idx >= self.count {
            return None;
        }

        let slot = &self.tokens[idx];
        let len = slot.iter().position(|&b| b == 0).unwrap_or(TOKEN_LEN);
        core::str::from_utf8(&slot[..len]).ok()
    }

    /// First token, or `""` when the line was blank
    pub fn command(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    /// Single optional argument handed to command handlers
    pub fn arg(&self) -> Option<&str> {
        self.get(1)
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tokenize the line buffer's content.
///
/// Leading spaces at the start of a token are skipped. A space ends the
/// current token and its slot is terminated in place; buffer exhaustion
/// ends the final token one position later so its last byte survives.
///
/// Exceeding the per-token length or the token count aborts the whole
/// tokenization: the source buffer is flushed (so the next line cannot
/// be misframed by leftovers) and no tokens are reported.
pub fn tokenize<const N: usize>(line: &RingBuffer<N>) -> Result<TokenSet, ConsoleError> {
    let mut set = TokenSet::empty();
    let mut token = 0usize;
    let mut symbol = 0usize;

    while let Some(byte) = line.read() {
        if symbol == 0 && byte == b' ' {
            continue;
        }

        if token >= TOKEN_COUNT || symbol >= TOKEN_LEN - 1 {
            line.flush();
            return Err(ConsoleError::LineOverflow);
        }

        set.tokens[token][symbol] = byte;

        if byte == b' ' || line.is_empty() {
            if line.is_empty() {
                // Exhaustion keeps the last byte; terminator goes one past it
                set.tokens[token][symbol + 1] = 0;
            } else {
                set.tokens[token][symbol] = 0;
            }
            symbol = 0;
            token += 1;
        } else {
            symbol += 1;
        }
    }

    set.count = token;
    Ok(set)
}
