//! Console error types

/// Console error with its operator-visible message
///
/// All variants are recoverable: the console prints the message and
/// returns to the prompt. Nothing here resets device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// Line or token exceeded its fixed capacity; offending buffer was flushed
    LineOverflow,
    /// No match in the application tier or the library table
    UnknownCommand,
    /// Memory dump argument is not `0x` + exactly 8 hex digits
    BadAddressFormat,
    /// A byte inside the 8 address digits is not a hex digit
    BadHexDigit,
}

impl ConsoleError {
    /// Get the message printed on the console
    pub fn message(&self) -> &'static str {
        match self {
            Self::LineOverflow => "Invalid command",
            Self::UnknownCommand => "Invalid command.",
            Self::BadAddressFormat => "Invalid memory format (0xAABBCCDD)",
            Self::BadHexDigit => "Error: Could not convert hex to decimal",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
