//! Console state machine
//!
//! Drains the interrupt-fed ingest buffer one byte at a time, mirrors
//! accepted input back to the transport and assembles the editable line.
//! All mutation happens on the foreground loop; the interrupt only ever
//! writes into the ingest ring.

use core::fmt::Write;

use super::error::ConsoleError;
use super::history::History;
use super::ring_buffer::{RingBuffer, RING_BUFFER_SIZE};
use super::router::{dispatch_library, ApplicationHook, CommandContext};
use super::tokenizer::tokenize;
use crate::platform::Platform;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

const ESC: u8 = 0x1B;
const DEL: u8 = 0x7F;

/// Input classifier state
#[derive(Clone, Copy, PartialEq)]
enum ConsoleState {
    Idle,
    Escape,  // Got ESC
    Bracket, // Got ESC [
}

/// Interactive command console
pub struct Console<'a> {
    /// Interrupt-fed ingest ring; this struct only reads it.
    ingest: &'a RingBuffer,
    /// Confirmed, editable contents of the line being typed.
    line: RingBuffer,
    history: History,
    state: ConsoleState,
    app: Option<&'a mut dyn ApplicationHook>,
}

impl<'a> Console<'a> {
    /// Create a console draining `ingest`, with an optional application tier.
    pub fn new(ingest: &'a RingBuffer, app: Option<&'a mut dyn ApplicationHook>) -> Self {
        Self {
            ingest,
            line: RingBuffer::new(),
            history: History::new(),
            state: ConsoleState::Idle,
            app,
        }
    }

    /// Drain everything currently pending in the ingest buffer.
    ///
    /// Called once per foreground loop iteration. Never blocks; a line
    /// buffer overflow aborts the rest of the pass so a corrupted line
    /// cannot leak into the next one.
    pub fn poll(&mut self, platform: &dyn Platform, out: &mut dyn Write) {
        while let Some(byte) = self.ingest.read() {
            if !self.handle_byte(byte, platform, out) {
                return;
            }
        }
    }

    /// Process one byte; `false` aborts the current drain pass.
    fn handle_byte(&mut self, byte: u8, platform: &dyn Platform, out: &mut dyn Write) -> bool {
        match self.state {
            ConsoleState::Idle => self.handle_idle(byte, platform, out),
            ConsoleState::Escape => {
                self.state = if byte == b'[' {
                    ConsoleState::Bracket
                } else {
                    // Lone ESC or unknown sequence: abandoned, byte discarded
                    ConsoleState::Idle
                };
                true
            }
            ConsoleState::Bracket => {
                self.state = ConsoleState::Idle;
                match byte {
                    b'A' => self.handle_up(out), // Up arrow
                    b'B' | b'C' | b'D' => true,  // Down/right/left: reserved
                    _ => true,
                }
            }
        }
    }

    fn handle_idle(&mut self, byte: u8, platform: &dyn Platform, out: &mut dyn Write) -> bool {
        match byte {
            ESC => {
                self.state = ConsoleState::Escape;
                true
            }

            b'\r' => {
                self.submit(platform, out);
                true
            }

            DEL => {
                if self.line.delete_last() {
                    // Destructive backspace echo
                    let _ = write!(out, "\x08 \x08");
                }
                true
            }

            b'\t' => true, // Ignore tabs

            _ => {
                if !self.line.write(byte) {
                    // Line too long: discard it rather than corrupt framing
                    self.line.flush();
                    return false;
                }
                let _ = write!(out, "{}", byte as char);
                true
            }
        }
    }

    /// Carriage return: tokenize, dispatch, reprint the prompt.
    fn submit(&mut self, platform: &dyn Platform, out: &mut dyn Write) {
        match tokenize(&self.line) {
            Err(e) => {
                let _ = write!(out, "\r\n{}", e.message());
            }
            Ok(tokens) => {
                if tokens.count() >= 1 && !tokens.command().is_empty() {
                    // TODO: history.push(line) here once recall advances the index
                    if let Err(e) = self.dispatch(&tokens, platform, out) {
                        let _ = write!(out, "\r\n{}", e.message());
                    }
                }
            }
        }
        let _ = write!(out, "\r\n> ");
    }

    fn dispatch(
        &mut self,
        tokens: &super::tokenizer::TokenSet,
        platform: &dyn Platform,
        out: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        if let Some(app) = self.app.as_deref_mut() {
            if app.resolve(tokens, platform, out) {
                return Ok(());
            }
        }

        let mut ctx = CommandContext {
            out,
            platform,
            app_help: self.app.as_deref().map(|a| a as &dyn ApplicationHook),
        };
        dispatch_library(tokens, &mut ctx)
    }

    /// Up arrow: erase the echoed line and re-type the recalled entry.
    fn handle_up(&mut self, out: &mut dyn Write) -> bool {
        let mut buf = [0u8; RING_BUFFER_SIZE];
        let len = self.history.recall_into(&mut buf);
        if len == 0 {
            return true;
        }

        for _ in 0..len {
            if self.line.delete_last() {
                let _ = write!(out, "\x08 \x08");
            }
        }

        if let Ok(entry) = core::str::from_utf8(&buf[..len]) {
            let _ = write!(out, "{}", entry);
        }

        for &byte in &buf[..len] {
            if !self.line.write(byte) {
                self.line.flush();
                return false;
            }
        }
        true
    }

    /// History store, exposed for the submit wiring and for tests.
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Print the welcome banner and the first prompt.
    pub fn print_banner(&self, out: &mut dyn Write) {
        // Clear, home, italic+underline banner, back to normal
        let _ = write!(
            out,
            "\x1b[2J\x1b[H\x1b[3m\x1b[4m{}\x1b[23m\x1b[24m\r\n\r\n> ",
            VERSION
        );
    }
}
