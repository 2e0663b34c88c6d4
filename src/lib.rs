//! # BlinkyRepl
//!
//! Interactive serial console firmware: an operator inspects memory,
//! restarts the device and drives an LED pattern bar and an IR remote
//! receiver over a UART link.
//!
//! ## Architecture
//!
//! One preemptive receive interrupt, one cooperative foreground loop.
//! The interrupt only pushes raw bytes into a lock-free ingest ring;
//! the foreground loop owns everything else:
//!
//! - [`console`]: SPSC ring buffers, the input state machine, the
//!   bounded tokenizer and the two-tier command router
//! - [`led`]: pattern engine for the shift-register LED bar
//! - [`irdecoder`]: NEC frame decoder fed by edge-capture timing
//! - [`app`]: the application command tier wiring both peripherals
//! - [`platform`]: the injected seam to restart/bootloader/memory

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod console;
pub mod irdecoder;
pub mod led;
pub mod platform;

pub use app::{BlinkyApp, LedHandle};
pub use console::{Console, ConsoleError, RingBuffer};
pub use irdecoder::{IrDecoder, IrKey};
pub use led::{FrameSink, LedPanel, Pattern, Speed};
pub use platform::Platform;
