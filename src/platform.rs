//! Platform services behind the console
//!
//! Everything the command handlers need from the device is injected
//! through this trait at construction time: tests supply a synthetic
//! implementation, the firmware entry point supplies the real one.

/// Device services consumed by command handlers
pub trait Platform {
    /// Restart the firmware (`rs` command).
    fn restart(&self);

    /// Hand control to the bootloader (`flash` command).
    fn enter_bootloader(&self);

    /// Read one 32-bit word at the given address (memory dump commands).
    fn read_word(&self, addr: u32) -> u32;
}
