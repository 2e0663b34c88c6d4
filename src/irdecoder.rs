//! NEC infrared frame decoder
//!
//! The receive path is split across contexts: the edge-capture interrupt
//! records pulse widths, the frame-gap timeout classifies them into a
//! 32-bit message, and the foreground loop collects the decoded key.

/// Device address carried in bits 31..24 of every accepted frame.
pub const IR_ADDRESS: u8 = 0x20;

/// Shortest pulse width recorded, in 2 us timer ticks.
pub const PULSE_MIN: u32 = 200;

/// Longest pulse width recorded, in 2 us timer ticks.
pub const PULSE_MAX: u32 = 1000;

/// Widths at or above this classify as a 1 bit.
pub const BIT_THRESHOLD: u32 = 500;

const FRAME_BITS: usize = 32;

/// Remote keys this firmware understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrKey {
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    Power,
    ChannelUp,
    ChannelDown,
    VolumeUp,
    VolumeDown,
    Left,
    Right,
    Up,
    Down,
    Ok,
}

impl IrKey {
    /// Map a decoded command byte to a key.
    pub fn from_scancode(code: u8) -> Option<Self> {
        match code {
            0x10 => Some(IrKey::Kp0),
            0x11 => Some(IrKey::Kp1),
            0x12 => Some(IrKey::Kp2),
            0x13 => Some(IrKey::Kp3),
            0x14 => Some(IrKey::Kp4),
            0x15 => Some(IrKey::Kp5),
            0x16 => Some(IrKey::Kp6),
            0x17 => Some(IrKey::Kp7),
            0x18 => Some(IrKey::Kp8),
            0x19 => Some(IrKey::Kp9),
            0x08 => Some(IrKey::Power),
            0x00 => Some(IrKey::ChannelUp),
            0x01 => Some(IrKey::ChannelDown),
            0x02 => Some(IrKey::VolumeUp),
            0x03 => Some(IrKey::VolumeDown),
            0x07 => Some(IrKey::Left),
            0x06 => Some(IrKey::Right),
            0x40 => Some(IrKey::Up),
            0x41 => Some(IrKey::Down),
            0x44 => Some(IrKey::Ok),
            _ => None,
        }
    }
}

/// Validate a raw 32-bit frame and extract the command byte.
///
/// Layout is address, inverted address, command, inverted command, MSB
/// first. The command byte arrives LSB first on the wire and is
/// bit-reversed before use. Frames for other addresses or with a failed
/// complement check are dropped.
pub fn decode_frame(msg: u32) -> Option<u8> {
    let addr = (msg >> 24) as u8;
    if addr != IR_ADDRESS {
        return None;
    }

    let addr_inv = (msg >> 16) as u8;
    let cmd = (msg >> 8) as u8;
    let cmd_inv = msg as u8;

    if (addr ^ addr_inv) == 0xFF && (cmd ^ cmd_inv) == 0xFF {
        Some(cmd.reverse_bits())
    } else {
        None
    }
}

/// Pulse-width accumulator and pending-key latch
pub struct IrDecoder {
    bit_times: [u32; FRAME_BITS],
    index: usize,
    pending: Option<IrKey>,
}

impl IrDecoder {
    pub const fn new() -> Self {
        Self {
            bit_times: [0; FRAME_BITS],
            index: 0,
            pending: None,
        }
    }

    /// Record one falling-edge pulse width (edge-capture interrupt).
    ///
    /// Widths outside the plausible bit window are discarded; so is
    /// anything past 32 recorded bits.
    pub fn record_pulse(&mut self, ticks: u32) {
        if ticks > PULSE_MIN && ticks < PULSE_MAX && self.index < FRAME_BITS {
            self.bit_times[self.index] = ticks;
            self.index += 1;
        }
    }

    /// Frame-gap timeout: classify recorded widths and latch the key.
    ///
    /// Unrecorded slots classify as 0 bits. The accumulator is always
    /// cleared, whether or not the frame was accepted.
    pub fn end_frame(&mut self) {
        let mut msg: u32 = 0;
        for (i, &ticks) in self.bit_times.iter().enumerate() {
            if ticks >= BIT_THRESHOLD {
                msg |= 1 << (31 - i);
            }
        }

        self.bit_times = [0; FRAME_BITS];
        self.index = 0;

        if let Some(key) = decode_frame(msg).and_then(IrKey::from_scancode) {
            self.pending = Some(key);
        }
    }

    /// Collect the decoded key, if any (foreground loop).
    pub fn take(&mut self) -> Option<IrKey> {
        self.pending.take()
    }
}

impl Default for IrDecoder {
    fn default() -> Self {
        Self::new()
    }
}
