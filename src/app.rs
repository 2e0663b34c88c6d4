//! Application command tier
//!
//! Binds the console's capability hook and the IR remote keys to the
//! LED pattern engine. The LED panel is also mutated by the millisecond
//! timer, so access goes through [`LedHandle`]; the firmware backs it
//! with a critical section, tests with a plain `RefCell`.

use core::cell::RefCell;
use core::fmt::Write;

use crate::console::{ApplicationHook, TokenSet};
use crate::irdecoder::IrKey;
use crate::led::{LedPanel, Pattern};
use crate::platform::Platform;

/// Shared access to the LED panel
pub trait LedHandle {
    fn with<R>(&self, f: impl FnOnce(&mut LedPanel) -> R) -> R;
}

/// Single-context backing, enough for tests and host tooling.
impl LedHandle for RefCell<LedPanel> {
    fn with<R>(&self, f: impl FnOnce(&mut LedPanel) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Application tier: LED commands and the bootloader jump
pub struct BlinkyApp<'a, L: LedHandle> {
    led: &'a L,
}

impl<'a, L: LedHandle> BlinkyApp<'a, L> {
    pub fn new(led: &'a L) -> Self {
        Self { led }
    }

    /// Animation feedback, silenced by the `print` toggle.
    fn say(&self, out: &mut dyn Write, msg: &str, detail: &str) {
        if self.led.with(|led| led.is_verbose()) {
            let _ = write!(out, "\r\n{}{}", msg, detail);
        }
    }

    fn change_pattern(&mut self, out: &mut dyn Write, pattern: Pattern) {
        if self.led.with(|led| led.set_pattern(pattern)) {
            self.say(out, "Changing pattern to: ", pattern.name());
        }
    }

    /// Dispatch one decoded remote key.
    pub fn handle_ir(&mut self, key: IrKey, out: &mut dyn Write) {
        match key {
            IrKey::Kp0 => self.toggle_print(out),
            IrKey::Kp1 => self.change_pattern(out, Pattern::Binary),
            IrKey::Kp2 => self.change_pattern(out, Pattern::Wave),
            IrKey::Kp3 => self.change_pattern(out, Pattern::Alternating),
            IrKey::Kp4 => self.change_pattern(out, Pattern::Bounce),
            IrKey::Power => self.toggle_power(out),
            IrKey::ChannelUp => {
                let pattern = self.led.with(|led| led.next_pattern());
                self.say(out, "Changing pattern to: ", pattern.name());
            }
            IrKey::ChannelDown => {
                let pattern = self.led.with(|led| led.prev_pattern());
                self.say(out, "Changing pattern to: ", pattern.name());
            }
            IrKey::VolumeUp => self.speed_step(out, true),
            IrKey::VolumeDown => self.speed_step(out, false),
            _ => {} // Remaining keys are unbound
        }
    }

    fn toggle_power(&mut self, out: &mut dyn Write) {
        if self.led.with(|led| led.toggle()) {
            let _ = write!(out, "\r\nStarting.");
        } else {
            let _ = write!(out, "\r\nStopping.");
        }
    }

    fn toggle_print(&mut self, out: &mut dyn Write) {
        if self.led.with(|led| led.toggle_verbose()) {
            let _ = write!(out, "\r\nPrinting enabled.");
        } else {
            let _ = write!(out, "\r\nPrinting disabled.");
        }
    }

    fn speed_step(&mut self, out: &mut dyn Write, faster: bool) {
        let stepped = self
            .led
            .with(|led| if faster { led.speed_up() } else { led.slow_down() });
        match stepped {
            Some(speed) => self.say(out, "Changing speed to: ", speed.name()),
            None if faster => {
                let _ = write!(out, "\r\nAlready at fastest speed..");
            }
            None => {
                let _ = write!(out, "\r\nAlready at slowest speed..");
            }
        }
    }

    fn cmd_pattern(&mut self, out: &mut dyn Write, arg: Option<&str>) {
        match arg {
            Some("-") => {
                let pattern = self.led.with(|led| led.prev_pattern());
                self.say(out, "Changing pattern to: ", pattern.name());
            }
            None | Some("+") => {
                let pattern = self.led.with(|led| led.next_pattern());
                self.say(out, "Changing pattern to: ", pattern.name());
            }
            Some(name) => match Pattern::from_name(name) {
                Some(pattern) => self.change_pattern(out, pattern),
                None => {
                    let _ = write!(out, "\r\nUnknown pattern: {}", name);
                }
            },
        }
    }

    fn cmd_speed(&mut self, out: &mut dyn Write, arg: Option<&str>) {
        let level = arg.and_then(|a| a.parse::<u32>().ok());
        match level.and_then(|l| self.led.with(|led| led.set_speed(l))) {
            Some(speed) => self.say(out, "Changing speed to: ", speed.name()),
            None => {
                let _ = write!(out, "\r\nSpeed not in bounds (1 - 5)");
            }
        }
    }
}

impl<L: LedHandle> ApplicationHook for BlinkyApp<'_, L> {
    fn resolve(
        &mut self,
        tokens: &TokenSet,
        platform: &dyn Platform,
        out: &mut dyn Write,
    ) -> bool {
        match tokens.command() {
            "pattern" => self.cmd_pattern(out, tokens.arg()),
            "faster" => self.speed_step(out, true),
            "slower" => self.speed_step(out, false),
            "speed" => self.cmd_speed(out, tokens.arg()),
            "power" => self.toggle_power(out),
            "print" => self.toggle_print(out),
            "flash" => platform.enter_bootloader(),
            _ => return false,
        }
        true
    }

    fn print_help(&self, out: &mut dyn Write) {
        let _ = write!(out, "**************************\r\n");
        let _ = write!(out, "** Application commands **\r\n");
        let _ = write!(out, "**************************\r\n\r\n");
        let _ = write!(out, "pattern [+/-/name] - Steps or selects the LED pattern\r\n");
        let _ = write!(out, "faster             - Increases the speed\r\n");
        let _ = write!(out, "slower             - Decreases the speed\r\n");
        let _ = write!(out, "speed <1-5>        - Sets the speed\r\n");
        let _ = write!(out, "power              - Starts/stops the animation\r\n");
        let _ = write!(out, "print              - Toggles animation feedback\r\n");
        let _ = write!(out, "flash              - Jumps to the bootloader\r\n");
        let _ = write!(out, "-------------------------------------------\r\n");
    }
}
