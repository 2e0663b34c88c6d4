//! Application tier tests: console commands and IR keys against the LED panel

use std::cell::{Cell, RefCell};

use blinky_repl::app::BlinkyApp;
use blinky_repl::console::{tokenize, ApplicationHook, RingBuffer, TokenSet};
use blinky_repl::irdecoder::IrKey;
use blinky_repl::led::{LedPanel, Pattern, Speed};
use blinky_repl::platform::Platform;

#[derive(Default)]
struct TestPlatform {
    bootloader: Cell<bool>,
}

impl Platform for TestPlatform {
    fn restart(&self) {}

    fn enter_bootloader(&self) {
        self.bootloader.set(true);
    }

    fn read_word(&self, _addr: u32) -> u32 {
        0
    }
}

fn tokens_for(line: &str) -> TokenSet {
    let buf: RingBuffer = RingBuffer::new();
    for byte in line.bytes() {
        assert!(buf.write(byte));
    }
    tokenize(&buf).unwrap()
}

/// Run one command line through the hook; returns (resolved, output).
fn resolve(led: &RefCell<LedPanel>, platform: &TestPlatform, line: &str) -> (bool, String) {
    let mut app = BlinkyApp::new(led);
    let mut out = String::new();
    let resolved = app.resolve(&tokens_for(line), platform, &mut out);
    (resolved, out)
}

#[test]
fn test_pattern_by_name() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (resolved, out) = resolve(&led, &platform, "pattern wave");
    assert!(resolved);
    assert_eq!(led.borrow().pattern(), Pattern::Wave);
    assert!(out.contains("Changing pattern to: Wave"));
}

#[test]
fn test_pattern_steps_forward_by_default() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    resolve(&led, &platform, "pattern");
    assert_eq!(led.borrow().pattern(), Pattern::Wave);
    resolve(&led, &platform, "pattern +");
    assert_eq!(led.borrow().pattern(), Pattern::Alternating);
}

#[test]
fn test_pattern_steps_backward() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "pattern -");
    assert_eq!(led.borrow().pattern(), Pattern::Bounce);
    assert!(out.contains("Changing pattern to: Bounce"));
}

#[test]
fn test_pattern_unknown_name() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (resolved, out) = resolve(&led, &platform, "pattern blip");
    assert!(resolved);
    assert!(out.contains("Unknown pattern: blip"));
    assert_eq!(led.borrow().pattern(), Pattern::Binary);
}

#[test]
fn test_reselecting_active_pattern_is_silent() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "pattern binary");
    assert_eq!(out, "");
}

#[test]
fn test_speed_level_command() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "speed 5");
    assert_eq!(led.borrow().speed(), Speed::Fastest);
    assert!(out.contains("Changing speed to: Fastest"));
}

#[test]
fn test_speed_out_of_bounds() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    for line in ["speed 0", "speed 9", "speed x", "speed"] {
        let (resolved, out) = resolve(&led, &platform, line);
        assert!(resolved);
        assert!(out.contains("Speed not in bounds (1 - 5)"), "{line}");
    }
    assert_eq!(led.borrow().speed(), Speed::Slow);
}

#[test]
fn test_faster_and_slower() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "faster");
    assert!(out.contains("Changing speed to: Normal"));
    let (_, out) = resolve(&led, &platform, "slower");
    assert!(out.contains("Changing speed to: Slow"));
}

#[test]
fn test_faster_at_limit() {
    let led = RefCell::new(LedPanel::new());
    led.borrow_mut().set_speed(5);
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "faster");
    assert!(out.contains("Already at fastest speed.."));
}

#[test]
fn test_slower_at_limit() {
    let led = RefCell::new(LedPanel::new());
    led.borrow_mut().set_speed(1);
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "slower");
    assert!(out.contains("Already at slowest speed.."));
}

#[test]
fn test_power_toggle_messages() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "power");
    assert!(out.contains("Stopping."));
    assert!(!led.borrow().is_active());

    let (_, out) = resolve(&led, &platform, "power");
    assert!(out.contains("Starting."));
}

#[test]
fn test_print_toggle_silences_feedback() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "print");
    assert!(out.contains("Printing disabled."));

    // Feedback is gated but the command still takes effect
    let (_, out) = resolve(&led, &platform, "pattern wave");
    assert_eq!(out, "");
    assert_eq!(led.borrow().pattern(), Pattern::Wave);
}

#[test]
fn test_bound_messages_ignore_print_toggle() {
    let led = RefCell::new(LedPanel::new());
    led.borrow_mut().set_speed(5);
    led.borrow_mut().toggle_verbose();
    let platform = TestPlatform::default();

    let (_, out) = resolve(&led, &platform, "faster");
    assert!(out.contains("Already at fastest speed.."));
}

#[test]
fn test_flash_enters_bootloader() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    let (resolved, _) = resolve(&led, &platform, "flash");
    assert!(resolved);
    assert!(platform.bootloader.get());
}

#[test]
fn test_library_commands_fall_through() {
    let led = RefCell::new(LedPanel::new());
    let platform = TestPlatform::default();

    for line in ["rs", "help", "memdump 0x50000000", "nonsense"] {
        let (resolved, _) = resolve(&led, &platform, line);
        assert!(!resolved, "{line}");
    }
}

#[test]
fn test_ir_pattern_keys() {
    let led = RefCell::new(LedPanel::new());
    let mut app = BlinkyApp::new(&led);
    let mut out = String::new();

    app.handle_ir(IrKey::Kp2, &mut out);
    assert_eq!(led.borrow().pattern(), Pattern::Wave);
    app.handle_ir(IrKey::Kp4, &mut out);
    assert_eq!(led.borrow().pattern(), Pattern::Bounce);
    app.handle_ir(IrKey::ChannelUp, &mut out);
    assert_eq!(led.borrow().pattern(), Pattern::Binary);
    app.handle_ir(IrKey::ChannelDown, &mut out);
    assert_eq!(led.borrow().pattern(), Pattern::Bounce);
}

#[test]
fn test_ir_volume_keys_step_speed() {
    let led = RefCell::new(LedPanel::new());
    let mut app = BlinkyApp::new(&led);
    let mut out = String::new();

    app.handle_ir(IrKey::VolumeUp, &mut out);
    assert_eq!(led.borrow().speed(), Speed::Normal);
    app.handle_ir(IrKey::VolumeDown, &mut out);
    assert_eq!(led.borrow().speed(), Speed::Slow);
}

#[test]
fn test_ir_power_and_print_keys() {
    let led = RefCell::new(LedPanel::new());
    let mut app = BlinkyApp::new(&led);
    let mut out = String::new();

    app.handle_ir(IrKey::Power, &mut out);
    assert!(!led.borrow().is_active());
    assert!(out.contains("Stopping."));

    out.clear();
    app.handle_ir(IrKey::Kp0, &mut out);
    assert!(!led.borrow().is_verbose());
    assert!(out.contains("Printing disabled."));
}

#[test]
fn test_unbound_ir_keys_do_nothing() {
    let led = RefCell::new(LedPanel::new());
    let mut app = BlinkyApp::new(&led);
    let mut out = String::new();

    for key in [IrKey::Kp9, IrKey::Left, IrKey::Right, IrKey::Up, IrKey::Down, IrKey::Ok] {
        app.handle_ir(key, &mut out);
    }
    assert_eq!(out, "");
    assert_eq!(led.borrow().pattern(), Pattern::Binary);
}
