//! BlinkyRepl - Firmware entry point
//!
//! Wires the console core to the device: UART transport, millisecond
//! LED tick, IR edge capture. Only the ingest ring is shared with the
//! receive path; LED and IR state sit behind critical sections because
//! the timer callbacks preempt the foreground loop.

#![cfg_attr(target_arch = "xtensa", no_std)]
#![cfg_attr(target_arch = "xtensa", no_main)]

#[cfg(target_arch = "xtensa")]
use core::cell::RefCell;
#[cfg(target_arch = "xtensa")]
use core::fmt::Write;

#[cfg(target_arch = "xtensa")]
use critical_section::Mutex;
#[cfg(target_arch = "xtensa")]
use esp_idf_svc::sys as esp_idf_sys;

#[cfg(target_arch = "xtensa")]
use blinky_repl::{
    app::{BlinkyApp, LedHandle},
    console::{ApplicationHook, Console, RingBuffer},
    irdecoder::IrDecoder,
    led::{FrameSink, LedPanel},
    platform::Platform,
};

// --- Pin assignment ---

/// Shift register data, clock and latch lines.
#[cfg(target_arch = "xtensa")]
const SR_DATA: i32 = 4;
#[cfg(target_arch = "xtensa")]
const SR_CLOCK: i32 = 5;
#[cfg(target_arch = "xtensa")]
const SR_LATCH: i32 = 7;

/// IR receiver input.
#[cfg(target_arch = "xtensa")]
const IR_PIN: i32 = 9;

/// Gap that ends an IR frame, in microseconds.
#[cfg(target_arch = "xtensa")]
const IR_FRAME_GAP_US: u64 = 7000;

// --- Static state ---

// Ingest ring: UART receive path produces, foreground loop consumes.
#[cfg(target_arch = "xtensa")]
static INGEST: RingBuffer = RingBuffer::new();

#[cfg(target_arch = "xtensa")]
static LED: Mutex<RefCell<LedPanel>> = Mutex::new(RefCell::new(LedPanel::new()));

#[cfg(target_arch = "xtensa")]
static IR: Mutex<RefCell<IrDecoder>> = Mutex::new(RefCell::new(IrDecoder::new()));

/// Timestamp of the last IR rising edge, microseconds.
#[cfg(target_arch = "xtensa")]
static IR_RISE_US: Mutex<RefCell<i64>> = Mutex::new(RefCell::new(0));

#[cfg(target_arch = "xtensa")]
static mut IR_GAP_TIMER: esp_idf_sys::esp_timer_handle_t = core::ptr::null_mut();

// --- Shared LED access ---

#[cfg(target_arch = "xtensa")]
struct SharedLed;

#[cfg(target_arch = "xtensa")]
impl LedHandle for SharedLed {
    fn with<R>(&self, f: impl FnOnce(&mut LedPanel) -> R) -> R {
        critical_section::with(|cs| f(&mut LED.borrow_ref_mut(cs)))
    }
}

// --- Platform services ---

#[cfg(target_arch = "xtensa")]
struct EspPlatform;

#[cfg(target_arch = "xtensa")]
impl Platform for EspPlatform {
    fn restart(&self) {
        unsafe { esp_idf_sys::esp_restart() };
    }

    fn enter_bootloader(&self) {
        // Force download boot via the RTC option register, then reset.
        // See the ESP32-S3 boot mode selection docs.
        const RTC_CNTL_OPTION1_REG: u32 = 0x6000_8128;
        const RTC_CNTL_FORCE_DOWNLOAD_BOOT: u32 = 1;

        unsafe {
            core::ptr::write_volatile(
                RTC_CNTL_OPTION1_REG as *mut u32,
                RTC_CNTL_FORCE_DOWNLOAD_BOOT,
            );
            esp_idf_sys::esp_restart();
        }
    }

    fn read_word(&self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }
}

// --- Console transport ---

#[cfg(target_arch = "xtensa")]
struct UartOut;

#[cfg(target_arch = "xtensa")]
impl Write for UartOut {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        unsafe {
            esp_idf_sys::uart_write_bytes(
                0,
                s.as_ptr() as *const core::ffi::c_void,
                s.len(),
            );
        }
        Ok(())
    }
}

#[cfg(target_arch = "xtensa")]
unsafe fn uart_init() {
    let config = esp_idf_sys::uart_config_t {
        baud_rate: 115200,
        data_bits: esp_idf_sys::uart_word_length_t_UART_DATA_8_BITS,
        parity: esp_idf_sys::uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: esp_idf_sys::uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: esp_idf_sys::uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    esp_idf_sys::uart_param_config(0, &config);
    esp_idf_sys::uart_driver_install(0, 256, 0, 0, core::ptr::null_mut(), 0);
}

/// Forward bytes captured by the UART RX interrupt into the ingest ring.
///
/// The IDF driver's ISR has already buffered them; this only moves them
/// across without parsing, the same contract the bare-metal RX interrupt
/// has on the ingest side.
#[cfg(target_arch = "xtensa")]
fn pump_uart() {
    let mut byte = 0u8;
    loop {
        let n = unsafe {
            esp_idf_sys::uart_read_bytes(0, &mut byte as *mut u8 as *mut core::ffi::c_void, 1, 0)
        };
        if n != 1 {
            return;
        }
        // Full ring is the backpressure signal; the byte is dropped
        let _ = INGEST.write(byte);
    }
}

// --- LED latch path ---

#[cfg(target_arch = "xtensa")]
unsafe fn led_io_init() {
    for pin in [SR_DATA, SR_CLOCK, SR_LATCH] {
        esp_idf_sys::gpio_set_direction(pin, esp_idf_sys::gpio_mode_t_GPIO_MODE_OUTPUT);
        esp_idf_sys::gpio_set_level(pin, 0);
    }
}

/// Bit-bangs frames into the shift register, MSB first, then strobes.
#[cfg(target_arch = "xtensa")]
struct ShiftRegister;

#[cfg(target_arch = "xtensa")]
impl FrameSink for ShiftRegister {
    fn write_frame(&mut self, frame: u16) {
        unsafe {
            for bit in (0..16).rev() {
                esp_idf_sys::gpio_set_level(SR_DATA, ((frame >> bit) & 1) as u32);
                esp_idf_sys::gpio_set_level(SR_CLOCK, 1);
                esp_idf_sys::gpio_set_level(SR_CLOCK, 0);
            }
            esp_idf_sys::gpio_set_level(SR_LATCH, 1);
            esp_idf_sys::gpio_set_level(SR_LATCH, 0);
        }
    }
}

/// Fires every millisecond from the esp_timer task.
#[cfg(target_arch = "xtensa")]
unsafe extern "C" fn led_tick_cb(_arg: *mut core::ffi::c_void) {
    let frame = critical_section::with(|cs| LED.borrow_ref_mut(cs).on_tick());
    if let Some(frame) = frame {
        ShiftRegister.write_frame(frame);
    }
}

#[cfg(target_arch = "xtensa")]
unsafe fn start_led_timer() {
    let args = esp_idf_sys::esp_timer_create_args_t {
        callback: Some(led_tick_cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_idf_sys::esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: b"led_tick\0".as_ptr() as *const i8,
        skip_unhandled_events: true,
    };
    let mut handle: esp_idf_sys::esp_timer_handle_t = core::ptr::null_mut();
    esp_idf_sys::esp_timer_create(&args, &mut handle);
    esp_idf_sys::esp_timer_start_periodic(handle, 1000);
}

// --- IR capture path ---

/// Both-edge GPIO interrupt: rising edge starts the width measurement,
/// falling edge records it and re-arms the frame-gap timeout.
#[cfg(target_arch = "xtensa")]
unsafe extern "C" fn ir_edge_isr(_arg: *mut core::ffi::c_void) {
    let now = esp_idf_sys::esp_timer_get_time();
    let level = esp_idf_sys::gpio_get_level(IR_PIN);

    critical_section::with(|cs| {
        if level == 1 {
            *IR_RISE_US.borrow_ref_mut(cs) = now;
        } else {
            let rise = *IR_RISE_US.borrow_ref_mut(cs);
            // Capture hardware counts 2 us ticks
            let ticks = ((now - rise) / 2).clamp(0, u32::MAX as i64) as u32;
            IR.borrow_ref_mut(cs).record_pulse(ticks);
        }
    });

    esp_idf_sys::esp_timer_stop(IR_GAP_TIMER);
    esp_idf_sys::esp_timer_start_once(IR_GAP_TIMER, IR_FRAME_GAP_US);
}

#[cfg(target_arch = "xtensa")]
unsafe extern "C" fn ir_gap_cb(_arg: *mut core::ffi::c_void) {
    critical_section::with(|cs| IR.borrow_ref_mut(cs).end_frame());
}

#[cfg(target_arch = "xtensa")]
unsafe fn ir_init() {
    esp_idf_sys::gpio_set_direction(IR_PIN, esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT);
    esp_idf_sys::gpio_set_pull_mode(IR_PIN, esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY);
    esp_idf_sys::gpio_set_intr_type(IR_PIN, esp_idf_sys::gpio_int_type_t_GPIO_INTR_ANYEDGE);

    let args = esp_idf_sys::esp_timer_create_args_t {
        callback: Some(ir_gap_cb),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_idf_sys::esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: b"ir_gap\0".as_ptr() as *const i8,
        skip_unhandled_events: true,
    };
    esp_idf_sys::esp_timer_create(&args, core::ptr::addr_of_mut!(IR_GAP_TIMER));

    esp_idf_sys::gpio_install_isr_service(0);
    esp_idf_sys::gpio_isr_handler_add(IR_PIN, Some(ir_edge_isr), core::ptr::null_mut());
}

// --- Entry point ---

#[cfg(target_arch = "xtensa")]
#[no_mangle]
fn main() {
    esp_idf_sys::link_patches();

    unsafe {
        uart_init();
        led_io_init();
        start_led_timer();
        ir_init();
    }

    let led = SharedLed;
    let mut console_app = BlinkyApp::new(&led);
    // Second view over the same panel for IR keys; all state is shared
    let mut ir_app = BlinkyApp::new(&led);

    let platform = EspPlatform;
    let mut out = UartOut;
    let mut console = Console::new(&INGEST, Some(&mut console_app as &mut dyn ApplicationHook));

    console.print_banner(&mut out);

    loop {
        pump_uart();
        console.poll(&platform, &mut out);

        if let Some(key) = critical_section::with(|cs| IR.borrow_ref_mut(cs).take()) {
            ir_app.handle_ir(key, &mut out);
        }

        unsafe { esp_idf_sys::vTaskDelay(1) };
    }
}

#[cfg(not(target_arch = "xtensa"))]
fn main() {
    // The firmware entry only builds for the device; host builds carry
    // the library and its tests.
}
