//! LED pattern engine
//!
//! Pure animation logic for a 16-LED bar behind a shift register.
//! The engine is ticked once per millisecond and hands frames to the
//! platform's latch driver through [`FrameSink`]; it never touches
//! hardware itself.

/// Latch driver for one 16-bit frame (shift register + strobe).
pub trait FrameSink {
    fn write_frame(&mut self, frame: u16);
}

/// Animation selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    Binary,
    Wave,
    Alternating,
    Bounce,
}

impl Pattern {
    /// Display name used in command feedback
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Binary => "Binary",
            Pattern::Wave => "Wave",
            Pattern::Alternating => "Alternating",
            Pattern::Bounce => "Bounce",
        }
    }

    /// Parse a pattern name as typed on the console
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "binary" => Some(Pattern::Binary),
            "wave" => Some(Pattern::Wave),
            "alternating" => Some(Pattern::Alternating),
            "bounce" => Some(Pattern::Bounce),
            _ => None,
        }
    }

    fn next(self) -> Self {
        match self {
            Pattern::Binary => Pattern::Wave,
            Pattern::Wave => Pattern::Alternating,
            Pattern::Alternating => Pattern::Bounce,
            Pattern::Bounce => Pattern::Binary,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pattern::Binary => Pattern::Bounce,
            Pattern::Wave => Pattern::Binary,
            Pattern::Alternating => Pattern::Wave,
            Pattern::Bounce => Pattern::Alternating,
        }
    }
}

/// Animation step rate, expressed as milliseconds per frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    Slowest,
    Slow,
    Normal,
    Fast,
    Fastest,
}

impl Speed {
    /// Milliseconds between frames
    pub const fn period_ms(self) -> u16 {
        match self {
            Speed::Slowest => 1000,
            Speed::Slow => 500,
            Speed::Normal => 250,
            Speed::Fast => 125,
            Speed::Fastest => 62,
        }
    }

    /// Display name used in command feedback
    pub fn name(&self) -> &'static str {
        match self {
            Speed::Slowest => "Slowest",
            Speed::Slow => "Slow",
            Speed::Normal => "Normal",
            Speed::Fast => "Fast",
            Speed::Fastest => "Fastest",
        }
    }

    fn faster(self) -> Option<Self> {
        match self {
            Speed::Slowest => Some(Speed::Slow),
            Speed::Slow => Some(Speed::Normal),
            Speed::Normal => Some(Speed::Fast),
            Speed::Fast => Some(Speed::Fastest),
            Speed::Fastest => None,
        }
    }

    fn slower(self) -> Option<Self> {
        match self {
            Speed::Slowest => None,
            Speed::Slow => Some(Speed::Slowest),
            Speed::Normal => Some(Speed::Slow),
            Speed::Fast => Some(Speed::Normal),
            Speed::Fastest => Some(Speed::Fast),
        }
    }

    /// Level 1 (slowest) through 5 (fastest), as taken by `speed <n>`
    pub fn from_level(level: u32) -> Option<Self> {
        match level {
            1 => Some(Speed::Slowest),
            2 => Some(Speed::Slow),
            3 => Some(Speed::Normal),
            4 => Some(Speed::Fast),
            5 => Some(Speed::Fastest),
            _ => None,
        }
    }
}

/// Sliding 3-wide window, wrapping around both ends of the bar
const WAVE_PATTERN: [u16; 8] = [
    0x0707, 0x0E0E, 0x1C1C, 0x3838, 0x7070, 0xE0E0, 0xC1C1, 0x8383,
];

/// Two-LED block bouncing end to end
const BOUNCE_PATTERN: [u16; 28] = [
    0x3, 0x6, 0xC, 0x18, 0x30, 0x60, 0xC0, 0x180, 0x300, 0x600, 0xC00, 0x1800, 0x3000, 0x6000,
    0xC000, 0x6000, 0x3000, 0x1800, 0xC00, 0x600, 0x300, 0x180, 0xC0, 0x60, 0x30, 0x18, 0xC, 0x6,
];

/// Counter reset point for the bounce pattern, a multiple of its period
/// so the animation does not jump when the counter wraps.
const BOUNCE_RESET: u16 = 252;

/// LED bar animation state
///
/// Mutated from command handlers on the foreground loop and ticked from
/// the millisecond timer; the firmware wraps it in a critical section,
/// the engine itself is single-context.
pub struct LedPanel {
    active: bool,
    /// Milliseconds left until the next frame
    tick: u16,
    /// Frame counter, meaning depends on the pattern
    count: u16,
    pattern: Pattern,
    speed: Speed,
    /// Gates command feedback messages
    verbose: bool,
    /// One blank frame owed to the display (stop or pattern change)
    blank_pending: bool,
}

impl LedPanel {
    pub const fn new() -> Self {
        Self {
            active: true,
            tick: Speed::Slow.period_ms(),
            count: 0,
            pattern: Pattern::Binary,
            speed: Speed::Slow,
            verbose: true,
            blank_pending: false,
        }
    }

    /// Millisecond tick; returns a frame when the display must be latched.
    pub fn on_tick(&mut self) -> Option<u16> {
        if self.blank_pending {
            self.blank_pending = false;
            return Some(0);
        }

        if !self.active {
            return None;
        }

        if self.tick > 1 {
            self.tick -= 1;
            return None;
        }
        self.tick = self.speed.period_ms();

        let count = self.count;
        self.count = self.count.wrapping_add(1);

        let frame = match self.pattern {
            Pattern::Binary => count,
            Pattern::Wave => WAVE_PATTERN[(count % 8) as usize],
            Pattern::Alternating => {
                if count % 2 == 1 {
                    0xF0F0
                } else {
                    0x0F0F
                }
            }
            Pattern::Bounce => {
                let frame = BOUNCE_PATTERN[(count % 28) as usize];
                if self.count >= BOUNCE_RESET {
                    self.count = 0;
                }
                frame
            }
        };
        Some(frame)
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Select a pattern; `false` when it was already active.
    pub fn set_pattern(&mut self, pattern: Pattern) -> bool {
        if self.pattern == pattern {
            return false;
        }
        self.pattern = pattern;
        self.restart_animation();
        true
    }

    /// Step forward through the pattern cycle.
    pub fn next_pattern(&mut self) -> Pattern {
        self.pattern = self.pattern.next();
        self.restart_animation();
        self.pattern
    }

    /// Step backward through the pattern cycle.
    pub fn prev_pattern(&mut self) -> Pattern {
        self.pattern = self.pattern.prev();
        self.restart_animation();
        self.pattern
    }

    /// One step faster; `None` when already at the fastest speed.
    pub fn speed_up(&mut self) -> Option<Speed> {
        let speed = self.speed.faster()?;
        self.apply_speed(speed);
        Some(speed)
    }

    /// One step slower; `None` when already at the slowest speed.
    pub fn slow_down(&mut self) -> Option<Speed> {
        let speed = self.speed.slower()?;
        self.apply_speed(speed);
        Some(speed)
    }

    /// Absolute speed level 1..=5; `None` when out of bounds.
    pub fn set_speed(&mut self, level: u32) -> Option<Speed> {
        let speed = Speed::from_level(level)?;
        self.apply_speed(speed);
        Some(speed)
    }

    /// Toggle the animation; returns the new active state.
    /// Stopping blanks the display on the next tick.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        if !self.active {
            self.blank_pending = true;
        }
        self.active
    }

    /// Toggle command feedback; returns the new verbose state.
    pub fn toggle_verbose(&mut self) -> bool {
        self.verbose = !self.verbose;
        self.verbose
    }

    fn restart_animation(&mut self) {
        self.count = 0;
        self.tick = 1;
        self.blank_pending = true;
    }

    fn apply_speed(&mut self, speed: Speed) {
        self.speed = speed;
        // Do not stretch a countdown already in flight
        if self.tick > speed.period_ms() {
            self.tick = speed.period_ms();
        }
    }
}

impl Default for LedPanel {
    fn default() -> Self {
        Self::new()
    }
}
