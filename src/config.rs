// Watchface settings. Board wiring lives in wiring.rs and is picked by Cargo
// features; everything here is plain data the core reads at startup.

use embedded_graphics::pixelcolor::Rgb565;

use crate::sprite::Hemisphere;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

// Button debounce window (milliseconds). Not part of WatchConfig: the button
// statics are built in const context, so this constant is the only knob.
pub const DEBOUNCE_MS: u64 = 240;

// 2025-01-17 00:00:00 UTC, used when nothing better than uptime is known.
pub const DEFAULT_EPOCH_SECS: i64 = 1_737_072_000;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WatchConfig {
    pub default_hemisphere: Hemisphere,
    // Local time offset from UTC, applied before resolving the calendar day.
    pub utc_offset_secs: i32,
    // Ring drawn behind the moon; None leaves the background showing.
    pub border_color: Option<Rgb565>,
    pub boot_epoch_secs: i64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            default_hemisphere: Hemisphere::Northern,
            utc_offset_secs: 0,
            border_color: None,
            boot_epoch_secs: DEFAULT_EPOCH_SECS,
        }
    }
}

impl WatchConfig {
    // Monochrome panels need the ring to see the dark limb at all.
    pub fn monochrome() -> Self {
        Self { border_color: Some(Rgb565::new(31, 63, 31)), ..Self::default() }
    }
}
