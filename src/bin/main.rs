//! Moon Phase Watch
//! ========================================
//! needs to be run in WSL2 terminal
//! source ~/export-esp.sh
//! cargo run --release --features devkit-esp32s3-disp128
//! ========================================
//!
//! Up/Down scrub the shown date one day at a time, Select flips the
//! hemisphere the moon is drawn for.

//% CHIPS: esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
esp_bootloader_esp_idf::esp_app_desc!();

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_graphics::prelude::Size;
use esp_backtrace as _;
use esp_hal::{
    handler, main, ram,
    timer::systimer::{SystemTimer, Unit},
    Config,
};
use esp_println::println;
use log::{error, info, warn};

use moonphase_watch::{
    calendar::ClockDate,
    config::{WatchConfig, DEBOUNCE_MS},
    display::{setup_display, RESOLUTION},
    error::RenderError,
    face::WatchFace,
    input::{handle_button_generic, ButtonState, BUTTON_ORDER},
    sprite::MoonSheet,
    wiring::{init_board_pins, BoardPins},
};

#[ram]
static mut DISPLAY_BUF: [u8; 1024] = [0; 1024];

static PRESSED: [AtomicBool; 3] = [AtomicBool::new(false), AtomicBool::new(false), AtomicBool::new(false)];

// Shared resources for the buttons, same order as BUTTON_ORDER
static BUTTONS: [ButtonState<'static>; 3] = [
    ButtonState::new("Up", DEBOUNCE_MS),
    ButtonState::new("Select", DEBOUNCE_MS),
    ButtonState::new("Down", DEBOUNCE_MS),
];

fn now_ms() -> u64 {
    let t = SystemTimer::unit_value(Unit::Unit0);
    t.saturating_mul(1000) / SystemTimer::ticks_per_second()
}

// Interrupt handler: only set flags, the main loop does the work
#[handler]
#[ram]
fn handler() {
    let now = now_ms();
    for (btn, flag) in BUTTONS.iter().zip(PRESSED.iter()) {
        handle_button_generic(btn, now, || flag.store(true, Ordering::Relaxed));
    }
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());
    esp_println::logger::init_logger_from_env();

    let config = WatchConfig::default();

    let (mut io, pins) = init_board_pins(peripherals);
    let BoardPins { btn_up, btn_select, btn_down, display_pins } = pins;

    // Stash pins in global state
    critical_section::with(|cs| {
        for (btn, input) in BUTTONS.iter().zip([btn_up, btn_select, btn_down]) {
            btn.input.borrow_ref_mut(cs).replace(input);
        }
    });
    io.set_interrupt_handler(handler);

    // Safe because DISPLAY_BUF is only used here
    #[allow(static_mut_refs)]
    let mut panel = unsafe { setup_display(display_pins, &mut DISPLAY_BUF) };

    let sheet = MoonSheet::new();
    let mut face = WatchFace::new(&config, Size::new(RESOLUTION, RESOLUTION));

    // No RTC on this board: today is the configured epoch plus uptime.
    let clock = || ClockDate::new(config.boot_epoch_secs + (now_ms() / 1000) as i64, config.utc_offset_secs);

    if let Err(e) = face.refresh(&clock()) {
        error!("initial date refresh failed: {}", e);
    }
    println!("Moon watch up, showing {} (age {})", face.label(), face.age().get());

    let mut lit = false;

    // Main loop: turn button flags into face events, redraw when something changed
    loop {
        for (i, flag) in PRESSED.iter().enumerate() {
            if flag.swap(false, Ordering::Acquire) {
                info!("{} pressed", BUTTONS[i].name);
                if let Err(e) = face.handle(BUTTON_ORDER[i], &clock()) {
                    warn!("{} ignored: {}", BUTTONS[i].name, e);
                }
            }
        }

        if face.take_dirty() {
            match face.draw(&mut panel.display, &sheet) {
                Ok(()) => {}
                // Skip the moon for this frame; the rest of the face is already up.
                Err(RenderError::Moon(e)) => error!("moon not drawn: {}", e),
                Err(RenderError::Draw(e)) => error!("display error: {:?}", e),
            }
            if !lit {
                panel.backlight(true);
                lit = true;
            }
        }

        for _ in 0..10000 {
            core::hint::spin_loop();
        }
    }
}
