//! Input handling module for the three watch buttons.
//!
//! This module provides:
//! - `Debouncer`, the falling-edge + minimum-interval filter (pure, host-testable)
//! - `ButtonState` and `handle_button_generic` for the GPIO interrupt (firmware only)
//!
//! Buttons are wired active-low with pull-ups, so a press is a high -> low edge.

use crate::face::Button;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Debouncer {
    last_high: bool,
    last_press_ms: Option<u64>,
    debounce_ms: u64,
}

impl Debouncer {
    pub const fn new(debounce_ms: u64) -> Self {
        Self { last_high: true, last_press_ms: None, debounce_ms }
    }

    // Feed the pin level seen on an edge interrupt. Returns true for an accepted press.
    pub fn update(&mut self, level_is_low: bool, now_ms: u64) -> bool {
        let falling = self.last_high && level_is_low;
        self.last_high = !level_is_low;
        if !falling {
            return false;
        }

        let settled = match self.last_press_ms {
            Some(t) => now_ms.saturating_sub(t) > self.debounce_ms,
            None => true,
        };
        if settled {
            self.last_press_ms = Some(now_ms);
        }
        settled
    }
}

// Board order: top button scrubs forward, middle toggles, bottom scrubs back.
pub const BUTTON_ORDER: [Button; 3] = [Button::Up, Button::Select, Button::Down];

#[cfg(feature = "esp32s3")]
mod gpio {
    use core::cell::{Cell, RefCell};

    use critical_section::Mutex;
    use esp_hal::gpio::Input;

    use super::Debouncer;

    // Button state shared between the interrupt handler and main
    pub struct ButtonState<'a> {
        pub input: Mutex<RefCell<Option<Input<'a>>>>,
        pub debouncer: Mutex<Cell<Debouncer>>,
        pub name: &'static str,
    }

    impl<'a> ButtonState<'a> {
        pub const fn new(name: &'static str, debounce_ms: u64) -> Self {
            Self {
                input: Mutex::new(RefCell::new(None)),
                debouncer: Mutex::new(Cell::new(Debouncer::new(debounce_ms))),
                name,
            }
        }
    }

    // Handle button press events
    pub fn handle_button_generic(btn: &ButtonState, now_ms: u64, on_press: impl Fn()) {
        critical_section::with(|cs| {
            let mut binding = btn.input.borrow_ref_mut(cs);
            let Some(input) = binding.as_mut() else {
                return;
            };

            // Check if interrupt is actually pending
            if !input.is_interrupt_set() {
                return;
            }
            input.clear_interrupt();

            let cell = btn.debouncer.borrow(cs);
            let mut debouncer = cell.get();
            let pressed = debouncer.update(input.is_low(), now_ms);
            cell.set(debouncer);

            if pressed {
                on_press();
            }
        });
    }
}

#[cfg(feature = "esp32s3")]
pub use gpio::{handle_button_generic, ButtonState};
