// This module handles board-specific pin mappings and initialization.
// The profile is selected via Cargo features (`esp32s3` today).
//! The following wiring is assumed:
//! - BUTTON UP     => GPIO15
//! - BUTTON SELECT => GPIO16
//! - BUTTON DOWN   => GPIO21
//! - LCD SCK/MOSI  => GPIO10 / GPIO11
//! - LCD CS/DC/RST/BL => GPIO9 / GPIO8 / GPIO14 / GPIO2
//! - GND => GND
//! - 3.3V => 3.3V
//! Buttons short to GND when pressed (internal pull-up enabled).

use esp_backtrace as _;
use esp_hal::gpio::{Event, Input, InputConfig, Io, Level, Output, OutputConfig, Pull};
use esp_hal::peripherals::{Peripherals, GPIO10, GPIO11, SPI2};

pub struct DisplayPins<'a> {
    pub spi2: SPI2<'a>,
    pub spi_sck: GPIO10<'a>,
    pub spi_mosi: GPIO11<'a>,
    pub lcd_cs: Output<'a>,
    pub lcd_dc: Output<'a>,
    pub lcd_rst: Output<'a>,
    pub lcd_bl: Output<'a>,
}

pub struct BoardPins<'a> {
    pub btn_up: Input<'a>,
    pub btn_select: Input<'a>,
    pub btn_down: Input<'a>,
    pub display_pins: DisplayPins<'a>,
}

fn button<'a>(pin: impl esp_hal::gpio::InputPin + 'a) -> Input<'a> {
    let mut btn = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    btn.listen(Event::AnyEdge);
    btn
}

pub fn init_board_pins<'a>(p: Peripherals) -> (Io<'a>, BoardPins<'a>) {
    let io = Io::new(p.IO_MUX);

    let btn_up = button(p.GPIO15);
    let btn_select = button(p.GPIO16);
    let btn_down = button(p.GPIO21);

    // LCD control pins; GPIO10/11 go to the SPI peripheral untouched
    let display_pins = DisplayPins {
        spi2: p.SPI2,
        spi_sck: p.GPIO10,
        spi_mosi: p.GPIO11,
        lcd_cs: Output::new(p.GPIO9, Level::High, OutputConfig::default()),
        lcd_dc: Output::new(p.GPIO8, Level::Low, OutputConfig::default()),
        lcd_rst: Output::new(p.GPIO14, Level::High, OutputConfig::default()),
        lcd_bl: Output::new(p.GPIO2, Level::Low, OutputConfig::default()),
    };

    (io, BoardPins { btn_up, btn_select, btn_down, display_pins })
}
