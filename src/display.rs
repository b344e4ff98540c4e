//! GC9A01 240x240 round panel over SPI2, driven through mipidsi.
//!
//! The backlight stays off through init and is switched on by the caller once
//! the first frame is on the glass.

use esp_backtrace as _;

use esp_hal::{
    gpio::Output,
    peripherals::{GPIO10, GPIO11, SPI2},
    spi::master::{Config as SpiConfig, Spi},
    spi::Mode,
    time::Rate,
    Blocking,
};

use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use mipidsi::interface::SpiInterface;
use mipidsi::{
    models::GC9A01,
    options::{ColorInversion, ColorOrder, Orientation, Rotation},
    Builder as DisplayBuilder,
};

use crate::wiring::DisplayPins;

pub const RESOLUTION: u32 = 240;

const SPI_HZ: u32 = 40_000_000;

type PanelSpi<'a> = ExclusiveDevice<Spi<'a, Blocking>, Output<'a>, NoDelay>;

pub type DisplayType<'a> = mipidsi::Display<SpiInterface<'a, PanelSpi<'a>, Output<'a>>, GC9A01, Output<'a>>;

// Busy-wait DelayNs for the init sequence; there is no timer to spare this early.
pub struct SpinDelay;

impl embedded_hal::delay::DelayNs for SpinDelay {
    #[inline]
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..ns / 50 + 1 {
            core::hint::spin_loop();
        }
    }
}

pub struct Panel<'a> {
    pub display: DisplayType<'a>,
    backlight: Output<'a>,
}

impl Panel<'_> {
    pub fn backlight(&mut self, on: bool) {
        if on {
            self.backlight.set_high();
        } else {
            self.backlight.set_low();
        }
    }
}

fn panel_spi<'a>(spi2: SPI2<'a>, sck: GPIO10<'a>, mosi: GPIO11<'a>, cs: Output<'a>) -> PanelSpi<'a> {
    let cfg = SpiConfig::default().with_frequency(Rate::from_hz(SPI_HZ)).with_mode(Mode::_0);
    let bus = Spi::new(spi2, cfg).expect("SPI2 rejected the panel config").with_sck(sck).with_mosi(mosi);
    ExclusiveDevice::new(bus, cs, NoDelay).expect("panel CS pin unusable")
}

/// Bring the panel up. mipidsi pulses the reset line as part of `init`.
pub fn setup_display<'a>(pins: DisplayPins<'a>, buf: &'a mut [u8]) -> Panel<'a> {
    let DisplayPins { spi2, spi_sck, spi_mosi, lcd_cs, lcd_dc, lcd_rst, mut lcd_bl } = pins;
    lcd_bl.set_low();

    let di = SpiInterface::new(panel_spi(spi2, spi_sck, spi_mosi, lcd_cs), lcd_dc, buf);
    let side = RESOLUTION as u16;
    let display = DisplayBuilder::new(GC9A01, di)
        .display_size(side, side)
        .orientation(Orientation::new().rotate(Rotation::Deg180))
        .invert_colors(ColorInversion::Inverted)
        .color_order(ColorOrder::Bgr)
        .reset_pin(lcd_rst)
        .init(&mut SpinDelay)
        .expect("GC9A01 did not initialise");

    Panel { display, backlight: lcd_bl }
}
