//! Watchface state and rendering.
//!
//! This module provides:
//! - `Button`, the three inputs the face reacts to
//! - `WatchFace`, which owns the day offset, the hemisphere and the moon layer
//! - `WatchFace::draw` to render instructions, moon and date label
//!
//! Up/Down move the shown date one day from today; Select flips the hemisphere.
//! Layout scales with the target, the reference being a 144x168 screen.

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::{Point, RgbColor, Size},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};
use log::info;

use crate::calendar::{format_date_label, CalendarError, DateLabel, DateSource};
use crate::config::WatchConfig;
use crate::error::RenderError;
use crate::layer::MoonLayer;
use crate::moon::{CalendarDate, MoonAge};
use crate::sprite::{Hemisphere, MoonSheet};

pub const INSTRUCTIONS: &str = "Up/Down: Change day\nSelect: Change hemisphere";

// Reference layout (144x168): instructions at y=5, date label at y=120.
const REF_HEIGHT: u32 = 168;
const INSTRUCTIONS_Y: u32 = 5;
const LABEL_Y: u32 = 120;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Select,
}

#[derive(Clone, Debug)]
pub struct WatchFace {
    day_offset: i32,
    hemisphere: Hemisphere,
    date: Option<CalendarDate>,
    label: DateLabel,
    layer: MoonLayer,
    screen: Size,
    needs_redraw: bool,
}

impl WatchFace {
    pub fn new(config: &WatchConfig, screen: Size) -> Self {
        let center = Point::new((screen.width / 2) as i32, (screen.height / 2) as i32);
        let mut layer = MoonLayer::new(center);
        layer.set_hemisphere(config.default_hemisphere);
        layer.set_border_color(config.border_color);
        Self {
            day_offset: 0,
            hemisphere: config.default_hemisphere,
            date: None,
            label: DateLabel::new(),
            layer,
            screen,
            needs_redraw: true,
        }
    }

    pub fn day_offset(&self) -> i32 {
        self.day_offset
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    pub fn date(&self) -> Option<CalendarDate> {
        self.date
    }

    pub fn age(&self) -> MoonAge {
        self.layer.age()
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn layer(&self) -> &MoonLayer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut MoonLayer {
        &mut self.layer
    }

    // Resolve the date for the current offset and push it into the layer and label.
    pub fn refresh(&mut self, source: &impl DateSource) -> Result<(), CalendarError> {
        let date = source.current_date(self.day_offset)?;
        self.layer.set_date(&date);
        self.label = format_date_label(&date);
        self.date = Some(date);
        self.needs_redraw = true;
        Ok(())
    }

    pub fn handle(&mut self, button: Button, source: &impl DateSource) -> Result<(), CalendarError> {
        match button {
            Button::Up => self.shift_days(1, source),
            Button::Down => self.shift_days(-1, source),
            Button::Select => {
                self.hemisphere = self.hemisphere.toggled();
                self.layer.set_hemisphere(self.hemisphere);
                self.needs_redraw = true;
                info!("hemisphere -> {:?}", self.hemisphere);
                Ok(())
            }
        }
    }

    // On failure the previous offset and date stay in place.
    fn shift_days(&mut self, delta: i32, source: &impl DateSource) -> Result<(), CalendarError> {
        let previous = self.day_offset;
        self.day_offset = previous.checked_add(delta).ok_or(CalendarError::OutOfRange)?;
        if let Err(e) = self.refresh(source) {
            self.day_offset = previous;
            return Err(e);
        }
        info!("day offset -> {}", self.day_offset);
        Ok(())
    }

    pub fn take_dirty(&mut self) -> bool {
        let layer_dirty = self.layer.take_dirty();
        core::mem::replace(&mut self.needs_redraw, false) || layer_dirty
    }

    fn scale_y(&self, y: u32) -> i32 {
        (y * self.screen.height / REF_HEIGHT) as i32
    }

    /// Full redraw. Text is drawn before the moon, so a moon error still leaves
    /// the date on screen.
    pub fn draw<D>(&mut self, target: &mut D, sheet: &MoonSheet) -> Result<(), RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.needs_redraw = false;
        target.clear(Rgb565::BLACK).map_err(RenderError::Draw)?;

        let text = MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE);
        let centered = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Top)
            .build();
        let cx = (self.screen.width / 2) as i32;

        Text::with_text_style(INSTRUCTIONS, Point::new(cx, self.scale_y(INSTRUCTIONS_Y)), text, centered)
            .draw(target)
            .map_err(RenderError::Draw)?;

        Text::with_text_style(self.label.as_str(), Point::new(cx, self.scale_y(LABEL_Y)), text, centered)
            .draw(target)
            .map_err(RenderError::Draw)?;

        self.layer.draw(target, sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ClockDate;
    use crate::error::MoonError;
    use crate::sprite::select_offset;
    use embedded_graphics::mock_display::MockDisplay;

    // 2023-01-01 00:00:00 UTC
    const NEW_YEAR: i64 = 1_672_531_200;

    fn face() -> (WatchFace, ClockDate) {
        let clock = ClockDate::new(NEW_YEAR, 0);
        let mut face = WatchFace::new(&WatchConfig::default(), Size::new(64, 64));
        face.refresh(&clock).unwrap();
        (face, clock)
    }

    #[test]
    fn refresh_resolves_today() {
        let (face, _) = face();
        assert_eq!(face.date(), CalendarDate::new(2023, 1, 1).ok());
        assert_eq!(face.age().get(), 10);
        assert_eq!(face.label(), "Sun 01 Jan 2023");
    }

    #[test]
    fn up_and_down_scrub_days() {
        let (mut face, clock) = face();
        face.handle(Button::Up, &clock).unwrap();
        face.handle(Button::Up, &clock).unwrap();
        assert_eq!(face.day_offset(), 2);
        assert_eq!(face.label(), "Tue 03 Jan 2023");

        face.handle(Button::Down, &clock).unwrap();
        face.handle(Button::Down, &clock).unwrap();
        face.handle(Button::Down, &clock).unwrap();
        assert_eq!(face.day_offset(), -1);
        assert_eq!(face.date(), CalendarDate::new(2022, 12, 31).ok());
    }

    #[test]
    fn select_toggles_without_touching_the_date() {
        let (mut face, clock) = face();
        let age = face.age();
        face.handle(Button::Select, &clock).unwrap();
        assert_eq!(face.hemisphere(), Hemisphere::Southern);
        assert_eq!(face.age(), age);
        assert_eq!(face.day_offset(), 0);
        assert_eq!(face.layer().sprite_offset(), Ok(select_offset(age, Hemisphere::Southern)));

        face.handle(Button::Select, &clock).unwrap();
        assert_eq!(face.layer().sprite_offset(), Ok(age.get()));
    }

    #[test]
    fn failed_scrub_keeps_previous_state() {
        let clock = ClockDate::new(i64::MAX - 100, 0);
        let mut face = WatchFace::new(&WatchConfig::default(), Size::new(64, 64));
        assert_eq!(face.handle(Button::Up, &clock), Err(CalendarError::OutOfRange));
        assert_eq!(face.day_offset(), 0);
        assert_eq!(face.date(), None);
    }

    #[test]
    fn events_request_a_redraw() {
        let (mut face, clock) = face();
        assert!(face.take_dirty());
        assert!(!face.take_dirty());
        face.handle(Button::Select, &clock).unwrap();
        assert!(face.take_dirty());
    }

    #[test]
    fn draw_puts_the_moon_in_the_middle() {
        let (mut face, _) = face();
        let sheet = MoonSheet::new();
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);

        face.draw(&mut display, &sheet).unwrap();

        // layer bounds start at 32 - 6, frame one pixel further in
        let origin = Point::new(27, 27);
        for y in 0..10u32 {
            for x in 0..10u32 {
                let expected = if sheet.is_lit(10, x, y) { Rgb565::WHITE } else { Rgb565::BLACK };
                assert_eq!(display.get_pixel(origin + Point::new(x as i32, y as i32)), Some(expected));
            }
        }
        assert!(!face.take_dirty());
    }

    #[test]
    fn draw_reports_an_unset_hemisphere() {
        let (mut face, _) = face();
        face.layer_mut().clear_hemisphere();
        let sheet = MoonSheet::new();
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);

        assert_eq!(
            face.draw(&mut display, &sheet),
            Err(RenderError::Moon(MoonError::InvalidHemisphere))
        );
        // label row (y = 120 * 64 / 168 = 45) still got text
        let lit = (0..64).any(|x| (45..55).any(|y| display.get_pixel(Point::new(x, y)) == Some(Rgb565::WHITE)));
        assert!(lit);
    }
}
