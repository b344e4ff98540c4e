//! The moon layer: a small square widget showing one frame of the moon strip.
//!
//! State is plain data owned by the caller. Setters only record the new value
//! and mark the layer dirty; the frame is picked at draw time. The sub-image
//! view onto the strip is taken inside `draw` and dropped before it returns,
//! so at most one view exists and none survives between redraws.
//!
//! Frame pixels outside the moon disc are transparent, so a border fill shows
//! through the corners of the frame. Inside the disc, unlit is black.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Dimensions,
    image::Image,
    pixelcolor::{BinaryColor, Rgb565},
    prelude::{Point, Primitive, RgbColor, Size},
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
    Drawable, Pixel,
};
use log::error;

use crate::error::{MoonError, RenderError};
use crate::moon::{moon_age, CalendarDate, MoonAge};
use crate::sprite::{select_offset, Hemisphere, MoonSheet, MOON_RESOURCE_SIZE};

// One pixel of border on every side of the frame.
pub const LAYER_SIZE: u32 = MOON_RESOURCE_SIZE + 2;

#[derive(Clone, Debug, PartialEq)]
pub struct MoonLayer {
    age: MoonAge,
    hemisphere: Option<Hemisphere>,
    border_color: Option<Rgb565>,
    bounds: Rectangle,
    dirty: bool,
}

impl MoonLayer {
    /// Layer centred on `center`, showing a new moon for the northern hemisphere.
    pub fn new(center: Point) -> Self {
        let half = (LAYER_SIZE / 2) as i32;
        Self {
            age: MoonAge::NEW,
            hemisphere: Some(Hemisphere::Northern),
            border_color: None,
            bounds: Rectangle::new(center - Point::new(half, half), Size::new(LAYER_SIZE, LAYER_SIZE)),
            dirty: true,
        }
    }

    pub fn set_date(&mut self, date: &CalendarDate) {
        self.age = moon_age(date);
        self.dirty = true;
    }

    pub fn set_age(&mut self, age: MoonAge) {
        self.age = age;
        self.dirty = true;
    }

    pub fn set_hemisphere(&mut self, hemisphere: Hemisphere) {
        self.hemisphere = Some(hemisphere);
        self.dirty = true;
    }

    // A bad raw value leaves the layer without a hemisphere, so it will refuse to draw.
    pub fn set_hemisphere_raw(&mut self, raw: u8) -> Result<(), MoonError> {
        let parsed = Hemisphere::try_from(raw);
        self.hemisphere = parsed.ok();
        self.dirty = true;
        parsed.map(|_| ())
    }

    pub fn clear_hemisphere(&mut self) {
        self.hemisphere = None;
        self.dirty = true;
    }

    pub fn set_border_color(&mut self, color: Option<Rgb565>) {
        self.border_color = color;
        self.dirty = true;
    }

    pub fn age(&self) -> MoonAge {
        self.age
    }

    pub fn hemisphere(&self) -> Option<Hemisphere> {
        self.hemisphere
    }

    pub fn border_color(&self) -> Option<Rgb565> {
        self.border_color
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    pub fn sprite_offset(&self) -> Result<u8, MoonError> {
        match self.hemisphere {
            Some(h) => Ok(select_offset(self.age, h)),
            None => {
                error!("Hemisphere must be set");
                Err(MoonError::InvalidHemisphere)
            }
        }
    }

    /// Draw the current phase. Nothing is drawn when the hemisphere is unset.
    pub fn draw<D>(&mut self, target: &mut D, sheet: &MoonSheet) -> Result<(), RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.dirty = false;
        let offset = self.sprite_offset()?;

        if let Some(color) = self.border_color {
            let radius = MOON_RESOURCE_SIZE / 2;
            RoundedRectangle::with_equal_corners(self.bounds, Size::new(radius, radius))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target)
                .map_err(RenderError::Draw)?;
        }

        let origin = self.bounds.offset(-1).top_left;
        let frame = sheet.frame(offset);
        Image::new(&frame, origin)
            .draw(&mut SpriteTarget { target, sheet, origin })
            .map_err(RenderError::Draw)?;
        Ok(())
    }
}

// Maps 1bpp frame pixels onto the panel: on is white, off is black inside the
// disc and skipped outside it.
struct SpriteTarget<'a, D> {
    target: &'a mut D,
    sheet: &'a MoonSheet,
    origin: Point,
}

impl<D: DrawTarget<Color = Rgb565>> Dimensions for SpriteTarget<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D: DrawTarget<Color = Rgb565>> DrawTarget for SpriteTarget<'_, D> {
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        let (sheet, origin) = (self.sheet, self.origin);
        self.target.draw_iter(pixels.into_iter().filter_map(move |Pixel(p, c)| {
            if c.is_on() {
                return Some(Pixel(p, Rgb565::WHITE));
            }
            let local = p - origin;
            let inside = local.x >= 0 && local.y >= 0 && sheet.in_disc(local.x as u32, local.y as u32);
            inside.then_some(Pixel(p, Rgb565::BLACK))
        }))
    }
}
