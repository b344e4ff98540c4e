//! Phase sprite selection.
//!
//! The moon graphic is one vertical strip of 30 square frames, one per lunar
//! day. Picking a phase means picking a sub-rectangle of that strip:
//! - Northern hemisphere: frame index = moon age
//! - Southern hemisphere: frame index runs backwards, `(30 - age) % 30`
//!
//! The strip itself is baked at compile time from an integer cosine table, so
//! the firmware carries no image resources.

use embedded_graphics::{
    image::{ImageDrawableExt, ImageRaw, SubImage},
    pixelcolor::BinaryColor,
    prelude::{Point, Size},
    primitives::Rectangle,
};

use crate::error::MoonError;
use crate::moon::{MoonAge, MAX_MOON_AGE};

/// Edge length of one square sprite frame, in pixels.
pub const MOON_RESOURCE_SIZE: u32 = 10;

// The full moon frame doubles as the disc outline.
pub const FULL_MOON_OFFSET: u8 = MAX_MOON_AGE / 2;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

impl Hemisphere {
    pub fn toggled(self) -> Self {
        match self {
            Hemisphere::Northern => Hemisphere::Southern,
            Hemisphere::Southern => Hemisphere::Northern,
        }
    }

    // Raw form for storage
    pub fn as_u8(self) -> u8 {
        match self {
            Hemisphere::Northern => 0,
            Hemisphere::Southern => 1,
        }
    }
}

// An unknown raw value is an error, never a default.
impl TryFrom<u8> for Hemisphere {
    type Error = MoonError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Hemisphere::Northern),
            1 => Ok(Hemisphere::Southern),
            _ => Err(MoonError::InvalidHemisphere),
        }
    }
}

/// Frame index in the strip for a given age, as seen from `hemisphere`.
#[inline]
pub fn select_offset(age: MoonAge, hemisphere: Hemisphere) -> u8 {
    match hemisphere {
        Hemisphere::Northern => age.get(),
        Hemisphere::Southern => (MAX_MOON_AGE - age.get()) % MAX_MOON_AGE,
    }
}

pub fn select_offset_raw(age: MoonAge, hemisphere: u8) -> Result<u8, MoonError> {
    Hemisphere::try_from(hemisphere).map(|h| select_offset(age, h))
}

/// Source rectangle of frame `offset` inside the strip.
pub fn frame_rect(offset: u8) -> Rectangle {
    Rectangle::new(
        Point::new(0, offset as i32 * MOON_RESOURCE_SIZE as i32),
        Size::new(MOON_RESOURCE_SIZE, MOON_RESOURCE_SIZE),
    )
}

// ------------------------- Sprite strip -------------------------

const BYTES_PER_ROW: usize = (MOON_RESOURCE_SIZE as usize + 7) / 8;
const STRIP_LEN: usize = BYTES_PER_ROW * MOON_RESOURCE_SIZE as usize * MAX_MOON_AGE as usize;

// cos(2*pi*age/30) * 1000
#[rustfmt::skip]
const COS_MILLI: [i64; MAX_MOON_AGE as usize] = [
    1000,  978,  914,  809,  669,  500,  309,  105, -105, -309,
    -500, -669, -809, -914, -978, -1000, -978, -914, -809, -669,
    -500, -309, -105,  105,  309,  500,  669,  809,  914,  978,
];

const fn isqrt(n: u64) -> u64 {
    let (mut lo, mut hi) = (0u64, 1u64 << 32);
    while lo + 1 < hi {
        let mid = (lo + hi) / 2;
        if mid * mid <= n {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

// 1bpp, MSB first, rows padded to whole bytes (the ImageRaw layout).
// Coordinates are doubled so pixel centres sit on odd integers and the disc
// radius is exactly one frame width.
const fn build_strip() -> [u8; STRIP_LEN] {
    let mut out = [0u8; STRIP_LEN];
    let size = MOON_RESOURCE_SIZE as i64;
    let r2 = size * size;

    let mut age = 0usize;
    while age < MAX_MOON_AGE as usize {
        let c = COS_MILLI[age];
        let waxing = age <= (MAX_MOON_AGE / 2) as usize;

        let mut y = 0i64;
        while y < size {
            let dy = 2 * y - (size - 1);
            // half-width of the disc on this row, in thousandths
            let w = isqrt(((r2 - dy * dy) * 1_000_000) as u64) as i64;

            let mut x = 0i64;
            while x < size {
                let dx = 2 * x - (size - 1);
                let in_disc = dx * dx + dy * dy <= r2;
                // terminator sits at w*cos; lit side is right while waxing, left while waning
                let lit = if waxing { dx * 1_000_000 > w * c } else { dx * 1_000_000 < -(w * c) };
                if in_disc && lit {
                    let row = age * MOON_RESOURCE_SIZE as usize + y as usize;
                    let idx = row * BYTES_PER_ROW + (x as usize) / 8;
                    out[idx] |= 0x80u8 >> (x as u32 % 8);
                }
                x += 1;
            }
            y += 1;
        }
        age += 1;
    }
    out
}

static MOON_STRIP: [u8; STRIP_LEN] = build_strip();

/// The 30-frame moon strip, `MOON_RESOURCE_SIZE` wide.
pub struct MoonSheet {
    image: ImageRaw<'static, BinaryColor>,
}

impl MoonSheet {
    pub fn new() -> Self {
        Self { image: ImageRaw::new(&MOON_STRIP, MOON_RESOURCE_SIZE) }
    }

    pub fn image(&self) -> &ImageRaw<'static, BinaryColor> {
        &self.image
    }

    // View onto one frame. Borrows the sheet, so it cannot outlive a redraw.
    pub fn frame(&self, offset: u8) -> SubImage<'_, ImageRaw<'static, BinaryColor>> {
        self.image.sub_image(&frame_rect(offset))
    }

    // Whether pixel (x, y) of frame `offset` is lit.
    pub fn is_lit(&self, offset: u8, x: u32, y: u32) -> bool {
        if offset >= MAX_MOON_AGE || x >= MOON_RESOURCE_SIZE || y >= MOON_RESOURCE_SIZE {
            return false;
        }
        let row = offset as usize * MOON_RESOURCE_SIZE as usize + y as usize;
        MOON_STRIP[row * BYTES_PER_ROW + x as usize / 8] & (0x80u8 >> (x % 8)) != 0
    }

    /// Inside the moon disc, lit or not. Pixels outside it are transparent.
    pub fn in_disc(&self, x: u32, y: u32) -> bool {
        self.is_lit(FULL_MOON_OFFSET, x, y)
    }

    pub fn lit_count(&self, offset: u8) -> u32 {
        let mut n = 0;
        for y in 0..MOON_RESOURCE_SIZE {
            for x in 0..MOON_RESOURCE_SIZE {
                n += self.is_lit(offset, x, y) as u32;
            }
        }
        n
    }
}

impl Default for MoonSheet {
    fn default() -> Self {
        Self::new()
    }
}
