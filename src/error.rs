//! Error types shared by the watchface core.

use core::fmt;

/// Failures of the moon-phase core. Closed set: either a frame offset comes
/// out of the core or one of these does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoonError {
    /// The date is not a real Gregorian day (or predates year 1).
    InvalidDate { year: i32, month: u32, day: u32 },
    /// No recognised hemisphere at sprite selection time.
    InvalidHemisphere,
}

impl fmt::Display for MoonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoonError::InvalidDate { year, month, day } => {
                write!(f, "invalid date {:04}-{:02}-{:02}", year, month, day)
            }
            MoonError::InvalidHemisphere => f.write_str("hemisphere must be set"),
        }
    }
}

impl core::error::Error for MoonError {}

// Drawing can fail in the core (nothing to draw) or in the target itself.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderError<E> {
    Moon(MoonError),
    Draw(E),
}

impl<E> From<MoonError> for RenderError<E> {
    fn from(e: MoonError) -> Self {
        RenderError::Moon(e)
    }
}

impl<E: fmt::Debug> fmt::Display for RenderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Moon(e) => write!(f, "moon layer: {}", e),
            RenderError::Draw(e) => write!(f, "draw target: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for RenderError<E> {}
