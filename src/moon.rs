//! Moon age calculation.
//!
//! Based on John Conway's "do it in your head" approximation. It drifts by
//! about a day over decades, which is fine for picking one of 30 sprite frames.
//!
//! See: http://www.faqs.org/faqs/astronomy/faq/part3/section-15.html

use chrono::NaiveDate;
use log::debug;

use crate::error::MoonError;

/// Number of lunar days in the cycle, and frames in the sprite strip.
pub const MAX_MOON_AGE: u8 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CalendarDate {
    year: i32,
    month: u32, // 1-12
    day: u32,   // 1-31
}

impl CalendarDate {
    // Reject anything that is not a real Gregorian day, leap years included.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, MoonError> {
        if year < 1 || NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(MoonError::InvalidDate { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }
}

// chrono reaches back past year 1, so this goes through the same check as `new`.
impl TryFrom<NaiveDate> for CalendarDate {
    type Error = MoonError;

    fn try_from(d: NaiveDate) -> Result<Self, Self::Error> {
        use chrono::Datelike;
        Self::new(d.year(), d.month(), d.day())
    }
}

/// Days since the last new moon, always in `0..MAX_MOON_AGE`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MoonAge(u8);

impl MoonAge {
    pub const NEW: MoonAge = MoonAge(0);

    pub const fn new(age: u8) -> Option<Self> {
        if age < MAX_MOON_AGE {
            Some(MoonAge(age))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

// Floor-based modulo: non-negative for a positive divisor, even when `a` is negative.
#[inline]
pub fn modulo(a: f64, n: f64) -> f64 {
    a - n * libm::floor(a / n)
}

/// Conway's approximation on raw, unchecked fields.
///
/// Out-of-range months or days still produce an age in range, it just won't
/// mean anything. Use [`moon_age`] with a validated [`CalendarDate`] instead.
pub fn compute_age(year: i32, month: u32, day: u32) -> MoonAge {
    let mut r = (year % 100) as f64;
    r = modulo(r, 19.0);
    if r > 9.0 {
        r -= 19.0;
    }
    r = modulo(r * 11.0, 30.0) + month as f64 + day as f64;
    if month < 3 {
        r += 2.0;
    }
    r -= if year < 2000 { 4.0 } else { 8.3 };
    r = modulo(libm::floor(r + 0.5), 30.0);
    if r < 0.0 {
        r += 30.0;
    }

    // modulo keeps r in [0, 30); the clamp only guards float edge cases
    MoonAge((r as u8).min(MAX_MOON_AGE - 1))
}

pub fn moon_age(date: &CalendarDate) -> MoonAge {
    let age = compute_age(date.year, date.month, date.day);
    debug!("Date: {}/{}/{} - Age: {}", date.year, date.month, date.day, age.get());
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age(y: i32, m: u32, d: u32) -> u8 {
        moon_age(&CalendarDate::new(y, m, d).unwrap()).get()
    }

    #[test]
    fn modulo_is_floor_based() {
        assert_eq!(modulo(7.0, 30.0), 7.0);
        assert_eq!(modulo(-99.0, 30.0), 21.0);
        assert_eq!(modulo(-30.0, 30.0), 0.0);
        assert_eq!(modulo(53.0, 30.0), 23.0);
    }

    #[test]
    fn reference_fixtures() {
        // hand-evaluated from the formula, not from an ephemeris
        assert_eq!(age(2000, 1, 6), 1);
        assert_eq!(age(2023, 1, 1), 10);
        assert_eq!(age(2023, 6, 15), 27);
        assert_eq!(age(1999, 12, 31), 23);
        assert_eq!(age(2010, 11, 20), 14);
        assert_eq!(age(2019, 1, 21), 16);
    }

    #[test]
    fn leap_day_is_accepted() {
        assert_eq!(age(2024, 2, 29), 20);
    }

    #[test]
    fn invalid_dates_are_named() {
        assert_eq!(
            CalendarDate::new(2023, 2, 29),
            Err(MoonError::InvalidDate { year: 2023, month: 2, day: 29 })
        );
        assert!(CalendarDate::new(2023, 13, 1).is_err());
        assert!(CalendarDate::new(2023, 0, 10).is_err());
        assert!(CalendarDate::new(2023, 4, 31).is_err());
        assert!(CalendarDate::new(0, 1, 1).is_err());
    }

    #[test]
    fn naive_dates_before_year_one_are_rejected() {
        let bc = NaiveDate::from_ymd_opt(-2, 12, 17).unwrap();
        assert_eq!(
            CalendarDate::try_from(bc),
            Err(MoonError::InvalidDate { year: -2, month: 12, day: 17 })
        );
        let first = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        let d = CalendarDate::try_from(first).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1, 1, 1));
    }

    #[test]
    fn every_day_of_a_century_stays_in_range() {
        let mut d = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2050, 12, 31).unwrap();
        while d <= end {
            let a = moon_age(&CalendarDate::try_from(d).unwrap()).get();
            assert!(a < MAX_MOON_AGE, "{:?} -> {}", d, a);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn unchecked_garbage_still_lands_in_range() {
        assert!(compute_age(2023, 99, 99).get() < MAX_MOON_AGE);
        assert!(compute_age(1, 0, 0).get() < MAX_MOON_AGE);
    }

    #[test]
    fn moon_age_bounds() {
        assert_eq!(MoonAge::new(29).map(MoonAge::get), Some(29));
        assert_eq!(MoonAge::new(30), None);
        assert_eq!(MoonAge::default(), MoonAge::NEW);
    }
}
