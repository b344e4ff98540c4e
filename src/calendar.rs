//! Host-side date collaborator.
//!
//! Resolves "today + N days" to a calendar date and formats the date label.
//! Timezone and calendar arithmetic stay out of the moon core; this is the
//! only module that knows about clocks.

use core::fmt::{self, Write};

use chrono::{DateTime, Datelike};
use log::warn;

use crate::config::SECONDS_PER_DAY;
use crate::moon::CalendarDate;

/// Room for a six-digit year, the most chrono can place: "Fri 31 Dec 262142".
pub type DateLabel = heapless::String<20>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarError {
    // The offset pushed the timestamp before year 1 or outside what chrono can represent.
    OutOfRange,
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::OutOfRange => f.write_str("date out of range"),
        }
    }
}

impl core::error::Error for CalendarError {}

pub trait DateSource {
    /// Local calendar date `day_offset` days away from today.
    fn current_date(&self, day_offset: i32) -> Result<CalendarDate, CalendarError>;
}

/// A wall clock reading: Unix seconds plus the local offset from UTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockDate {
    pub now_secs: i64,
    pub utc_offset_secs: i32,
}

impl ClockDate {
    pub fn new(now_secs: i64, utc_offset_secs: i32) -> Self {
        Self { now_secs, utc_offset_secs }
    }
}

impl DateSource for ClockDate {
    fn current_date(&self, day_offset: i32) -> Result<CalendarDate, CalendarError> {
        let local = (day_offset as i64)
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|shift| self.now_secs.checked_add(shift))
            .and_then(|t| t.checked_add(self.utc_offset_secs as i64))
            .ok_or(CalendarError::OutOfRange)?;

        // Local seconds are treated as UTC so no timezone database is needed.
        let dt = DateTime::from_timestamp(local, 0).ok_or(CalendarError::OutOfRange)?;
        CalendarDate::try_from(dt.date_naive()).map_err(|_| CalendarError::OutOfRange)
    }
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// "%a %d %b %Y", e.g. `Sun 18 Oct 2026`. Dates chrono cannot place get "--- " for the weekday.
pub fn format_date_label(date: &CalendarDate) -> DateLabel {
    let weekday = chrono::NaiveDate::from_ymd_opt(date.year(), date.month(), date.day())
        .map(|d| WEEKDAYS[d.weekday().num_days_from_monday() as usize])
        .unwrap_or("---");
    let month = MONTHS
        .get(date.month().wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("---");

    let mut label = DateLabel::new();
    if write!(label, "{} {:02} {} {}", weekday, date.day(), month, date.year()).is_err() {
        warn!("date label truncated: {:?}", date);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-10-18 00:00:00 UTC
    const SUNDAY: i64 = 1_792_281_600;

    fn ymd(d: CalendarDate) -> (i32, u32, u32) {
        (d.year(), d.month(), d.day())
    }

    #[test]
    fn offset_zero_is_today() {
        let clock = ClockDate::new(SUNDAY + 3600, 0);
        assert_eq!(ymd(clock.current_date(0).unwrap()), (2026, 10, 18));
    }

    #[test]
    fn day_offsets_cross_month_and_year() {
        let clock = ClockDate::new(SUNDAY, 0);
        assert_eq!(ymd(clock.current_date(14).unwrap()), (2026, 11, 1));
        assert_eq!(ymd(clock.current_date(-18).unwrap()), (2026, 9, 30));
        assert_eq!(ymd(clock.current_date(75).unwrap()), (2027, 1, 1));
    }

    #[test]
    fn utc_offset_moves_the_local_day() {
        // 23:30 UTC is already tomorrow at UTC+1
        let clock = ClockDate::new(SUNDAY + 23 * 3600 + 1800, 3600);
        assert_eq!(ymd(clock.current_date(0).unwrap()), (2026, 10, 19));
        let west = ClockDate::new(SUNDAY + 1800, -3600);
        assert_eq!(ymd(west.current_date(0).unwrap()), (2026, 10, 17));
    }

    #[test]
    fn absurd_offsets_fail_cleanly() {
        let clock = ClockDate::new(i64::MAX - 10, 0);
        assert_eq!(clock.current_date(1), Err(CalendarError::OutOfRange));
    }

    #[test]
    fn timestamps_before_year_one_are_out_of_range() {
        let clock = ClockDate::new(-62_200_000_000, 0);
        assert_eq!(clock.current_date(0), Err(CalendarError::OutOfRange));
        // 0001-01-01 00:00:00 UTC is the first day that resolves
        let first = ClockDate::new(-62_135_596_800, 0);
        assert_eq!(ymd(first.current_date(0).unwrap()), (1, 1, 1));
        assert_eq!(first.current_date(-1), Err(CalendarError::OutOfRange));
    }

    #[test]
    fn label_keeps_the_year_at_the_far_end() {
        let last = chrono::NaiveDate::MAX;
        let d = CalendarDate::try_from(last).unwrap();
        let label = format_date_label(&d);
        let tail = format!(" 31 Dec {}", d.year());
        assert!(label.as_str().ends_with(&tail), "{}", label.as_str());
    }

    #[test]
    fn label_matches_strftime_shape() {
        let d = CalendarDate::new(2026, 10, 18).unwrap();
        assert_eq!(format_date_label(&d).as_str(), "Sun 18 Oct 2026");
        let d = CalendarDate::new(2024, 2, 29).unwrap();
        assert_eq!(format_date_label(&d).as_str(), "Thu 29 Feb 2024");
        let d = CalendarDate::new(1999, 12, 31).unwrap();
        assert_eq!(format_date_label(&d).as_str(), "Fri 31 Dec 1999");
    }

    #[test]
    fn single_digit_days_are_padded() {
        let d = CalendarDate::new(2023, 1, 1).unwrap();
        assert_eq!(format_date_label(&d).as_str(), "Sun 01 Jan 2023");
    }
}
