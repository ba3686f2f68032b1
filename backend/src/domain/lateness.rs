//! # Lateness Calculator
//!
//! Turns a school start time and an arrival time into a stepped penalty.
//! Both times are wall-clock times on the same day; there is no day
//! rollover, so an arrival "before" the start (including one just after
//! midnight) is simply on time.
//!
//! ```text
//! late_minutes   = max(0, arrival - start)
//! intervals_late = floor(late_minutes / interval_minutes)
//! point          = intervals_late * penalty_per_interval
//! ```
//!
//! Everything here is pure: the same four inputs always give the same
//! outcome.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use crate::domain::errors::PointError;

/// A 24-hour wall-clock time with minute precision (`HH:MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hours: u32,
    minutes: u32,
}

impl ClockTime {
    /// Build from known-good components. Callers with untrusted input should
    /// go through `try_new` or `FromStr`.
    pub const fn new(hours: u32, minutes: u32) -> Self {
        debug_assert!(hours < 24 && minutes < 60);
        Self { hours, minutes }
    }

    pub fn try_new(hours: u32, minutes: u32) -> Result<Self, PointError> {
        if hours >= 24 || minutes >= 60 {
            return Err(PointError::invalid(format!(
                "Time out of range: {}:{}",
                hours, minutes
            )));
        }
        Ok(Self { hours, minutes })
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute())
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Minutes since midnight
    pub fn total_minutes(&self) -> i64 {
        i64::from(self.hours) * 60 + i64::from(self.minutes)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for ClockTime {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PointError::invalid(format!("Time must be in HH:MM format: '{}'", s));

        let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
        let well_formed = |part: &str| {
            !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !well_formed(h) || m.len() != 2 || !well_formed(m) {
            return Err(malformed());
        }

        let hours: u32 = h.parse().map_err(|_| malformed())?;
        let minutes: u32 = m.parse().map_err(|_| malformed())?;
        Self::try_new(hours, minutes)
    }
}

/// Result of checking one arrival against the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatenessOutcome {
    pub is_late: bool,
    pub late_minutes: i64,
    pub intervals_late: i64,
    pub point: i64,
    /// e.g. `Hadir jam 07:36 - Terlambat 6 menit (-1 poin)`
    pub note: String,
}

/// Compute lateness and penalty for one arrival.
///
/// An on-time arrival never consults the interval, so it yields a zero
/// penalty even under a broken configuration. A late arrival with
/// `interval_minutes <= 0` fails with `InvalidInput` instead of dividing by
/// zero or producing a negative interval count.
pub fn calculate_lateness(
    start_time: ClockTime,
    arrival_time: ClockTime,
    interval_minutes: i64,
    penalty_per_interval: i64,
) -> Result<LatenessOutcome, PointError> {
    let mut note = format!("Hadir jam {}", arrival_time);

    let late_minutes = arrival_time.total_minutes() - start_time.total_minutes();
    if late_minutes <= 0 {
        return Ok(LatenessOutcome {
            is_late: false,
            late_minutes: 0,
            intervals_late: 0,
            point: 0,
            note,
        });
    }

    if interval_minutes <= 0 {
        return Err(PointError::invalid(format!(
            "Late penalty interval must be a positive number of minutes, got {}",
            interval_minutes
        )));
    }

    let intervals_late = late_minutes / interval_minutes;
    let point = intervals_late
        .checked_mul(penalty_per_interval)
        .ok_or_else(|| PointError::invalid("Late penalty is out of range"))?;

    note.push_str(&format!(" - Terlambat {} menit ({} poin)", late_minutes, point));

    Ok(LatenessOutcome {
        is_late: true,
        late_minutes,
        intervals_late,
        point,
        note,
    })
}

/// Same as [`calculate_lateness`] for `HH:MM` strings
pub fn calculate_lateness_from_str(
    start_time: &str,
    arrival_time: &str,
    interval_minutes: i64,
    penalty_per_interval: i64,
) -> Result<LatenessOutcome, PointError> {
    let start: ClockTime = start_time.parse()?;
    let arrival: ClockTime = arrival_time.parse()?;
    calculate_lateness(start, arrival, interval_minutes, penalty_per_interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_arrival_exactly_at_start_is_on_time() {
        let outcome = calculate_lateness(t("07:30"), t("07:30"), 5, -1).unwrap();
        assert!(!outcome.is_late);
        assert_eq!(outcome.late_minutes, 0);
        assert_eq!(outcome.point, 0);
        assert_eq!(outcome.note, "Hadir jam 07:30");
    }

    #[test]
    fn test_six_minutes_late_is_one_interval() {
        let outcome = calculate_lateness(t("07:30"), t("07:36"), 5, -1).unwrap();
        assert!(outcome.is_late);
        assert_eq!(outcome.late_minutes, 6);
        assert_eq!(outcome.intervals_late, 1);
        assert_eq!(outcome.point, -1);
        assert_eq!(outcome.note, "Hadir jam 07:36 - Terlambat 6 menit (-1 poin)");
    }

    #[test]
    fn test_fifteen_minutes_late_is_three_intervals() {
        let outcome = calculate_lateness(t("07:30"), t("07:45"), 5, -1).unwrap();
        assert_eq!(outcome.late_minutes, 15);
        assert_eq!(outcome.intervals_late, 3);
        assert_eq!(outcome.point, -3);
    }

    #[test]
    fn test_late_within_first_interval_has_no_penalty() {
        let outcome = calculate_lateness(t("07:30"), t("07:34"), 5, -1).unwrap();
        assert!(outcome.is_late);
        assert_eq!(outcome.late_minutes, 4);
        assert_eq!(outcome.point, 0);
        assert_eq!(outcome.note, "Hadir jam 07:34 - Terlambat 4 menit (0 poin)");
    }

    #[test]
    fn test_every_arrival_matches_formula() {
        let start = t("07:30");
        for arrival_total in 0..(24 * 60) {
            let arrival = ClockTime::new(arrival_total / 60, arrival_total % 60);
            let outcome = calculate_lateness(start, arrival, 5, -2).unwrap();
            let diff = arrival.total_minutes() - start.total_minutes();
            if diff <= 0 {
                assert!(!outcome.is_late);
                assert_eq!(outcome.late_minutes, 0);
                assert_eq!(outcome.point, 0);
            } else {
                assert!(outcome.is_late);
                assert_eq!(outcome.late_minutes, diff);
                assert_eq!(outcome.point, (diff / 5) * -2);
            }
        }
    }

    #[test]
    fn test_late_minutes_monotonic_in_arrival() {
        let start = t("06:45");
        let mut previous = 0;
        for arrival_total in 0..(24 * 60) {
            let arrival = ClockTime::new(arrival_total / 60, arrival_total % 60);
            let outcome = calculate_lateness(start, arrival, 7, -1).unwrap();
            assert!(outcome.late_minutes >= previous);
            previous = outcome.late_minutes;
        }
    }

    #[test]
    fn test_identical_inputs_identical_outputs() {
        let first = calculate_lateness(t("07:00"), t("08:13"), 10, -3).unwrap();
        let second = calculate_lateness(t("07:00"), t("08:13"), 10, -3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_after_midnight_is_not_rolled_over() {
        let outcome = calculate_lateness(t("23:50"), t("00:10"), 5, -1).unwrap();
        assert!(!outcome.is_late);
        assert_eq!(outcome.point, 0);
    }

    #[test]
    fn test_non_positive_interval_rejected_only_when_late() {
        assert!(calculate_lateness(t("07:30"), t("07:00"), 0, -1).is_ok());
        assert!(calculate_lateness(t("07:30"), t("07:30"), -5, -1).is_ok());

        let err = calculate_lateness(t("07:30"), t("07:40"), 0, -1).unwrap_err();
        assert!(matches!(err, PointError::InvalidInput(_)));
        let err = calculate_lateness(t("07:30"), t("07:40"), -5, -1).unwrap_err();
        assert!(matches!(err, PointError::InvalidInput(_)));
    }

    #[test]
    fn test_clock_time_parsing() {
        assert_eq!(t("7:05"), ClockTime::new(7, 5));
        assert_eq!(t(" 07:05 "), ClockTime::new(7, 5));
        assert_eq!(t("23:59").to_string(), "23:59");
        for bad in ["", "0730", "24:00", "07:60", "07:5", "aa:bb", "07:30:00", "-1:30"] {
            assert!(bad.parse::<ClockTime>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_from_str_variant_reports_bad_times() {
        let err = calculate_lateness_from_str("07:30", "late", 5, -1).unwrap_err();
        assert!(matches!(err, PointError::InvalidInput(_)));
        let ok = calculate_lateness_from_str("07:30", "7:45", 5, -1).unwrap();
        assert_eq!(ok.note, "Hadir jam 07:45 - Terlambat 15 menit (-3 poin)");
    }
}
