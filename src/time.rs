//! # Epoch text codec and Earth rotation angle
//!
//! The ISS ephemeris feed timestamps every state vector with a **day-of-year** variant of
//! ISO 8601:
//!
//! ```text
//! YYYY-DDDTHH:MM:SS.sssZ      e.g. 2024-069T02:26:00.000Z
//! ```
//!
//! where `DDD` is the zero-padded day of the year (001–366). This module converts that text to a
//! [`hifitime::Epoch`] in the UTC time scale and back, accepts ordinary calendar timestamps
//! (`YYYY-MM-DDTHH:MM:SS[.fff][Z]`) for user supplied instants, and provides the Greenwich
//! sidereal angle used to rotate inertial longitudes into Earth-fixed ones.
use hifitime::{Epoch, TimeScale, Unit};
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    constants::{Radian, DPI, GST_J2000_DEG, RADEG, SIDEREAL_RATE_DEG_PER_DAY},
    tracker_errors::TrackerError,
};

static OEM_EPOCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{3})T(\d{2}):(\d{2}):(\d{2})\.(\d{3})[zZ]?$")
        .expect("OEM epoch regex is valid")
});

static CALENDAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?(?:[zZ]|\+00:00)?$")
        .expect("calendar regex is valid")
});

/// Cumulative number of days before the first day of each month (non leap year)
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day of the year (1-based) of a calendar date.
///
/// Arguments
/// ---------
/// * `year`: the gregorian year, used to account for the 29th of February
/// * `month`: month number in 1..=12
/// * `day`: day of the month
///
/// Return
/// ------
/// * the day of the year, 1 for January 1st
pub fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    let leap = u16::from(month > 2 && is_leap_year(year));
    DAYS_BEFORE_MONTH[usize::from(month - 1)] + leap + u16::from(day)
}

/// Inverse of [`day_of_year`]: month and day of the month for a day of the year.
///
/// Returns `None` when `doy` is zero or past the end of `year`.
pub fn month_day_from_doy(year: i32, doy: u16) -> Option<(u8, u8)> {
    let year_length = if is_leap_year(year) { 366 } else { 365 };
    if doy == 0 || doy > year_length {
        return None;
    }

    (1..=12u8).rev().find_map(|month| {
        let first = day_of_year(year, month, 1);
        (doy >= first).then(|| (month, (doy - first + 1) as u8))
    })
}

fn capture_number<T: std::str::FromStr>(
    captures: &regex::Captures,
    idx: usize,
    text: &str,
) -> Result<T, TrackerError> {
    captures
        .get(idx)
        .and_then(|m| m.as_str().parse::<T>().ok())
        .ok_or_else(|| TrackerError::InvalidEpoch(text.to_string()))
}

/// Parse an epoch in the feed format `YYYY-DDDTHH:MM:SS.sss` (trailing `Z` optional).
///
/// Arguments
/// ---------
/// * `text`: the epoch text, e.g. `"2024-069T02:26:00.000Z"`
///
/// Return
/// ------
/// * the corresponding UTC [`Epoch`], or [`TrackerError::InvalidEpoch`] when the text does not
///   follow the format or names a date that does not exist (day 366 of a common year, hour 25…)
pub fn parse_oem_epoch(text: &str) -> Result<Epoch, TrackerError> {
    let invalid = || TrackerError::InvalidEpoch(text.to_string());
    let captures = OEM_EPOCH_REGEX.captures(text.trim()).ok_or_else(invalid)?;

    let year: i32 = capture_number(&captures, 1, text)?;
    let doy: u16 = capture_number(&captures, 2, text)?;
    let hour: u8 = capture_number(&captures, 3, text)?;
    let minute: u8 = capture_number(&captures, 4, text)?;
    let second: u8 = capture_number(&captures, 5, text)?;
    let millis: u32 = capture_number(&captures, 6, text)?;

    let (month, day) = month_day_from_doy(year, doy).ok_or_else(invalid)?;

    Epoch::maybe_from_gregorian(
        year,
        month,
        day,
        hour,
        minute,
        second,
        millis * 1_000_000,
        TimeScale::UTC,
    )
    .map_err(|_| invalid())
}

/// Render an epoch in the canonical feed format `YYYY-DDDTHH:MM:SS.sssZ`.
///
/// Sub-millisecond digits are truncated, so any epoch produced by [`parse_oem_epoch`]
/// renders back to the text it was parsed from (modulo the optional `Z`).
pub fn format_oem_epoch(epoch: &Epoch) -> String {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    format!(
        "{year:04}-{:03}T{hour:02}:{minute:02}:{second:02}.{:03}Z",
        day_of_year(year, month, day),
        nanos / 1_000_000
    )
}

/// Parse an ISO 8601 calendar timestamp `YYYY-MM-DDTHH:MM:SS[.fffffffff][Z]`, read as UTC.
///
/// This is the conversion used to compare a wall-clock instant given by a user against the
/// day-of-year epochs of the feed.
pub fn epoch_from_calendar(text: &str) -> Result<Epoch, TrackerError> {
    let invalid = || TrackerError::InvalidEpoch(text.to_string());
    let captures = CALENDAR_REGEX.captures(text.trim()).ok_or_else(invalid)?;

    let year: i32 = capture_number(&captures, 1, text)?;
    let month: u8 = capture_number(&captures, 2, text)?;
    let day: u8 = capture_number(&captures, 3, text)?;
    let hour: u8 = capture_number(&captures, 4, text)?;
    let minute: u8 = capture_number(&captures, 5, text)?;
    let second: u8 = capture_number(&captures, 6, text)?;

    // right-pad the fraction to nanoseconds
    let nanos = match captures.get(7) {
        Some(frac) => format!("{:0<9}", frac.as_str())
            .parse::<u32>()
            .map_err(|_| invalid())?,
        None => 0,
    };

    Epoch::maybe_from_gregorian(year, month, day, hour, minute, second, nanos, TimeScale::UTC)
        .map_err(|_| invalid())
}

/// J2000.0 reference instant, 2000-01-01 12:00:00 UTC
pub fn j2000_utc() -> Epoch {
    Epoch::from_gregorian_utc_hms(2000, 1, 1, 12, 0, 0)
}

/// Greenwich sidereal angle in radians, normalized to [0, 2π).
///
/// Linear rotation model: the angle at J2000.0 plus a constant sidereal rate times the days
/// elapsed since J2000.0. Precession and nutation are ignored, which is consistent with the
/// spherical Earth used by the geodesy module.
///
/// # Arguments
/// * `epoch` - the instant at which the Earth orientation is required
///
/// # Returns
/// * the angle between the inertial X axis and the Greenwich meridian
pub fn greenwich_sidereal_angle(epoch: &Epoch) -> Radian {
    let days = (*epoch - j2000_utc()).to_unit(Unit::Day);
    ((GST_J2000_DEG + SIDEREAL_RATE_DEG_PER_DAY * days) * RADEG).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(1945, 9, 2), 245);
        assert_eq!(day_of_year(2004, 10, 7), 281);
        assert_eq!(day_of_year(2024, 3, 9), 69);
        assert_eq!(day_of_year(2023, 12, 31), 365);
        assert_eq!(day_of_year(2024, 12, 31), 366);
        assert_eq!(day_of_year(2024, 1, 1), 1);
    }

    #[test]
    fn test_month_day_from_doy() {
        assert_eq!(month_day_from_doy(2024, 69), Some((3, 9)));
        assert_eq!(month_day_from_doy(2023, 60), Some((3, 1)));
        assert_eq!(month_day_from_doy(2024, 60), Some((2, 29)));
        assert_eq!(month_day_from_doy(2024, 366), Some((12, 31)));
        assert_eq!(month_day_from_doy(2023, 366), None);
        assert_eq!(month_day_from_doy(2023, 0), None);
    }

    #[test]
    fn test_parse_oem_epoch() {
        let epoch = parse_oem_epoch("2024-069T02:26:00.000Z").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc_hms(2024, 3, 9, 2, 26, 0));

        let without_suffix = parse_oem_epoch("2024-069T02:26:00.000").unwrap();
        assert_eq!(epoch, without_suffix);

        let millis = parse_oem_epoch("2024-069T02:26:00.250Z").unwrap();
        assert_eq!(
            millis,
            Epoch::from_gregorian_utc(2024, 3, 9, 2, 26, 0, 250_000_000)
        );
    }

    #[test]
    fn test_parse_oem_epoch_rejects_bad_text() {
        for bad in [
            "",
            "2024-69T02:26:00.000Z",
            "2024-069 02:26:00.000Z",
            "2024-069T02:26:00Z",
            "2024-03-09T02:26:00.000Z",
            "2023-366T00:00:00.000Z",
            "2024-000T00:00:00.000Z",
            "2024-069T25:00:00.000Z",
            "apple",
        ] {
            assert_eq!(
                parse_oem_epoch(bad),
                Err(TrackerError::InvalidEpoch(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_oem_epoch() {
        for text in [
            "2024-069T02:26:00.000Z",
            "2024-366T23:59:59.999Z",
            "2023-001T00:00:00.004Z",
        ] {
            let epoch = parse_oem_epoch(text).unwrap();
            assert_eq!(format_oem_epoch(&epoch), text);
        }
    }

    #[test]
    fn test_epoch_from_calendar() {
        let epoch = epoch_from_calendar("1945-09-02T10:30:17.003z").unwrap();
        assert_eq!(format_oem_epoch(&epoch), "1945-245T10:30:17.003Z");

        let epoch = epoch_from_calendar("2004-10-07T00:07:04.123Z").unwrap();
        assert_eq!(format_oem_epoch(&epoch), "2004-281T00:07:04.123Z");

        let epoch = epoch_from_calendar("2024-03-09T02:27:00").unwrap();
        assert_eq!(format_oem_epoch(&epoch), "2024-069T02:27:00.000Z");

        let epoch = epoch_from_calendar("2024-03-09T02:27:00.123456").unwrap();
        assert_eq!(
            epoch,
            Epoch::from_gregorian_utc(2024, 3, 9, 2, 27, 0, 123_456_000)
        );

        assert!(epoch_from_calendar("2024-13-09T02:27:00").is_err());
        assert!(epoch_from_calendar("2024-069T02:27:00.000Z").is_err());
    }

    #[test]
    fn test_greenwich_sidereal_angle() {
        let at_j2000 = greenwich_sidereal_angle(&j2000_utc());
        assert_relative_eq!(at_j2000, 4.894961212735792, epsilon = 1e-9);

        let epoch = parse_oem_epoch("2024-069T02:26:00.000Z").unwrap();
        let angle = greenwich_sidereal_angle(&epoch);
        assert_relative_eq!(angle, 3.5569365543029807, epsilon = 1e-3);
        assert!((0.0..DPI).contains(&angle));
    }
}
