//! Local sidereal time from UTC and observer longitude.
//!
//! Uses the low precision approximation
//! `LST = 100.46 + 0.985647·d + λ + 15·UT`,
//! where `d` are the days since J2000.0 and `UT` the hours of the UTC day.
//! The result is good to a few arcminutes within several centuries of J2000.0.

use std::fmt::{self, Display};

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};

use crate::error::{Result, SkyMapError};

/// Julian date of the J2000.0 epoch, 2000-01-01 12:00:00 UTC.
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.;

/// Local sidereal time in degrees, normalized to `[0, 360)`.
///
/// Only valid for the instant it was computed for.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct SiderealTime(f64);

impl SiderealTime {
    /// Normalize an angle in degrees into a sidereal time.
    pub fn from_degrees(degrees: f64) -> Self {
        Self(normalize_degrees(degrees))
    }

    /// Value in degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Value in radians, in `[0, 2π)`.
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Value in hours, in `[0, 24)`.
    pub fn hours(self) -> f64 {
        self.0 / 15.
    }
}

impl Display for SiderealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°", self.0)
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.);
    // rem_euclid rounds tiny negative values up to 360
    if normalized >= 360. { 0. } else { normalized }
}

fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Julian date of a UTC instant.
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + instant.timestamp_subsec_nanos() as f64 * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Whole and fractional days since J2000.0.
///
/// Splitting keeps the fraction exact even centuries away from the epoch.
fn split_days_since_j2000(instant: DateTime<Utc>) -> (i64, f64) {
    let delta = instant - j2000();
    let whole = delta.num_days();
    let rest = delta - TimeDelta::days(whole);
    let fraction = rest.num_microseconds().unwrap_or(0) as f64 / (SECONDS_PER_DAY * 1e6);
    (whole, fraction)
}

/// Days since J2000.0, `JD(instant) - JD(J2000.0)`.
pub fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    let (whole, fraction) = split_days_since_j2000(instant);
    whole as f64 + fraction
}

/// Fractional hours of the UTC day.
pub fn ut_hours(instant: DateTime<Utc>) -> f64 {
    instant.hour() as f64
        + instant.minute() as f64 / 60.
        + instant.second() as f64 / 3600.
        + instant.nanosecond() as f64 / 3.6e12
}

/// Local sidereal time at `instant` for an observer at `longitude` (degrees, east positive).
pub fn local_sidereal_time(instant: DateTime<Utc>, longitude: f64) -> Result<SiderealTime> {
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(SkyMapError::InvalidInput(format!(
            "longitude {longitude} outside of [-180, 180]"
        )));
    }

    let (whole, fraction) = split_days_since_j2000(instant);
    let drift = (0.985647 * whole as f64).rem_euclid(360.) + 0.985647 * fraction;
    let lst = 100.46 + drift + longitude + 15. * ut_hours(instant);
    Ok(SiderealTime::from_degrees(lst))
}

/// Parse a timezone-aware timestamp into UTC.
///
/// Accepts RFC 3339 (`2021-06-04T21:30:00Z`) and `2021-06-04 21:30:00 +0200`.
/// Timestamps without an offset are rejected, their meaning depends on the machine's zone.
pub fn parse_utc_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f %:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(s, format).is_ok());
    if naive {
        Err(SkyMapError::InvalidInput(format!(
            "timestamp `{s}` has no UTC offset"
        )))
    } else {
        Err(SkyMapError::InvalidInput(format!(
            "malformed timestamp `{s}`"
        )))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    use super::*;

    #[test]
    fn julian_dates() {
        assert_abs_diff_eq!(julian_date(j2000()), J2000_JD, epsilon = 1e-9);

        let date = Utc.with_ymd_and_hms(1995, 10, 1, 9, 0, 0).unwrap();
        assert_abs_diff_eq!(julian_date(date), 2_449_991.875, epsilon = 1e-9);
        assert_abs_diff_eq!(
            days_since_j2000(date),
            julian_date(date) - J2000_JD,
            epsilon = 1e-6
        );
    }

    #[test]
    fn at_j2000() {
        // J2000.0 is noon, so d vanishes but 15 * UT adds 180 degrees. The often quoted 100.46 at
        // J2000.0 is only the constant term; the full formula gives 280.46.
        let lst = local_sidereal_time(j2000(), 0.).unwrap();
        assert_abs_diff_eq!(lst.degrees() - 15. * ut_hours(j2000()), 100.46, epsilon = 1e-9);
        assert_abs_diff_eq!(lst.degrees(), 280.46, epsilon = 1e-9);
    }

    #[test]
    fn birmingham() {
        // 1998-08-10 23:10 UT at 1°55' W
        let instant = Utc.with_ymd_and_hms(1998, 8, 10, 23, 10, 0).unwrap();
        let lst = local_sidereal_time(instant, -1.9166667).unwrap();
        assert_abs_diff_eq!(days_since_j2000(instant), -508.534722, epsilon = 1e-6);
        assert_abs_diff_eq!(lst.degrees(), 304.80762, epsilon = 1e-3);
    }

    #[test]
    fn longitude_offset() {
        let instant = Utc.with_ymd_and_hms(2021, 6, 4, 21, 30, 0).unwrap();
        let greenwich = local_sidereal_time(instant, 0.).unwrap();
        let new_york = local_sidereal_time(instant, -74.).unwrap();
        let diff = (greenwich.degrees() - new_york.degrees()).rem_euclid(360.);
        assert_abs_diff_eq!(diff, 74., epsilon = 1e-9);
    }

    #[test]
    fn normalized_over_centuries() {
        let mut rng = rand::rng();

        for _ in 0..500 {
            let seconds = rng.random_range(-20_000_000_000i64..20_000_000_000);
            let instant = DateTime::from_timestamp(seconds, 0).unwrap();
            let longitude = rng.random_range(-180.0..=180.0);
            let lst = local_sidereal_time(instant, longitude).unwrap();
            assert!((0. ..360.).contains(&lst.degrees()), "{lst}");
        }
    }

    #[test]
    fn stable_far_from_epoch() {
        // 1000 Julian years after J2000.0, still at 12:00 UT
        let instant = j2000() + TimeDelta::days(365_250);
        let lst = local_sidereal_time(instant, 0.).unwrap();
        let expected = (280.46 + (0.985647f64 * 365_250.).rem_euclid(360.)).rem_euclid(360.);
        assert_abs_diff_eq!(lst.degrees(), expected, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_longitude() {
        assert!(matches!(
            local_sidereal_time(j2000(), 200.),
            Err(SkyMapError::InvalidInput(_))
        ));
        assert!(local_sidereal_time(j2000(), f64::NAN).is_err());
    }

    #[test]
    fn parsing() {
        let expected = Utc.with_ymd_and_hms(2021, 6, 4, 19, 30, 0).unwrap();
        assert_eq!(parse_utc_instant("2021-06-04T19:30:00Z").unwrap(), expected);
        assert_eq!(
            parse_utc_instant("2021-06-04T21:30:00+02:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_utc_instant("2021-06-04 21:30:00 +0200").unwrap(),
            expected
        );

        let naive = parse_utc_instant("2021-06-04 21:30:00.123456");
        assert!(matches!(naive, Err(SkyMapError::InvalidInput(msg)) if msg.contains("offset")));
        let garbage = parse_utc_instant("yesterday");
        assert!(matches!(garbage, Err(SkyMapError::InvalidInput(msg)) if msg.contains("malformed")));
    }

    #[test]
    fn sidereal_units() {
        let lst = SiderealTime::from_degrees(-90.);
        assert_eq!(lst.degrees(), 270.);
        assert_abs_diff_eq!(lst.hours(), 18.);
        assert_abs_diff_eq!(lst.radians(), 1.5 * std::f64::consts::PI);
        assert_eq!(SiderealTime::from_degrees(720.).degrees(), 0.);
    }
}
