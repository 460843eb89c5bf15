//! Ephemerides of right ascension and declination, and the provider boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ndarray::Array1;

use crate::error::{Result, SkyMapError};
use crate::timeframe::Timeframe;

/// Time series of equatorial coordinates of one body, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyEphemeris {
    body_id: String,
    display_name: String,
    timestamps: Vec<DateTime<Utc>>,
    ra: Array1<f64>,
    dec: Array1<f64>,
}

impl BodyEphemeris {
    /// Create an ephemeris.
    ///
    /// All sequences must have the same length and the timestamps must be strictly increasing.
    pub fn new(
        body_id: impl Into<String>,
        display_name: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        ra: Array1<f64>,
        dec: Array1<f64>,
    ) -> Result<Self> {
        let body_id = body_id.into();
        if timestamps.len() != ra.len() || ra.len() != dec.len() {
            return Err(SkyMapError::InvalidInput(format!(
                "ephemeris of `{body_id}` has {} timestamps, {} RA and {} Dec values",
                timestamps.len(),
                ra.len(),
                dec.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SkyMapError::InvalidInput(format!(
                "timestamps of `{body_id}` are not increasing"
            )));
        }
        Ok(Self {
            body_id,
            display_name: display_name.into(),
            timestamps,
            ra,
            dec,
        })
    }

    /// Identifier used by the provider.
    pub fn body_id(&self) -> &str {
        &self.body_id
    }

    /// Name reported by the provider.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Sample timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Right ascension in degrees.
    pub fn ra(&self) -> &Array1<f64> {
        &self.ra
    }

    /// Declination in degrees.
    pub fn dec(&self) -> &Array1<f64> {
        &self.dec
    }

    /// Right ascension in radians.
    pub fn ra_radians(&self) -> Array1<f64> {
        self.ra.mapv(f64::to_radians)
    }

    /// Declination in radians.
    pub fn dec_radians(&self) -> Array1<f64> {
        self.dec.mapv(f64::to_radians)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Source of ephemerides, e.g. a JPL Horizons client.
pub trait EphemerisProvider {
    /// Geocentric RA/Dec of `body_id` sampled over `timeframe`.
    ///
    /// Returns [`SkyMapError::DataUnavailable`] if there is no data for the body.
    fn ephemeris(&self, body_id: &str, timeframe: &Timeframe) -> Result<BodyEphemeris>;
}

/// Ephemerides fetched ahead of time, keyed by body id.
#[derive(Clone, Debug, Default)]
pub struct StaticEphemeris {
    ephemerides: HashMap<String, BodyEphemeris>,
}

impl StaticEphemeris {
    /// An empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an ephemeris.
    pub fn insert(&mut self, ephemeris: BodyEphemeris) {
        self.ephemerides
            .insert(ephemeris.body_id().to_owned(), ephemeris);
    }

    /// Add an ephemeris, builder style.
    pub fn with(mut self, ephemeris: BodyEphemeris) -> Self {
        self.insert(ephemeris);
        self
    }
}

impl EphemerisProvider for StaticEphemeris {
    fn ephemeris(&self, body_id: &str, _timeframe: &Timeframe) -> Result<BodyEphemeris> {
        self.ephemerides
            .get(body_id)
            .cloned()
            .ok_or_else(|| SkyMapError::DataUnavailable(body_id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone};
    use ndarray::array;

    use super::*;
    use crate::timeframe::TimeframeBuilder;

    fn times(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| start + TimeDelta::days(10 * i as i64)).collect()
    }

    #[test]
    fn validation() {
        let ok = BodyEphemeris::new("499", "Mars (499)", times(2), array![10., 20.], array![1., 2.]);
        assert!(ok.is_ok());

        let short = BodyEphemeris::new("499", "Mars (499)", times(3), array![10., 20.], array![1., 2.]);
        assert!(matches!(short, Err(SkyMapError::InvalidInput(_))));

        let mut reversed = times(2);
        reversed.reverse();
        let unordered = BodyEphemeris::new("499", "Mars (499)", reversed, array![10., 20.], array![1., 2.]);
        assert!(matches!(unordered, Err(SkyMapError::InvalidInput(_))));
    }

    #[test]
    fn radians() {
        let eph = BodyEphemeris::new("301", "Moon", times(2), array![180., 90.], array![-90., 45.]).unwrap();
        assert_abs_diff_eq!(eph.ra_radians(), array![PI, FRAC_PI_2], epsilon = 1e-12);
        assert_abs_diff_eq!(eph.dec_radians()[0], -FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(eph.len(), 2);
    }

    #[test]
    fn static_provider() {
        let timeframe = TimeframeBuilder::new(Utc::now()).build().unwrap();
        let eph = BodyEphemeris::new("301", "Moon", times(1), array![1.], array![2.]).unwrap();
        let provider = StaticEphemeris::new().with(eph.clone());

        assert_eq!(provider.ephemeris("301", &timeframe).unwrap(), eph);
        assert_eq!(
            provider.ephemeris("999", &timeframe),
            Err(SkyMapError::DataUnavailable("999".into()))
        );
    }
}
