//! Equatorial to horizontal coordinate conversion.
//!
//! All angles are in radians. Azimuth is measured from north through east and lies in `[0, 2π)`.
//! Altitude lies in `[-π/2, π/2]`.

use itertools::izip;
use ndarray::{Array1, ArrayView1};

use crate::error::{Result, SkyMapError};
use crate::Float;

/// Altitude and azimuth of one body, index aligned with its ephemeris.
#[derive(Clone, Debug, PartialEq)]
pub struct HorizontalTrajectory<F: Float> {
    /// Altitude above the horizon.
    pub altitude: Array1<F>,
    /// Azimuth from north through east.
    pub azimuth: Array1<F>,
}

impl<F: Float> HorizontalTrajectory<F> {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.altitude.len()
    }

    /// Whether the trajectory has no samples.
    pub fn is_empty(&self) -> bool {
        self.altitude.is_empty()
    }

    /// Altitude in degrees.
    pub fn altitude_degrees(&self) -> Array1<F> {
        let factor = rad_to_deg::<F>();
        self.altitude.mapv(|alt| alt * factor)
    }

    /// Azimuth in degrees.
    pub fn azimuth_degrees(&self) -> Array1<F> {
        let factor = rad_to_deg::<F>();
        self.azimuth.mapv(|az| az * factor)
    }
}

fn rad_to_deg<F: Float>() -> F {
    nalgebra::convert(180. / std::f64::consts::PI)
}

fn as_f64<F: Float>(value: F) -> f64 {
    nalgebra::try_convert::<F, f64>(value).unwrap_or(f64::NAN)
}

/// Wrap an angle into `[0, 2π)`.
pub(crate) fn wrap_two_pi<F: Float>(angle: F) -> F {
    let two_pi = F::two_pi();
    let wrapped = angle - two_pi * (angle / two_pi).floor();
    if wrapped >= two_pi { F::zero() } else { wrapped }
}

/// Rounding slack tolerated on `asin` arguments before they count as out of domain.
fn domain_tolerance<F: Float>() -> F {
    F::default_epsilon() * nalgebra::convert::<f64, F>(64.)
}

/// Below this, `cos(alt)·cos(lat)` is treated as zero: the body is at zenith or nadir,
/// or the observer stands on a pole.
/// `asin` of the largest value below 1 is about `sqrt(2ε)` short of `π/2`, hence the factor.
fn degenerate_threshold<F: Float>() -> F {
    F::default_epsilon().sqrt() * nalgebra::convert::<f64, F>(4.)
}

fn altitude_of<F: Float>(ha: F, dec: F, sin_lat: F, cos_lat: F) -> std::result::Result<F, F> {
    let arg = dec.sin() * sin_lat + dec.cos() * cos_lat * ha.cos();
    if !arg.is_finite() || arg.abs() > F::one() + domain_tolerance() {
        return Err(arg);
    }
    Ok(clamp_unit(arg).asin())
}

fn azimuth_of<F: Float>(ha: F, dec: F, alt: F, sin_lat: F, cos_lat: F) -> std::result::Result<F, F> {
    let denominator = alt.cos() * cos_lat;
    if !denominator.is_finite() {
        return Err(denominator);
    }
    if denominator.abs() < degenerate_threshold() {
        return Ok(F::zero());
    }
    let arg = (dec.sin() - alt.sin() * sin_lat) / denominator;
    if !arg.is_finite() {
        return Err(arg);
    }
    let a = clamp_unit(arg).acos();
    if ha.sin() < F::zero() {
        Ok(a)
    } else {
        Ok(wrap_two_pi(F::two_pi() - a))
    }
}

fn clamp_unit<F: Float>(x: F) -> F {
    if x > F::one() {
        F::one()
    } else if x < -F::one() {
        -F::one()
    } else {
        x
    }
}

fn check_lengths(lengths: &[usize]) -> Result<()> {
    if lengths.windows(2).any(|w| w[0] != w[1]) {
        return Err(SkyMapError::InvalidInput(format!(
            "sequences of unequal length: {lengths:?}"
        )));
    }
    Ok(())
}

fn domain_error<F: Float>(index: usize, value: F) -> SkyMapError {
    SkyMapError::NumericDomain {
        index,
        value: as_f64(value),
    }
}

/// Hour angle `LST - RA` of every sample for a single sidereal time, wrapped into `[0, 2π)`.
pub fn hour_angle<F: Float>(lst: F, ra: ArrayView1<F>) -> Array1<F> {
    ra.mapv(|ra| wrap_two_pi(lst - ra))
}

/// Hour angle `LST - RA` with one sidereal time per sample, wrapped into `[0, 2π)`.
pub fn hour_angle_per_sample<F: Float>(lst: ArrayView1<F>, ra: ArrayView1<F>) -> Result<Array1<F>> {
    check_lengths(&[lst.len(), ra.len()])?;
    Ok(izip!(lst.iter(), ra.iter())
        .map(|(&lst, &ra)| wrap_two_pi(lst - ra))
        .collect())
}

/// Altitude of every sample given hour angles, declinations and the observer's latitude.
///
/// Fails with [`SkyMapError::NumericDomain`] on non-finite input.
pub fn altitude<F: Float>(ha: ArrayView1<F>, dec: ArrayView1<F>, latitude: F) -> Result<Array1<F>> {
    check_lengths(&[ha.len(), dec.len()])?;
    let (sin_lat, cos_lat) = (latitude.sin(), latitude.cos());
    izip!(ha.iter(), dec.iter())
        .enumerate()
        .map(|(i, (&ha, &dec))| altitude_of(ha, dec, sin_lat, cos_lat).map_err(|v| domain_error(i, v)))
        .collect()
}

/// Azimuth of every sample.
///
/// The quadrant of `acos` is resolved per sample by the sign of `sin(HA)`:
/// east of the meridian (`sin(HA) < 0`) the azimuth is `A`, otherwise `2π - A`.
/// Samples at zenith or nadir, and all samples of an observer on a pole, get azimuth 0.
pub fn azimuth<F: Float>(
    ha: ArrayView1<F>,
    dec: ArrayView1<F>,
    alt: ArrayView1<F>,
    latitude: F,
) -> Result<Array1<F>> {
    check_lengths(&[ha.len(), dec.len(), alt.len()])?;
    let (sin_lat, cos_lat) = (latitude.sin(), latitude.cos());
    izip!(ha.iter(), dec.iter(), alt.iter())
        .enumerate()
        .map(|(i, (&ha, &dec, &alt))| {
            azimuth_of(ha, dec, alt, sin_lat, cos_lat).map_err(|v| domain_error(i, v))
        })
        .collect()
}

fn horizontal_from_hour_angle<F: Float>(
    ha: ArrayView1<F>,
    dec: ArrayView1<F>,
    latitude: F,
) -> Result<HorizontalTrajectory<F>> {
    let altitude = altitude(ha, dec, latitude)?;
    let azimuth = azimuth(ha, dec, altitude.view(), latitude)?;
    Ok(HorizontalTrajectory { altitude, azimuth })
}

/// Convert a trajectory from `(RA, Dec)` to `(Alt, Az)` with one sidereal time for all samples.
///
/// # Arguments
/// - `ra`, `dec`: Equatorial coordinates, same length.
/// - `latitude`: Observer latitude.
/// - `lst`: Local sidereal time.
pub fn to_horizontal<F: Float>(
    ra: ArrayView1<F>,
    dec: ArrayView1<F>,
    latitude: F,
    lst: F,
) -> Result<HorizontalTrajectory<F>> {
    check_lengths(&[ra.len(), dec.len()])?;
    let ha = hour_angle(lst, ra);
    horizontal_from_hour_angle(ha.view(), dec, latitude)
}

/// Convert a trajectory from `(RA, Dec)` to `(Alt, Az)` with a sidereal time for each sample.
pub fn to_horizontal_per_sample<F: Float>(
    ra: ArrayView1<F>,
    dec: ArrayView1<F>,
    latitude: F,
    lst: ArrayView1<F>,
) -> Result<HorizontalTrajectory<F>> {
    check_lengths(&[ra.len(), dec.len(), lst.len()])?;
    let ha = hour_angle_per_sample(lst, ra)?;
    horizontal_from_hour_angle(ha.view(), dec, latitude)
}

#[cfg(feature = "parallel")]
pub use parallel::*;

#[cfg(feature = "parallel")]
mod parallel {
    use ndarray::Zip;

    use super::*;

    /// Convert a trajectory from `(RA, Dec)` to `(Alt, Az)` in parallel over the samples.
    ///
    /// Also see [`to_horizontal`] for more details.
    pub fn to_horizontal_par<F: Float>(
        ra: ArrayView1<F>,
        dec: ArrayView1<F>,
        latitude: F,
        lst: F,
    ) -> Result<HorizontalTrajectory<F>> {
        check_lengths(&[ra.len(), dec.len()])?;
        let (sin_lat, cos_lat) = (latitude.sin(), latitude.cos());

        let samples = Zip::from(ra).and(dec).par_map_collect(
            |&ra, &dec| -> std::result::Result<(F, F), F> {
                let ha = wrap_two_pi(lst - ra);
                let alt = altitude_of(ha, dec, sin_lat, cos_lat)?;
                let az = azimuth_of(ha, dec, alt, sin_lat, cos_lat)?;
                Ok((alt, az))
            },
        );

        let mut altitude = Array1::zeros(samples.len());
        let mut azimuth = Array1::zeros(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let (alt, az) = (*sample).map_err(|v| domain_error(i, v))?;
            altitude[i] = alt;
            azimuth[i] = az;
        }
        Ok(HorizontalTrajectory { altitude, azimuth })
    }
}
