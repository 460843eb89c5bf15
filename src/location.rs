//! Observer location and the geocoding boundary.

use std::fmt::{self, Display};

use crate::error::{Result, SkyMapError};

/// Geographic position of the observer in degrees.
///
/// Latitude is positive north, longitude positive east.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverLocation {
    latitude: f64,
    longitude: f64,
}

impl ObserverLocation {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(SkyMapError::InvalidInput(format!(
                "latitude {latitude} outside of [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(SkyMapError::InvalidInput(format!(
                "longitude {longitude} outside of [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Display for ObserverLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0. { 'S' } else { 'N' };
        let ew = if self.longitude < 0. { 'W' } else { 'E' };
        write!(
            f,
            "{:.4}°{ns} {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}

/// A resolved place as returned by a [`Geocoder`].
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    /// Human readable name, used in chart titles.
    pub display_name: String,
    /// Coordinates of the place.
    pub location: ObserverLocation,
}

/// Turns free text into a place, e.g. a Nominatim client.
pub trait Geocoder {
    /// Look up `query`. Returns `None` if nothing matches.
    fn geocode(&self, query: &str) -> Option<Place>;
}

/// Resolve a free-text place once.
///
/// Re-prompting on failure is up to the caller.
pub fn resolve_location<G: Geocoder + ?Sized>(geocoder: &G, query: &str) -> Result<Place> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SkyMapError::InvalidInput("empty location query".into()));
    }
    geocoder
        .geocode(query)
        .ok_or_else(|| SkyMapError::LocationNotFound(query.to_owned()))
}
