//! Error taxonomy shared by the whole pipeline.

/// Everything that can go wrong while building a sky map.
///
/// Errors in shared inputs ([`InvalidInput`](SkyMapError::InvalidInput),
/// [`Configuration`](SkyMapError::Configuration)) abort a computation.
/// [`DataUnavailable`](SkyMapError::DataUnavailable) and
/// [`NumericDomain`](SkyMapError::NumericDomain) only concern one body and are
/// collected as warnings by [`SkyMap`](crate::SkyMap).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SkyMapError {
    /// Malformed or ambiguous time or location input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A trigonometric argument outside of its domain that is not an expected degeneracy.
    #[error("numeric domain error at sample {index}: argument {value}")]
    NumericDomain {
        /// Sample index of the offending value.
        index: usize,
        /// The offending argument.
        value: f64,
    },

    /// The timeframe parameters yield no samples.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The ephemeris provider has no data for a body.
    #[error("no ephemeris data for `{0}`")]
    DataUnavailable(String),

    /// The geocoder could not resolve a place.
    #[error("location `{0}` not found")]
    LocationNotFound(String),

    /// The body catalog could not be parsed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl From<serde_json::Error> for SkyMapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Catalog(e.to_string())
    }
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, SkyMapError>;
