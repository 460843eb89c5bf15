#![warn(missing_docs)]

//! Horizontal-coordinate trajectories of solar system bodies for polar sky charts. \
//! Given an observer and the current time, this crate converts ephemerides of right ascension and
//! declination over a window around "now" into altitude and azimuth, selects the bodies that are
//! currently above the horizon, and projects them onto a north-up polar chart.
//! Geocoding, ephemeris retrieval and drawing are left to the caller through small traits.
//!
//! ## Interface
//! The central struct of this library is [`SkyMap`]. It is created for an [`ObserverLocation`] and
//! an instant, and additional parameters are set via `SkyMap::with_*()` functions.
//!
//! Example:
//! ```rust,ignore
//! let report = SkyMap::new(location, Utc::now())
//!     .with_place_name("New York")
//!     .with_sidereal_mode(SiderealMode::PerSample)
//!     .with_trace_policy(TracePolicy::Always)
//!     .compute(&horizons)?;
//! let chart = report.chart();
//! ```
//!
//! The building blocks are public as well:
//! - [`TimeframeBuilder`] derives the sampling window and the index of the current sample.
//! - [`local_sidereal_time`] computes the local sidereal time of an instant.
//! - [`transform`] converts equatorial to horizontal coordinates.
//! - [`visibility`] decides what is drawn.
//! - [`projection`] maps altitude and azimuth onto the chart.
//!
//! ## Parameters
//! - `span_days`/`step_days`: The window is `now ± span` sampled every `step`. Defaults to 370 and 10 days.
//! - `sidereal_mode`: Whether one sidereal time computed for "now" is reused for every sample
//!     ([`SiderealMode::Fixed`]) or recomputed for each sample timestamp ([`SiderealMode::PerSample`]).
//! - `trace_policy`: Which parts of a body's trajectory are drawn, see [`TracePolicy`].
//!
//! With the `parallel` feature, [`SkyMap::compute_par()`] and [`transform::to_horizontal_par()`]
//! spread the work over a thread pool with identical results.

pub mod catalog;
pub mod ephemeris;
pub mod error;
pub mod location;
pub mod projection;
pub mod sidereal;
pub(crate) mod skymap;
pub mod timeframe;
pub mod transform;
pub mod visibility;

pub use catalog::{BodyCatalog, BodyInfo};
pub use ephemeris::{BodyEphemeris, EphemerisProvider, StaticEphemeris};
pub use error::{Result, SkyMapError};
pub use location::{resolve_location, Geocoder, ObserverLocation, Place};
pub use projection::{ChartBody, PolarPoint, PolarTrace, SkyChart};
pub use sidereal::{local_sidereal_time, parse_utc_instant, SiderealTime};
pub use skymap::{BodyTrajectory, BodyWarning, SiderealMode, SkyMap, SkyMapOptions, SkyMapReport};
pub use timeframe::{Timeframe, TimeframeBuilder};
pub use transform::HorizontalTrajectory;
pub use visibility::{HorizontalPoint, TracePolicy};

/// A generic float trait such that the coordinate pipeline is generic over `f32`/`f64`.
///
/// This trait is automatically implemented for all types implementing the supertraits.
/// Particularly, this includes `f32` and `f64`.
/// [`num_traits::Float`] is not a supertrait as the need to specify the provider of the redundant definitions of the basic math functions would clutter the code.
pub trait Float: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}

impl<F> Float for F where F: Copy + Default + nalgebra::RealField + num_traits::FromPrimitive {}
