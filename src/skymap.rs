//! Pipeline orchestration and main interface.

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::catalog::{BodyCatalog, BodyInfo};
use crate::ephemeris::EphemerisProvider;
use crate::error::{Result, SkyMapError};
use crate::location::{ObserverLocation, Place};
use crate::projection::{chart_caption, chart_title, project_point, project_trace, ChartBody, SkyChart};
use crate::sidereal::{local_sidereal_time, SiderealTime};
use crate::timeframe::{Timeframe, TimeframeBuilder};
use crate::transform::{self, HorizontalTrajectory};
use crate::visibility::{self, TracePolicy};

/// How sidereal time enters the conversion of a trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiderealMode {
    /// One sidereal time, computed for "now", for every sample.
    /// Exact at the current sample only; the trace then shows the body's positions
    /// at the same sidereal time of day rather than at the sample timestamps.
    #[default]
    Fixed,
    /// Sidereal time recomputed for each sample timestamp.
    PerSample,
}

/// Tunable parameters of a [`SkyMap`], loadable from JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyMapOptions {
    /// Lookback and lookahead in days.
    pub span_days: i64,
    /// Sampling step in days.
    pub step_days: i64,
    /// See [`SiderealMode`].
    pub sidereal_mode: SiderealMode,
    /// See [`TracePolicy`].
    pub trace_policy: TracePolicy,
}

impl Default for SkyMapOptions {
    fn default() -> Self {
        Self {
            span_days: 370,
            step_days: 10,
            sidereal_mode: SiderealMode::default(),
            trace_policy: TracePolicy::default(),
        }
    }
}

/// The horizontal trajectory of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyTrajectory {
    /// Body identifier of the ephemeris provider.
    pub id: String,
    /// Catalog properties.
    pub info: BodyInfo,
    /// Sample timestamps from the ephemeris.
    pub timestamps: Vec<DateTime<Utc>>,
    /// Altitude and azimuth in radians.
    pub trajectory: HorizontalTrajectory<f64>,
}

/// A body that was skipped, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyWarning {
    /// Body identifier of the ephemeris provider.
    pub body_id: String,
    /// The reason.
    pub error: SkyMapError,
}

/// Result of [`SkyMap::compute`].
#[derive(Clone, Debug, PartialEq)]
pub struct SkyMapReport {
    /// Name shown in the chart title.
    pub place_name: String,
    /// Observer.
    pub location: ObserverLocation,
    /// Sampling window.
    pub timeframe: Timeframe,
    /// Local sidereal time at "now".
    pub sidereal_time: SiderealTime,
    /// Index of the sample nearest to "now".
    pub current_index: usize,
    /// Drawing policy carried over from the options.
    pub trace_policy: TracePolicy,
    /// Trajectories in catalog order.
    pub bodies: Vec<BodyTrajectory>,
    /// Bodies that were skipped.
    pub warnings: Vec<BodyWarning>,
}

impl SkyMapReport {
    /// Bodies above the horizon at the current sample.
    pub fn visible(&self) -> impl Iterator<Item = &BodyTrajectory> {
        self.bodies
            .iter()
            .filter(|b| visibility::is_above_horizon(&b.trajectory, self.current_index))
    }

    /// The data handed to the renderer.
    pub fn chart(&self) -> SkyChart<f64> {
        let instant = self
            .timeframe
            .sample_time(self.current_index)
            .unwrap_or(self.timeframe.now());
        let step_days = self.timeframe.step().num_days();
        let span_days = (self.timeframe.now() - self.timeframe.start()).num_days();
        let mut chart = SkyChart::new(
            chart_title(&self.place_name, instant),
            chart_caption(step_days, span_days),
        );

        for body in &self.bodies {
            let point = visibility::current_point(&body.trajectory, self.current_index).map(project_point);
            let traces: Vec<_> =
                visibility::select_trace(&body.trajectory, self.current_index, self.trace_policy)
                    .iter()
                    .map(project_trace)
                    .collect();
            if point.is_none() && traces.is_empty() {
                continue;
            }
            chart.bodies.push(ChartBody {
                id: body.id.clone(),
                name: body.info.name.clone(),
                color: body.info.color.clone(),
                point,
                traces,
            });
        }
        chart
    }
}

/// The central struct of this library.
///
/// Use this in order to set up a sky map for an observer and an instant.
/// For more details, check the crate-level documentation.
#[derive(Clone, Debug)]
pub struct SkyMap {
    location: ObserverLocation,
    now: DateTime<Utc>,
    place_name: Option<String>,
    catalog: BodyCatalog,
    options: SkyMapOptions,
}

impl SkyMap {
    /// Create a new instance using default options and the solar system catalog.
    pub fn new(location: ObserverLocation, now: DateTime<Utc>) -> Self {
        Self {
            location,
            now,
            place_name: None,
            catalog: BodyCatalog::solar_system(),
            options: SkyMapOptions::default(),
        }
    }

    /// Create a new instance for a geocoded place.
    pub fn from_place(place: Place, now: DateTime<Utc>) -> Self {
        Self::new(place.location, now).with_place_name(place.display_name)
    }

    /// Set the name shown in the chart title. Defaults to the coordinates.
    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = Some(name.into());
        self
    }

    /// Set the bodies to query.
    pub fn with_catalog(mut self, catalog: BodyCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set all options at once.
    pub fn with_options(mut self, options: SkyMapOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the lookback and lookahead in days.
    pub fn with_span_days(mut self, days: i64) -> Self {
        self.options.span_days = days;
        self
    }

    /// Set the sampling step in days.
    pub fn with_step_days(mut self, days: i64) -> Self {
        self.options.step_days = days;
        self
    }

    /// Set how sidereal time is applied.
    pub fn with_sidereal_mode(mut self, mode: SiderealMode) -> Self {
        self.options.sidereal_mode = mode;
        self
    }

    /// Set which traces are drawn.
    pub fn with_trace_policy(mut self, policy: TracePolicy) -> Self {
        self.options.trace_policy = policy;
        self
    }

    fn timeframe(&self) -> Result<Timeframe> {
        let days = |d: i64| {
            TimeDelta::try_days(d)
                .ok_or_else(|| SkyMapError::Configuration(format!("{d} days out of range")))
        };
        TimeframeBuilder::new(self.now)
            .with_span(days(self.options.span_days)?)
            .with_step(days(self.options.step_days)?)
            .build()
    }

    fn place_name(&self) -> String {
        self.place_name
            .clone()
            .unwrap_or_else(|| self.location.to_string())
    }

    /// Convert the ephemeris of one body.
    fn body_trajectory<P: EphemerisProvider + ?Sized>(
        &self,
        provider: &P,
        timeframe: &Timeframe,
        lst: SiderealTime,
        id: &str,
        info: &BodyInfo,
    ) -> Result<BodyTrajectory> {
        let ephemeris = provider.ephemeris(id, timeframe)?;
        if ephemeris.len() != timeframe.sample_count() {
            return Err(SkyMapError::InvalidInput(format!(
                "expected {} samples, got {}",
                timeframe.sample_count(),
                ephemeris.len()
            )));
        }
        debug!(
            "Converting {} samples of {} ({}).",
            ephemeris.len(),
            info.name,
            ephemeris.display_name()
        );

        let ra = ephemeris.ra_radians();
        let dec = ephemeris.dec_radians();
        let latitude = self.location.latitude().to_radians();
        let trajectory = match self.options.sidereal_mode {
            SiderealMode::Fixed => transform::to_horizontal(ra.view(), dec.view(), latitude, lst.radians())?,
            SiderealMode::PerSample => {
                let lsts = ephemeris
                    .timestamps()
                    .iter()
                    .map(|t| local_sidereal_time(*t, self.location.longitude()).map(SiderealTime::radians))
                    .collect::<Result<Array1<f64>>>()?;
                transform::to_horizontal_per_sample(ra.view(), dec.view(), latitude, lsts.view())?
            }
        };

        Ok(BodyTrajectory {
            id: id.to_owned(),
            info: info.clone(),
            timestamps: ephemeris.timestamps().to_vec(),
            trajectory,
        })
    }

    fn prepare(&self) -> Result<(Timeframe, SiderealTime)> {
        let timeframe = self.timeframe()?;
        info!("Computing sidereal time.");
        let lst = local_sidereal_time(self.now, self.location.longitude())?;
        debug!("Local sidereal time at {} is {}.", self.now, lst);
        Ok((timeframe, lst))
    }

    fn report(
        &self,
        timeframe: Timeframe,
        sidereal_time: SiderealTime,
        results: Vec<(String, Result<BodyTrajectory>)>,
    ) -> SkyMapReport {
        let mut bodies = Vec::new();
        let mut warnings = Vec::new();
        for (body_id, result) in results {
            match result {
                Ok(body) => bodies.push(body),
                Err(error) => {
                    warn!("Skipping `{body_id}`: {error}");
                    warnings.push(BodyWarning { body_id, error });
                }
            }
        }

        let report = SkyMapReport {
            place_name: self.place_name(),
            location: self.location,
            timeframe,
            sidereal_time,
            current_index: timeframe.current_index(),
            trace_policy: self.options.trace_policy,
            bodies,
            warnings,
        };
        info!(
            "Computed {} trajectories, {} above the horizon, {} skipped.",
            report.bodies.len(),
            report.visible().count(),
            report.warnings.len()
        );
        report
    }

    /// Fetch and convert the trajectories of all catalog bodies.
    ///
    /// # Returns
    /// Fails if the timeframe or sidereal time cannot be computed.
    /// Bodies without data or with unusable data are reported in [`SkyMapReport::warnings`].
    pub fn compute<P: EphemerisProvider + ?Sized>(&self, provider: &P) -> Result<SkyMapReport> {
        let (timeframe, lst) = self.prepare()?;

        info!("Fetching ephemerides for {} bodies.", self.catalog.len());
        let results = self
            .catalog
            .iter()
            .map(|(id, info)| {
                (
                    id.to_owned(),
                    self.body_trajectory(provider, &timeframe, lst, id, info),
                )
            })
            .collect();

        Ok(self.report(timeframe, lst, results))
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use itertools::Itertools;
    use rayon::prelude::*;

    use super::*;

    impl SkyMap {
        /// Fetch and convert the trajectories of all catalog bodies, one body per task.
        ///
        /// Also see [`compute`](SkyMap::compute()) for more details. The result is identical.
        pub fn compute_par<P: EphemerisProvider + Sync + ?Sized>(
            &self,
            provider: &P,
        ) -> Result<SkyMapReport> {
            let (timeframe, lst) = self.prepare()?;

            info!("Fetching ephemerides for {} bodies.", self.catalog.len());
            let entries = self.catalog.iter().collect_vec();
            let results = entries
                .par_iter()
                .map(|(id, info)| {
                    (
                        (*id).to_owned(),
                        self.body_trajectory(provider, &timeframe, lst, id, info),
                    )
                })
                .collect();

            Ok(self.report(timeframe, lst, results))
        }
    }
}
