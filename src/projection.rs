//! Projection of horizontal coordinates onto a polar sky chart.
//!
//! The chart is centered on the zenith with north at the top and azimuth increasing clockwise.
//! The radius is the zenith distance `|π/2 - alt|`, so the horizon lies at `π/2`.

use chrono::{DateTime, Utc};
use nalgebra::Vector2;
use ndarray::Array1;

use crate::transform::HorizontalTrajectory;
use crate::visibility::HorizontalPoint;
use crate::Float;

/// A position on the polar chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint<F: Float> {
    /// Polar angle, equal to the azimuth.
    pub theta: F,
    /// Zenith distance.
    pub radius: F,
}

impl<F: Float> PolarPoint<F> {
    /// Radius in degrees, i.e. `90° - altitude`.
    pub fn radius_degrees(&self) -> F {
        self.radius * nalgebra::convert::<f64, F>(180. / std::f64::consts::PI)
    }

    /// Cartesian position with north along `+y` and east along `+x`.
    pub fn to_cartesian(&self) -> Vector2<F> {
        Vector2::new(self.radius * self.theta.sin(), self.radius * self.theta.cos())
    }
}

/// A projected line.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarTrace<F: Float> {
    /// Polar angles.
    pub theta: Array1<F>,
    /// Zenith distances.
    pub radius: Array1<F>,
}

impl<F: Float> PolarTrace<F> {
    /// Cartesian positions, see [`PolarPoint::to_cartesian`].
    pub fn to_cartesian(&self) -> Vec<Vector2<F>> {
        self.theta
            .iter()
            .zip(&self.radius)
            .map(|(&theta, &radius)| PolarPoint { theta, radius }.to_cartesian())
            .collect()
    }
}

fn zenith_distance<F: Float>(altitude: F) -> F {
    (F::frac_pi_2() - altitude).abs()
}

/// Project a single position.
pub fn project_point<F: Float>(point: HorizontalPoint<F>) -> PolarPoint<F> {
    PolarPoint {
        theta: point.azimuth,
        radius: zenith_distance(point.altitude),
    }
}

/// Project a whole trajectory.
pub fn project_trace<F: Float>(trajectory: &HorizontalTrajectory<F>) -> PolarTrace<F> {
    PolarTrace {
        theta: trajectory.azimuth.clone(),
        radius: trajectory.altitude.mapv(zenith_distance),
    }
}

/// A body as it is handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartBody<F: Float> {
    /// Body identifier of the ephemeris provider.
    pub id: String,
    /// Legend label.
    pub name: String,
    /// Plot color, a matplotlib/CSS color name.
    pub color: String,
    /// Marker at the current sample, if the body is above the horizon.
    pub point: Option<PolarPoint<F>>,
    /// Lines to draw, may be empty.
    pub traces: Vec<PolarTrace<F>>,
}

/// Everything a renderer needs to draw the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyChart<F: Float> {
    /// Multi-line title.
    pub title: String,
    /// Explanation shown below the chart.
    pub caption: String,
    /// Outer radius of the chart, the horizon.
    pub radial_limit: F,
    /// Radial grid lines and their altitude labels.
    pub radial_ticks: Vec<(F, String)>,
    /// Bodies in catalog order.
    pub bodies: Vec<ChartBody<F>>,
}

impl<F: Float> SkyChart<F> {
    /// Create an empty chart with the default axes.
    pub fn new(title: String, caption: String) -> Self {
        let ticks = [(30., "60°"), (60., "30°"), (90., "0°")]
            .into_iter()
            .map(|(radius, label)| {
                let radius = nalgebra::convert::<f64, F>(f64::to_radians(radius));
                (radius, label.to_owned())
            })
            .collect();
        Self {
            title,
            caption,
            radial_limit: F::frac_pi_2(),
            radial_ticks: ticks,
            bodies: Vec::new(),
        }
    }
}

/// Title naming the place and the instant shown.
pub fn chart_title(place: &str, instant: DateTime<Utc>) -> String {
    format!(
        "The sky above {place} on {}\nNorth at 0° Azimuth\nHorizon at 0° Altitude",
        instant.format("%Y-%b-%d %H:%M UTC")
    )
}

/// Caption explaining markers and lines.
pub fn chart_caption(step_days: i64, span_days: i64) -> String {
    format!(
        "The dots represent each object's location at the time above.\n\
         The lines they trace represent objects' locations at this time of day, \
         every {step_days} days, during the {} days starting {span_days} days ago.",
        2 * span_days
    )
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;
    use ndarray::array;

    use super::*;

    #[test]
    fn zenith_and_horizon() {
        let zenith = project_point(HorizontalPoint {
            altitude: FRAC_PI_2,
            azimuth: 1.,
        });
        assert_abs_diff_eq!(zenith.radius, 0.);

        let horizon = project_point(HorizontalPoint {
            altitude: 0.,
            azimuth: PI,
        });
        assert_abs_diff_eq!(horizon.radius, FRAC_PI_2);
        assert_abs_diff_eq!(horizon.radius_degrees(), 90.);
        assert_eq!(horizon.theta, PI);
    }

    #[test]
    fn compass_orientation() {
        let at = |azimuth: f64| {
            project_point(HorizontalPoint {
                altitude: FRAC_PI_4,
                azimuth,
            })
            .to_cartesian()
        };
        let r = FRAC_PI_4;

        assert_abs_diff_eq!(at(0.), Vector2::new(0., r), epsilon = 1e-12);
        assert_abs_diff_eq!(at(FRAC_PI_2), Vector2::new(r, 0.), epsilon = 1e-12);
        assert_abs_diff_eq!(at(PI), Vector2::new(0., -r), epsilon = 1e-12);
    }

    #[test]
    fn trace() {
        let trajectory = HorizontalTrajectory {
            altitude: array![FRAC_PI_2, FRAC_PI_4, 0., -0.2],
            azimuth: array![0., 1., 2., 3.],
        };
        let trace = project_trace(&trajectory);

        assert_eq!(trace.theta, trajectory.azimuth);
        assert_abs_diff_eq!(
            trace.radius,
            array![0., FRAC_PI_4, FRAC_PI_2, FRAC_PI_2 + 0.2],
            epsilon = 1e-12
        );
        assert_eq!(trace.to_cartesian().len(), 4);
    }

    #[test]
    fn axes_and_labels() {
        let instant = Utc.with_ymd_and_hms(2021, 6, 4, 21, 30, 0).unwrap();
        let chart = SkyChart::<f64>::new(chart_title("Paris, France", instant), chart_caption(10, 370));

        assert!(chart.title.starts_with("The sky above Paris, France on 2021-Jun-04 21:30 UTC\n"));
        assert!(chart.caption.contains("every 10 days, during the 740 days starting 370 days ago"));
        assert_eq!(chart.radial_limit, FRAC_PI_2);
        assert_eq!(chart.radial_ticks.len(), 3);
        assert_abs_diff_eq!(chart.radial_ticks[0].0, PI / 6.);
        assert_eq!(chart.radial_ticks[2].1, "0°");
    }
}
