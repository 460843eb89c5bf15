//! Selection of what is drawn for a body: its current position and its trace.

use itertools::Itertools;
use ndarray::s;

use crate::transform::HorizontalTrajectory;
use crate::Float;

/// Which parts of a trajectory are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TracePolicy {
    /// The whole trace, but only for bodies above the horizon at the current sample.
    /// Bodies below the horizon right now are left out entirely.
    #[default]
    GatedByCurrent,
    /// The whole trace of every body.
    Always,
    /// Only the runs of samples above the horizon, for every body.
    AboveHorizon,
}

/// A single horizontal position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HorizontalPoint<F: Float> {
    /// Altitude above the horizon.
    pub altitude: F,
    /// Azimuth from north through east.
    pub azimuth: F,
}

/// Whether the body is above the horizon at sample `index`.
///
/// An index past the end of the trajectory counts as not visible.
pub fn is_above_horizon<F: Float>(trajectory: &HorizontalTrajectory<F>, index: usize) -> bool {
    trajectory
        .altitude
        .get(index)
        .is_some_and(|alt| *alt > F::zero())
}

/// Position at sample `index` if the body is above the horizon there.
pub fn current_point<F: Float>(
    trajectory: &HorizontalTrajectory<F>,
    index: usize,
) -> Option<HorizontalPoint<F>> {
    is_above_horizon(trajectory, index).then(|| HorizontalPoint {
        altitude: trajectory.altitude[index],
        azimuth: trajectory.azimuth[index],
    })
}

/// Segments of the trajectory to draw under `policy`.
///
/// Each segment is a contiguous run of samples. An empty result means no trace.
pub fn select_trace<F: Float>(
    trajectory: &HorizontalTrajectory<F>,
    index: usize,
    policy: TracePolicy,
) -> Vec<HorizontalTrajectory<F>> {
    match policy {
        TracePolicy::GatedByCurrent if !is_above_horizon(trajectory, index) => Vec::new(),
        TracePolicy::GatedByCurrent | TracePolicy::Always => vec![trajectory.clone()],
        TracePolicy::AboveHorizon => above_horizon_runs(trajectory),
    }
}

fn above_horizon_runs<F: Float>(trajectory: &HorizontalTrajectory<F>) -> Vec<HorizontalTrajectory<F>> {
    let chunks = trajectory
        .altitude
        .iter()
        .enumerate()
        .chunk_by(|(_, alt)| **alt > F::zero());

    (&chunks)
        .into_iter()
        .filter(|(above, _)| *above)
        .filter_map(|(_, run)| {
            let indices = run.map(|(i, _)| i).collect_vec();
            let (first, last) = (*indices.first()?, *indices.last()?);
            Some(HorizontalTrajectory {
                altitude: trajectory.altitude.slice(s![first..=last]).to_owned(),
                azimuth: trajectory.azimuth.slice(s![first..=last]).to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn trajectory() -> HorizontalTrajectory<f64> {
        HorizontalTrajectory {
            altitude: array![0.2, 0.3, -0.1, -0.4, 0.5, 0.6, 0.1, -0.2],
            azimuth: array![1., 2., 3., 4., 5., 6., 0.5, 1.5],
        }
    }

    #[test]
    fn horizon_check() {
        let t = trajectory();
        assert!(is_above_horizon(&t, 0));
        assert!(!is_above_horizon(&t, 2));
        assert!(!is_above_horizon(&t, 100));

        let on_horizon = HorizontalTrajectory {
            altitude: array![0.],
            azimuth: array![1.],
        };
        assert!(!is_above_horizon(&on_horizon, 0));
    }

    #[test]
    fn point_only_when_visible() {
        let t = trajectory();
        assert_eq!(
            current_point(&t, 5),
            Some(HorizontalPoint {
                altitude: 0.6,
                azimuth: 6.
            })
        );
        assert_eq!(current_point(&t, 3), None);
    }

    #[test]
    fn gated_is_all_or_nothing() {
        let t = trajectory();
        assert_eq!(select_trace(&t, 1, TracePolicy::GatedByCurrent), vec![t.clone()]);
        assert!(select_trace(&t, 3, TracePolicy::GatedByCurrent).is_empty());
    }

    #[test]
    fn always_draws() {
        let t = trajectory();
        assert_eq!(select_trace(&t, 3, TracePolicy::Always), vec![t.clone()]);
    }

    #[test]
    fn runs_above_horizon() {
        let t = trajectory();
        let runs = select_trace(&t, 3, TracePolicy::AboveHorizon);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].altitude, array![0.2, 0.3]);
        assert_eq!(runs[0].azimuth, array![1., 2.]);
        assert_eq!(runs[1].altitude, array![0.5, 0.6, 0.1]);
        assert_eq!(runs[1].azimuth, array![5., 6., 0.5]);
    }
}
