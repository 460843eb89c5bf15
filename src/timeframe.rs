//! Query window around "now" and its sampling.

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;

use crate::error::{Result, SkyMapError};

/// Largest number of samples a window may hold.
pub const MAX_SAMPLES: usize = i32::MAX as usize;

/// A regularly stepped window `[start, end]` around `now`.
///
/// Construct it with [`TimeframeBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeframe {
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

impl Timeframe {
    /// The instant the window is centered on.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// First sample.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window. It is the last sample if the span is a multiple of the step.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Sampling step.
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Number of samples an ephemeris provider returns for this window, both ends included.
    pub fn sample_count(&self) -> usize {
        let window = (self.end - self.start).num_milliseconds();
        (window / self.step.num_milliseconds()) as usize + 1
    }

    /// Index of the sample nearest to `now`, clamped to `[0, sample_count)`.
    pub fn current_index(&self) -> usize {
        let elapsed = (self.now - self.start).num_milliseconds() as f64;
        let index = (elapsed / self.step.num_milliseconds() as f64).round();
        let last = self.sample_count() - 1;
        if index <= 0. {
            0
        } else {
            (index as usize).min(last)
        }
    }

    /// Timestamp of sample `index`, or `None` past the last sample.
    pub fn sample_time(&self, index: usize) -> Option<DateTime<Utc>> {
        if index >= self.sample_count() {
            return None;
        }
        let offset = self.step.checked_mul(i32::try_from(index).ok()?)?;
        self.start.checked_add_signed(offset)
    }

    /// Timestamps of all samples.
    pub fn sample_times(&self) -> Vec<DateTime<Utc>> {
        (0..self.sample_count())
            .filter_map(|i| self.sample_time(i))
            .collect()
    }
}

/// Builds a [`Timeframe`] of `now ± span` sampled every `step`.
///
/// Defaults to a span of 370 days and a step of 10 days, i.e. 75 samples.
#[derive(Clone, Copy, Debug)]
pub struct TimeframeBuilder {
    now: DateTime<Utc>,
    span: TimeDelta,
    step: TimeDelta,
}

impl TimeframeBuilder {
    /// Start building a window around `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            span: TimeDelta::days(370),
            step: TimeDelta::days(10),
        }
    }

    /// Set the lookback and lookahead.
    pub fn with_span(mut self, span: TimeDelta) -> Self {
        self.span = span;
        self
    }

    /// Set the sampling step.
    pub fn with_step(mut self, step: TimeDelta) -> Self {
        self.step = step;
        self
    }

    /// Validate the parameters and build the window.
    pub fn build(self) -> Result<Timeframe> {
        if self.step < TimeDelta::milliseconds(1) {
            return Err(SkyMapError::Configuration(format!(
                "step must be at least 1 ms, got {}",
                self.step
            )));
        }
        if self.span <= TimeDelta::zero() {
            return Err(SkyMapError::Configuration(format!(
                "span must be positive, got {}",
                self.span
            )));
        }
        let start = self.now.checked_sub_signed(self.span);
        let end = self.now.checked_add_signed(self.span);
        let (Some(start), Some(end)) = (start, end) else {
            return Err(SkyMapError::Configuration(format!(
                "span {} leaves the representable date range",
                self.span
            )));
        };

        let timeframe = Timeframe {
            now: self.now,
            start,
            end,
            step: self.step,
        };
        if timeframe.sample_count() > MAX_SAMPLES {
            return Err(SkyMapError::Configuration(format!(
                "span {} with step {} gives {} samples, at most {MAX_SAMPLES} are supported",
                self.span,
                self.step,
                timeframe.sample_count()
            )));
        }
        debug!(
            "Timeframe {} to {} with {} samples.",
            start,
            end,
            timeframe.sample_count()
        );
        Ok(timeframe)
    }
}
