use derive_more::{Display, Into};

use crate::{ExerciseID, SessionMetric};

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Window(usize);

impl Window {
    pub const MIN: usize = 3;

    pub fn new(value: usize) -> Result<Self, WindowError> {
        if value < Self::MIN {
            return Err(WindowError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WindowError {
    #[error("Window must be at least 3 sessions")]
    OutOfRange,
}

/// Configuration of the trend analysis.
///
/// The slope threshold is the fraction of the window's mean estimated 1RM
/// that the fitted slope must exceed per session to count as a trend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    window: Window,
    slope_threshold: f32,
}

impl TrendConfig {
    pub const DEFAULT_SLOPE_THRESHOLD: f32 = 0.005;

    pub fn new(window: Window, slope_threshold: f32) -> Result<Self, TrendConfigError> {
        if !(slope_threshold > 0.0 && slope_threshold < 1.0) {
            return Err(TrendConfigError::SlopeThresholdOutOfRange);
        }

        Ok(Self {
            window,
            slope_threshold,
        })
    }

    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    #[must_use]
    pub fn slope_threshold(&self) -> f32 {
        self.slope_threshold
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TrendConfigError {
    #[error("Slope threshold must be in the range 0.0 to 1.0, exclusive")]
    SlopeThresholdOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TrendClassification {
    Progressing,
    Plateau,
    Regressing,
    InsufficientData,
}

/// Trend of the estimated 1RM over the most recent sessions of one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub exercise_id: ExerciseID,
    pub classification: TrendClassification,
    pub confidence: f32,
    pub slope: f32,
    pub window_size: usize,
}

/// Classify the progression trend of an ordered sequence of session metrics.
///
/// Fits an ordinary least-squares regression of estimated 1RM against
/// session index over the most recent `window` sessions. Fewer metrics than
/// the window yield [`TrendClassification::InsufficientData`] with zero
/// confidence instead of an error. Identical input always yields identical
/// output.
#[must_use]
pub fn analyze(
    exercise_id: ExerciseID,
    metrics: &[SessionMetric],
    config: &TrendConfig,
) -> TrendResult {
    let window = usize::from(config.window());

    if metrics.len() < window {
        return TrendResult {
            exercise_id,
            classification: TrendClassification::InsufficientData,
            confidence: 0.0,
            slope: 0.0,
            window_size: metrics.len(),
        };
    }

    let values = metrics[metrics.len() - window..]
        .iter()
        .map(|m| m.one_rep_max)
        .collect::<Vec<_>>();
    let (slope, r_squared) = linear_fit(&values);

    #[allow(clippy::cast_precision_loss)]
    let scale = values.iter().sum::<f32>() / values.len() as f32;
    let threshold = config.slope_threshold() * scale;

    TrendResult {
        exercise_id,
        classification: if slope > threshold {
            TrendClassification::Progressing
        } else if slope < -threshold {
            TrendClassification::Regressing
        } else {
            TrendClassification::Plateau
        },
        confidence: r_squared.clamp(0.0, 1.0),
        slope,
        window_size: window,
    }
}

/// Least-squares fit of `values` against the indices 0..n-1. Returns the
/// slope and the coefficient of determination. A zero-variance series is an
/// exact fit.
#[allow(clippy::cast_precision_loss)]
fn linear_fit(values: &[f32]) -> (f32, f32) {
    let n = values.len() as f32;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f32>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f32 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let ss_tot = values.iter().map(|y| (y - y_mean).powi(2)).sum::<f32>();
    let ss_res = values
        .iter()
        .enumerate()
        .map(|(i, y)| (y - (intercept + slope * i as f32)).powi(2))
        .sum::<f32>();

    if ss_tot <= f32::EPSILON {
        (slope, 1.0)
    } else {
        (slope, 1.0 - ss_res / ss_tot)
    }
}
