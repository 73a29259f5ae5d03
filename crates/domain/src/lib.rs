#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod metrics;
mod recommendation;
mod service;
mod set_record;
mod training;
mod trend;

pub use error::{ProgressionError, ReadError, StorageError};
pub use metrics::{Modality, SessionMetric, UnsortedInputError, extract_session_metrics};
pub use recommendation::{
    Increment, IncrementMode, PolicyError, PolicyParams, ProgressionPolicy, RationaleCode,
    Recommendation, recommend,
};
pub use service::{AnalyticsConfig, AnalyticsConfigError, AnalyticsService, Progression, Service};
pub use set_record::{ExerciseID, SetRecord, SetRecordRepository, UserID};
pub use training::{RPE, RPEError, Reps, RepsError, Weight, WeightError};
pub use trend::{TrendClassification, TrendConfig, TrendConfigError, TrendResult, Window, WindowError, analyze};
