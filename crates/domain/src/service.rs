use chrono::{DateTime, Duration, Utc};
use log::{debug, error};

use crate::{
    ExerciseID, Modality, PolicyParams, ProgressionError, ProgressionPolicy, Recommendation,
    SetRecord, SetRecordRepository, TrendConfig, TrendResult, UserID, analyze,
    extract_session_metrics, recommend,
};

/// Configuration of the analytics facade, passed in at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsConfig {
    session_boundary: Duration,
    trend: TrendConfig,
}

impl AnalyticsConfig {
    pub fn new(
        session_boundary: Duration,
        trend: TrendConfig,
    ) -> Result<Self, AnalyticsConfigError> {
        if session_boundary <= Duration::zero() {
            return Err(AnalyticsConfigError::NonPositiveSessionBoundary);
        }

        Ok(Self {
            session_boundary,
            trend,
        })
    }

    #[must_use]
    pub fn session_boundary(&self) -> Duration {
        self.session_boundary
    }

    #[must_use]
    pub fn trend(&self) -> &TrendConfig {
        &self.trend
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AnalyticsConfigError {
    #[error("Session boundary must be a positive duration")]
    NonPositiveSessionBoundary,
}

/// Progression analysis of one exercise: the recommendation together with
/// the trend it is based on.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub recommendation: Recommendation,
    pub trend: TrendResult,
}

#[allow(async_fn_in_trait)]
pub trait AnalyticsService {
    async fn get_progression(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
        modality: Modality,
        policy: PolicyParams,
    ) -> Result<Progression, ProgressionError>;

    async fn get_trend(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
        modality: Modality,
    ) -> Result<TrendResult, ProgressionError>;
}

pub struct Service<R> {
    repository: R,
    config: AnalyticsConfig,
}

impl<R> Service<R> {
    pub fn new(repository: R, config: AnalyticsConfig) -> Self {
        Self { repository, config }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SetRecordRepository> Service<R> {
    async fn read_history(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<SetRecord>, ProgressionError> {
        use crate::ReadError;

        let sets = log_on_error!(
            self.repository.read_set_records(user_id, exercise_id, as_of),
            ReadError,
            "read",
            "set records"
        )?;

        if sets.is_empty() {
            return Err(ProgressionError::NoHistory {
                user_id,
                exercise_id,
            });
        }

        Ok(sets)
    }
}

impl<R: SetRecordRepository> AnalyticsService for Service<R> {
    async fn get_progression(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
        modality: Modality,
        policy: PolicyParams,
    ) -> Result<Progression, ProgressionError> {
        // A defective policy is reported before any store access.
        let policy = ProgressionPolicy::try_from(policy)?;

        let sets = self.read_history(user_id, exercise_id, as_of).await?;
        let metrics = extract_session_metrics(&sets, self.config.session_boundary(), modality)?;
        let trend = analyze(exercise_id, &metrics, self.config.trend());
        let last_session = metrics.last().ok_or(ProgressionError::NoHistory {
            user_id,
            exercise_id,
        })?;
        let recommendation = recommend(&trend, last_session, &policy)?;

        Ok(Progression {
            recommendation,
            trend,
        })
    }

    async fn get_trend(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
        modality: Modality,
    ) -> Result<TrendResult, ProgressionError> {
        let sets = self.read_history(user_id, exercise_id, as_of).await?;
        let metrics = extract_session_metrics(&sets, self.config.session_boundary(), modality)?;

        Ok(analyze(exercise_id, &metrics, self.config.trend()))
    }
}
