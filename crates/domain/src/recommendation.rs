use crate::{
    ExerciseID, Reps, RepsError, SessionMetric, TrendClassification, TrendResult, Weight,
    WeightError,
};

/// Load increment applied when an exercise is progressing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Increment {
    /// Percent of the current load, in 0..=100.
    Percentage(f32),
    /// Fixed weight step in kg.
    Fixed(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum IncrementMode {
    Percentage,
    Fixed,
}

/// Wire form of a progression policy as supplied by the web layer.
///
/// All fields are optional at this level; converting into
/// [`ProgressionPolicy`] reports missing or out-of-range fields instead of
/// assuming defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PolicyParams {
    pub increment_mode: Option<IncrementMode>,
    pub increment_value: Option<f32>,
    pub rep_ceiling: Option<u32>,
    pub deload_fraction: Option<f32>,
    pub base_reps: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionPolicy {
    increment: Increment,
    rep_ceiling: Reps,
    deload_fraction: f32,
    base_reps: Reps,
}

impl ProgressionPolicy {
    pub fn new(
        increment: Increment,
        rep_ceiling: Reps,
        deload_fraction: f32,
        base_reps: Reps,
    ) -> Result<Self, PolicyError> {
        match increment {
            Increment::Percentage(value) if !(value > 0.0 && value <= 100.0) => {
                return Err(PolicyError::IncrementOutOfRange(value));
            }
            Increment::Fixed(value) if value <= 0.0 => {
                return Err(PolicyError::IncrementOutOfRange(value));
            }
            _ => {}
        }

        if !(deload_fraction > 0.0 && deload_fraction < 1.0) {
            return Err(PolicyError::DeloadFractionOutOfRange(deload_fraction));
        }

        if u32::from(base_reps) == 0 {
            return Err(PolicyError::BaseRepsOutOfRange);
        }

        if rep_ceiling < base_reps {
            return Err(PolicyError::RepCeilingBelowBaseReps);
        }

        Ok(Self {
            increment,
            rep_ceiling,
            deload_fraction,
            base_reps,
        })
    }

    #[must_use]
    pub fn increment(&self) -> Increment {
        self.increment
    }

    #[must_use]
    pub fn rep_ceiling(&self) -> Reps {
        self.rep_ceiling
    }

    #[must_use]
    pub fn deload_fraction(&self) -> f32 {
        self.deload_fraction
    }

    #[must_use]
    pub fn base_reps(&self) -> Reps {
        self.base_reps
    }
}

impl TryFrom<PolicyParams> for ProgressionPolicy {
    type Error = PolicyError;

    fn try_from(params: PolicyParams) -> Result<Self, Self::Error> {
        let mode = params
            .increment_mode
            .ok_or(PolicyError::MissingField("increment_mode"))?;
        let value = params
            .increment_value
            .ok_or(PolicyError::MissingField("increment_value"))?;
        let increment = match mode {
            IncrementMode::Percentage => Increment::Percentage(value),
            IncrementMode::Fixed => Increment::Fixed(value),
        };

        Self::new(
            increment,
            Reps::new(
                params
                    .rep_ceiling
                    .ok_or(PolicyError::MissingField("rep_ceiling"))?,
            )?,
            params
                .deload_fraction
                .ok_or(PolicyError::MissingField("deload_fraction"))?,
            Reps::new(
                params
                    .base_reps
                    .ok_or(PolicyError::MissingField("base_reps"))?,
            )?,
        )
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PolicyError {
    #[error("missing required policy field `{0}`")]
    MissingField(&'static str),
    #[error("increment value {0} is out of range")]
    IncrementOutOfRange(f32),
    #[error("deload fraction {0} must be between 0 and 1, exclusive")]
    DeloadFractionOutOfRange(f32),
    #[error("base reps must be at least 1")]
    BaseRepsOutOfRange,
    #[error("rep ceiling must not be below base reps")]
    RepCeilingBelowBaseReps,
    #[error(transparent)]
    Reps(#[from] RepsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RationaleCode {
    NeedMoreData,
    IncreaseLoad,
    VaryStimulus,
    Deload,
}

/// Suggested target for the next session of one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub exercise_id: ExerciseID,
    pub suggested_weight: Weight,
    pub suggested_reps: Reps,
    pub rationale: RationaleCode,
}

/// Propose the next session's target from a trend classification and the
/// most recent session.
///
/// The only failure is a suggested load leaving the valid [`Weight`] range.
pub fn recommend(
    trend: &TrendResult,
    last_session: &SessionMetric,
    policy: &ProgressionPolicy,
) -> Result<Recommendation, WeightError> {
    let last_weight = last_session.top_weight;
    let last_reps = last_session.top_reps;

    let (suggested_weight, suggested_reps, rationale) = match trend.classification {
        TrendClassification::InsufficientData => {
            (last_weight, last_reps, RationaleCode::NeedMoreData)
        }
        TrendClassification::Progressing => {
            let weight = match policy.increment() {
                Increment::Percentage(percent) => {
                    Weight::rounded(f32::from(last_weight) * (1.0 + percent / 100.0))?
                }
                Increment::Fixed(step) => Weight::rounded(f32::from(last_weight) + step)?,
            };
            (weight, last_reps, RationaleCode::IncreaseLoad)
        }
        TrendClassification::Plateau if last_reps < policy.rep_ceiling() => {
            // Below the ceiling the increment stays within the valid range.
            let reps = Reps::new(u32::from(last_reps) + 1).unwrap_or(policy.rep_ceiling());
            (last_weight, reps, RationaleCode::VaryStimulus)
        }
        TrendClassification::Plateau | TrendClassification::Regressing => (
            Weight::rounded(f32::from(last_weight) * (1.0 - policy.deload_fraction()))?,
            policy.base_reps(),
            RationaleCode::Deload,
        ),
    };

    Ok(Recommendation {
        exercise_id: trend.exercise_id,
        suggested_weight,
        suggested_reps,
        rationale,
    })
}
