use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{RPE, ReadError, Reps, Weight};

#[allow(async_fn_in_trait)]
pub trait SetRecordRepository {
    /// Read all set records for the given user and exercise with a timestamp
    /// not after `as_of`, ordered by ascending timestamp.
    async fn read_set_records(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<SetRecord>, ReadError>;
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A single logged set. Immutable once created; owned by the history store.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRecord {
    pub user_id: UserID,
    pub exercise_id: ExerciseID,
    pub timestamp: DateTime<Utc>,
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
}
