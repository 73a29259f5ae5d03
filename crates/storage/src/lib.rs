#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::{collections::BTreeMap, sync::RwLock};

use chrono::{DateTime, Utc};
use log::debug;
use overload_domain::{
    ExerciseID, ReadError, SetRecord, SetRecordRepository, StorageError, UserID,
};

/// In-memory history store.
///
/// Reference adapter for development and tests. Histories are kept ordered
/// by timestamp on insertion, upholding the ordering guarantee of
/// [`SetRecordRepository`]. Reads hand out snapshots, so concurrent analysis
/// calls need no coordination.
#[derive(Debug, Default)]
pub struct InMemory {
    records: RwLock<BTreeMap<(UserID, ExerciseID), Vec<SetRecord>>>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a set record, keeping the history of its user/exercise pair
    /// ordered by ascending timestamp.
    pub fn log_set(&self, set: SetRecord) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Other("history store lock poisoned".into()))?;
        let history = records.entry((set.user_id, set.exercise_id)).or_default();
        let index = history.partition_point(|s| s.timestamp <= set.timestamp);
        history.insert(index, set);
        Ok(())
    }

    pub fn log_sets(
        &self,
        sets: impl IntoIterator<Item = SetRecord>,
    ) -> Result<(), StorageError> {
        for set in sets {
            self.log_set(set)?;
        }
        Ok(())
    }
}

impl SetRecordRepository for InMemory {
    async fn read_set_records(
        &self,
        user_id: UserID,
        exercise_id: ExerciseID,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<SetRecord>, ReadError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Other("history store lock poisoned".into()))?;
        let sets = records
            .get(&(user_id, exercise_id))
            .map(|history| {
                history
                    .iter()
                    .filter(|set| set.timestamp <= as_of)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        debug!("read {} set records", sets.len());

        Ok(sets)
    }
}
