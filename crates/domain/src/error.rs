use crate::{ExerciseID, PolicyError, UnsortedInputError, UserID, WeightError};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum ProgressionError {
    #[error("no set records for the given user and exercise")]
    NoHistory {
        user_id: UserID,
        exercise_id: ExerciseID,
    },
    #[error(transparent)]
    UnsortedInput(#[from] UnsortedInputError),
    #[error(transparent)]
    InvalidPolicy(#[from] PolicyError),
    #[error(transparent)]
    SuggestedWeight(#[from] WeightError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_from_storage_error() {
        assert!(matches!(
            ReadError::from(StorageError::NoConnection),
            ReadError::Storage(StorageError::NoConnection)
        ));
        assert!(matches!(
            ReadError::Other("foo".into()),
            ReadError::Other(error) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_progression_error_from_read_error() {
        assert!(matches!(
            ProgressionError::from(ReadError::Storage(StorageError::NoConnection)),
            ProgressionError::Read(ReadError::Storage(StorageError::NoConnection))
        ));
    }

    #[test]
    fn test_progression_error_from_policy_error() {
        assert!(matches!(
            ProgressionError::from(PolicyError::MissingField("deload_fraction")),
            ProgressionError::InvalidPolicy(PolicyError::MissingField("deload_fraction"))
        ));
    }
}
