use chrono::{DateTime, Duration, Utc};

use crate::{ExerciseID, RPE, Reps, SetRecord, Weight};

/// How an exercise is loaded, carrying its own estimated-1RM formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modality {
    /// External load only (barbell, dumbbell, machine).
    FreeWeight,
    /// Body weight plus optional added load (pull-ups, dips).
    Bodyweight { body_weight: Weight },
}

impl Modality {
    /// Total load moved in a set.
    #[must_use]
    pub fn load(&self, weight: Weight) -> f32 {
        match self {
            Modality::FreeWeight => f32::from(weight),
            Modality::Bodyweight { body_weight } => f32::from(*body_weight) + f32::from(weight),
        }
    }

    /// Estimated one-rep max of a set via Epley's formula.
    ///
    /// For bodyweight exercises the formula is applied to the total load and
    /// the added-load share is reported, the usual convention for weighted
    /// bodyweight work.
    #[must_use]
    pub fn estimated_one_rep_max(&self, weight: Weight, reps: Reps) -> f32 {
        match self {
            Modality::FreeWeight => epley(f32::from(weight), reps),
            Modality::Bodyweight { body_weight } => {
                epley(self.load(weight), reps) - f32::from(*body_weight)
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn epley(load: f32, reps: Reps) -> f32 {
    load * (1.0 + u32::from(reps) as f32 / 30.0)
}

/// Per-session performance metrics derived from the logged sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMetric {
    pub exercise_id: ExerciseID,
    pub started_at: DateTime<Utc>,
    pub volume: f32,
    pub one_rep_max: f32,
    pub average_rpe: Option<RPE>,
    pub top_weight: Weight,
    pub top_reps: Reps,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("set records must be ordered by ascending timestamp (record {index})")]
pub struct UnsortedInputError {
    pub index: usize,
    pub previous: DateTime<Utc>,
    pub current: DateTime<Utc>,
}

/// Group timestamp-sorted set records into sessions and compute per-session
/// metrics.
///
/// Consecutive sets whose timestamps are within `session_boundary` of each
/// other belong to the same session. The input must be sorted by timestamp;
/// a decreasing timestamp fails with [`UnsortedInputError`]. An empty input
/// yields an empty result.
pub fn extract_session_metrics(
    sets: &[SetRecord],
    session_boundary: Duration,
    modality: Modality,
) -> Result<Vec<SessionMetric>, UnsortedInputError> {
    let mut result = vec![];
    let mut session: Vec<&SetRecord> = vec![];

    for (index, set) in sets.iter().enumerate() {
        if let Some(previous) = session.last() {
            debug_assert_eq!(previous.exercise_id, set.exercise_id);
            if set.timestamp < previous.timestamp {
                return Err(UnsortedInputError {
                    index,
                    previous: previous.timestamp,
                    current: set.timestamp,
                });
            }
            if set.timestamp - previous.timestamp > session_boundary {
                result.push(session_metric(&session, modality));
                session.clear();
            }
        }
        session.push(set);
    }

    if !session.is_empty() {
        result.push(session_metric(&session, modality));
    }

    Ok(result)
}

fn session_metric(sets: &[&SetRecord], modality: Modality) -> SessionMetric {
    let first = sets[0];
    let top = sets
        .iter()
        .map(|set| {
            (
                modality.estimated_one_rep_max(set.weight, set.reps),
                set.weight,
                set.reps,
            )
        })
        .fold(
            (0.0, first.weight, first.reps),
            |best, candidate| if candidate.0 > best.0 { candidate } else { best },
        );
    SessionMetric {
        exercise_id: first.exercise_id,
        started_at: first.timestamp,
        volume: sets
            .iter()
            .map(|set| {
                #[allow(clippy::cast_precision_loss)]
                let reps = u32::from(set.reps) as f32;
                modality.load(set.weight) * reps
            })
            .sum(),
        one_rep_max: top.0,
        average_rpe: RPE::avg(&sets.iter().filter_map(|set| set.rpe).collect::<Vec<_>>()),
        top_weight: top.1,
        top_reps: top.2,
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn timestamp(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 2, 2, hour, min, 0).unwrap()
    }

    fn set(hour: u32, min: u32, weight: f32, reps: u32, rpe: Option<RPE>) -> SetRecord {
        SetRecord {
            user_id: 1.into(),
            exercise_id: 2.into(),
            timestamp: timestamp(hour, min),
            weight: Weight::new(weight).unwrap(),
            reps: Reps::new(reps).unwrap(),
            rpe,
        }
    }

    #[rstest]
    #[case::free_weight(Modality::FreeWeight, 100.0, 5, 116.666_66)]
    #[case::free_weight_single_rep(Modality::FreeWeight, 100.0, 1, 103.333_33)]
    #[case::bodyweight(
        Modality::Bodyweight { body_weight: Weight::new(80.0).unwrap() },
        20.0,
        5,
        36.666_67
    )]
    fn test_estimated_one_rep_max(
        #[case] modality: Modality,
        #[case] weight: f32,
        #[case] reps: u32,
        #[case] expected: f32,
    ) {
        assert_approx_eq!(
            modality.estimated_one_rep_max(
                Weight::new(weight).unwrap(),
                Reps::new(reps).unwrap()
            ),
            expected,
            1e-2
        );
    }

    #[test]
    fn test_extract_empty() {
        assert_eq!(
            extract_session_metrics(&[], Duration::hours(2), Modality::FreeWeight),
            Ok(vec![])
        );
    }

    #[test]
    fn test_extract_single_session() {
        let sets = [
            set(10, 0, 100.0, 5, Some(RPE::SEVEN)),
            set(10, 5, 100.0, 5, Some(RPE::EIGHT)),
            set(10, 10, 102.5, 3, None),
        ];

        let metrics =
            extract_session_metrics(&sets, Duration::hours(2), Modality::FreeWeight).unwrap();

        assert_eq!(metrics.len(), 1);
        let metric = &metrics[0];
        assert_eq!(metric.exercise_id, 2.into());
        assert_eq!(metric.started_at, timestamp(10, 0));
        assert_approx_eq!(metric.volume, 100.0 * 5.0 + 100.0 * 5.0 + 102.5 * 3.0);
        assert_approx_eq!(metric.one_rep_max, 100.0 * (1.0 + 5.0 / 30.0), 1e-3);
        assert_eq!(metric.average_rpe, Some(RPE::new(7.5).unwrap()));
        assert_eq!(metric.top_weight, Weight::new(100.0).unwrap());
        assert_eq!(metric.top_reps, Reps::new(5).unwrap());
    }

    #[test]
    fn test_extract_splits_sessions_at_boundary() {
        let sets = [
            set(10, 0, 100.0, 5, None),
            set(10, 10, 100.0, 5, None),
            set(16, 0, 105.0, 5, None),
        ];

        let metrics =
            extract_session_metrics(&sets, Duration::hours(2), Modality::FreeWeight).unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].started_at, timestamp(10, 0));
        assert_eq!(metrics[1].started_at, timestamp(16, 0));
        assert!(metrics[0].started_at < metrics[1].started_at);
    }

    #[test]
    fn test_extract_sets_within_boundary_of_each_other() {
        // 90 min pairwise gaps chain into one session even though the first
        // and last set are further apart than the boundary.
        let sets = [
            set(10, 0, 100.0, 5, None),
            set(11, 30, 100.0, 5, None),
            set(13, 0, 100.0, 5, None),
        ];

        let metrics =
            extract_session_metrics(&sets, Duration::hours(2), Modality::FreeWeight).unwrap();

        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn test_extract_unsorted_input() {
        let sets = [
            set(10, 0, 100.0, 5, None),
            set(9, 0, 100.0, 5, None),
        ];

        assert_eq!(
            extract_session_metrics(&sets, Duration::hours(2), Modality::FreeWeight),
            Err(UnsortedInputError {
                index: 1,
                previous: timestamp(10, 0),
                current: timestamp(9, 0),
            })
        );
    }

    #[test]
    fn test_extract_bodyweight_volume() {
        let body_weight = Weight::new(80.0).unwrap();
        let sets = [set(10, 0, 20.0, 5, None)];

        let metrics = extract_session_metrics(
            &sets,
            Duration::hours(2),
            Modality::Bodyweight { body_weight },
        )
        .unwrap();

        assert_approx_eq!(metrics[0].volume, 100.0 * 5.0);
        assert_approx_eq!(metrics[0].one_rep_max, 100.0 * (1.0 + 5.0 / 30.0) - 80.0, 1e-3);
    }

    #[test]
    fn test_extract_output_is_ordered() {
        let sets = [
            set(8, 0, 100.0, 5, None),
            set(11, 0, 100.0, 5, None),
            set(14, 0, 100.0, 5, None),
        ];

        let metrics =
            extract_session_metrics(&sets, Duration::hours(1), Modality::FreeWeight).unwrap();

        assert_eq!(metrics.len(), 3);
        assert!(
            metrics
                .windows(2)
                .all(|pair| pair[0].started_at <= pair[1].started_at)
        );
    }
}
