use std::collections::HashMap;

use crate::models::{CandidateReadinessAggregate, ReadinessObservation};

/// Interview type excluded from readiness averaging.
pub const SOFT_INTERVIEW: &str = "SOFT";

/// Provenance label carried by every aggregate row.
pub const TECH_INTERVIEW: &str = "TECH";

/// i128 sums cannot overflow on i64 scores.
#[derive(Debug, Clone, Copy, Default)]
struct RunningScore {
    sum: i128,
    count: i128,
}

/// Group-by-reduce of readiness observations into one average per candidate.
pub struct ReadinessAggregator {
    scores: HashMap<String, RunningScore>,
}

impl ReadinessAggregator {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
        }
    }

    /// Fold one observation in. Returns whether it qualified.
    pub fn observe(&mut self, observation: &ReadinessObservation) -> bool {
        let (Some(candidate_id), Some(score)) =
            (&observation.candidate_id, observation.subjective_readiness)
        else {
            return false;
        };

        if observation.interview_type.as_deref() == Some(SOFT_INTERVIEW) {
            return false;
        }

        let entry = self.scores.entry(candidate_id.clone()).or_default();
        entry.sum += i128::from(score);
        entry.count += 1;
        true
    }

    pub fn finish(self) -> HashMap<String, CandidateReadinessAggregate> {
        self.scores
            .into_iter()
            .map(|(candidate_id, running)| {
                let aggregate = CandidateReadinessAggregate {
                    candidate_id: candidate_id.clone(),
                    interview_type: TECH_INTERVIEW,
                    // The floor mean lies within the i64 scores it averages.
                    subjective_readiness_avg: running.sum.div_euclid(running.count) as i64,
                };
                (candidate_id, aggregate)
            })
            .collect()
    }
}

impl Default for ReadinessAggregator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn aggregate_readiness(
    observations: &[ReadinessObservation],
) -> HashMap<String, CandidateReadinessAggregate> {
    let mut aggregator = ReadinessAggregator::new();
    let qualifying = observations
        .iter()
        .filter(|o| aggregator.observe(o))
        .count();

    let aggregates = aggregator.finish();
    tracing::info!(
        "Aggregated {} qualifying observations into {} candidate averages",
        qualifying,
        aggregates.len()
    );
    aggregates
}
