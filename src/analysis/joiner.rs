use std::collections::HashMap;

use crate::analysis::aggregator::aggregate_readiness;
use crate::models::{
    CandidateProfile, CandidateReadinessAggregate, CandidateRequestRecord, JoinedRow,
    ReadinessObservation,
};

/// Request statuses that withdraw a request from the analysis.
pub const TERMINAL_STATUSES: &[&str] = &["CANCEL", "TERMINATED"];

pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

pub struct JoinEngine;

impl JoinEngine {
    /// Filter, aggregate and join the three record sets.
    ///
    /// Output follows request order, then profile order for candidates with
    /// several profile rows.
    pub fn combine(
        requests: &[CandidateRequestRecord],
        profiles: &[CandidateProfile],
        observations: &[ReadinessObservation],
    ) -> Vec<JoinedRow> {
        let active: Vec<_> = requests
            .iter()
            .filter(|r| !r.status.as_deref().map(is_terminal_status).unwrap_or(false))
            .collect();

        if active.len() < requests.len() {
            tracing::debug!(
                "Dropped {} requests in a terminal state",
                requests.len() - active.len()
            );
        }

        let aggregates = aggregate_readiness(observations);
        let profile_index = index_profiles(profiles);

        let mut rows = Vec::new();
        let mut without_profile = 0usize;
        let mut without_readiness = 0usize;

        for request in active {
            let matches = request
                .candidate_id
                .as_ref()
                .and_then(|id| profile_index.get(id.as_str()))
                .filter(|m| !m.is_empty());

            let joined: Vec<JoinedRow> = match matches {
                Some(matches) => matches
                    .iter()
                    .map(|profile| left_join_row(request, Some(*profile)))
                    .collect(),
                None => {
                    without_profile += 1;
                    vec![left_join_row(request, None)]
                }
            };

            for row in joined {
                match attach_readiness(row, &aggregates) {
                    Some(row) => rows.push(row),
                    None => without_readiness += 1,
                }
            }
        }

        tracing::info!(
            "Joined {} rows ({} requests without profile, {} rows without readiness dropped)",
            rows.len(),
            without_profile,
            without_readiness
        );

        if rows.is_empty() {
            tracing::warn!("Join produced no rows");
        }

        rows
    }
}

fn index_profiles(profiles: &[CandidateProfile]) -> HashMap<&str, Vec<&CandidateProfile>> {
    let mut index: HashMap<&str, Vec<&CandidateProfile>> = HashMap::new();
    for profile in profiles {
        if let Some(id) = profile.candidate_id.as_deref() {
            index.entry(id).or_default().push(profile);
        }
    }
    index
}

fn left_join_row(request: &CandidateRequestRecord, profile: Option<&CandidateProfile>) -> JoinedRow {
    JoinedRow {
        status: request.status.clone(),
        candidate_id: request.candidate_id.clone(),
        main_technology: profile.and_then(|p| p.main_technology.clone()),
        seniority_level: profile.and_then(|p| p.seniority_level.clone()),
        english_level: profile.and_then(|p| p.english_level.clone()),
        subjective_readiness_avg: 0,
    }
}

/// Left join onto the readiness aggregate; `None` when the candidate has no
/// qualifying observation.
fn attach_readiness(
    mut row: JoinedRow,
    aggregates: &HashMap<String, CandidateReadinessAggregate>,
) -> Option<JoinedRow> {
    let aggregate = aggregates.get(row.candidate_id.as_deref()?)?;
    row.subjective_readiness_avg = aggregate.subjective_readiness_avg;
    Some(row)
}
