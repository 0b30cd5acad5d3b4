use serde::{Deserialize, Serialize};

/// A staffing request row, projected to the columns the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRequestRecord {
    pub candidate_id: Option<String>,
    pub status: Option<String>,
}

impl CandidateRequestRecord {
    pub fn new(candidate_id: &str, status: &str) -> Self {
        Self {
            candidate_id: Some(candidate_id.to_string()),
            status: Some(status.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    pub candidate_id: Option<String>,
    pub main_technology: Option<String>,
    pub seniority_level: Option<String>,
    pub english_level: Option<String>,
}

impl CandidateProfile {
    pub fn new(
        candidate_id: &str,
        main_technology: Option<&str>,
        seniority_level: Option<&str>,
        english_level: Option<&str>,
    ) -> Self {
        Self {
            candidate_id: Some(candidate_id.to_string()),
            main_technology: main_technology.map(str::to_string),
            seniority_level: seniority_level.map(str::to_string),
            english_level: english_level.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessObservation {
    pub candidate_id: Option<String>,
    pub interview_type: Option<String>,
    pub subjective_readiness: Option<i64>,
}

impl ReadinessObservation {
    pub fn new(candidate_id: &str, interview_type: &str, subjective_readiness: i64) -> Self {
        Self {
            candidate_id: Some(candidate_id.to_string()),
            interview_type: Some(interview_type.to_string()),
            subjective_readiness: Some(subjective_readiness),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReadinessAggregate {
    pub candidate_id: String,
    pub interview_type: &'static str,
    pub subjective_readiness_avg: i64,
}

/// One row of the intermediate joined table.
///
/// Field order is the column order of the persisted CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub status: Option<String>,
    pub candidate_id: Option<String>,
    pub main_technology: Option<String>,
    pub seniority_level: Option<String>,
    pub english_level: Option<String>,
    pub subjective_readiness_avg: i64,
}
