pub mod csv_source;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::analysis::joiner::is_terminal_status;
use crate::error::{Error, Result};
use crate::models::{CandidateProfile, CandidateRequestRecord, ReadinessObservation};

pub use csv_source::{normalize_id, read_projected, Projection};

pub const REQUEST_COLUMNS: &[&str] = &["status", "candidate_id"];
pub const PROFILE_COLUMNS: &[&str] = &["id", "main_technology", "seniority_level", "english_level"];
pub const INTERVIEW_COLUMNS: &[&str] = &["candidate_id", "interview_type", "subjective_readiness"];

/// The three raw sources, projected and filtered.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub requests: Vec<CandidateRequestRecord>,
    pub profiles: Vec<CandidateProfile>,
    pub observations: Vec<ReadinessObservation>,
}

pub struct RecordLoader {
    requests_path: PathBuf,
    candidates_path: PathBuf,
    interviews_path: PathBuf,
}

impl RecordLoader {
    pub fn new<P: AsRef<Path>>(requests_path: P, candidates_path: P, interviews_path: P) -> Self {
        Self {
            requests_path: requests_path.as_ref().to_path_buf(),
            candidates_path: candidates_path.as_ref().to_path_buf(),
            interviews_path: interviews_path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<SourceRecords> {
        let requests = load_requests(open(&self.requests_path)?)?;
        tracing::info!("Loaded {} active requests", requests.len());

        let profiles = load_profiles(open(&self.candidates_path)?)?;
        tracing::info!("Loaded {} candidate profiles", profiles.len());

        let observations = load_observations(open(&self.interviews_path)?)?;
        tracing::info!("Loaded {} interview observations", observations.len());

        Ok(SourceRecords {
            requests,
            profiles,
            observations,
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Requests in a terminal state are dropped here, before anything is joined.
pub fn load_requests<R: Read>(reader: R) -> Result<Vec<CandidateRequestRecord>> {
    let rows = read_projected("requests", reader, REQUEST_COLUMNS)?;

    Ok(rows
        .into_iter()
        .map(|mut cells| CandidateRequestRecord {
            candidate_id: cells[1].take().map(normalize_id),
            status: cells[0].take(),
        })
        .filter(|r| !r.status.as_deref().map(is_terminal_status).unwrap_or(false))
        .collect())
}

/// The profile source keys candidates by `id`; it becomes `candidate_id`.
///
/// Identifiers are normalized in every loader, so `1.0` in one source joins
/// `1` in another.
pub fn load_profiles<R: Read>(reader: R) -> Result<Vec<CandidateProfile>> {
    let rows = read_projected("candidates", reader, PROFILE_COLUMNS)?;

    Ok(rows
        .into_iter()
        .map(|mut cells| CandidateProfile {
            candidate_id: cells[0].take().map(normalize_id),
            main_technology: cells[1].take(),
            seniority_level: cells[2].take(),
            english_level: cells[3].take(),
        })
        .collect())
}

pub fn load_observations<R: Read>(reader: R) -> Result<Vec<ReadinessObservation>> {
    let rows = read_projected("interviews", reader, INTERVIEW_COLUMNS)?;

    rows.into_iter()
        .enumerate()
        .map(|(i, mut cells)| {
            let subjective_readiness = cells[2]
                .as_deref()
                .map(|raw| csv_source::parse_score("interviews", i + 1, raw))
                .transpose()?;

            Ok(ReadinessObservation {
                candidate_id: cells[0].take().map(normalize_id),
                interview_type: cells[1].take(),
                subjective_readiness,
            })
        })
        .collect()
}
