use crate::error::{Error, Result};
use crate::transform::UnknownCategoryPolicy;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub requests_csv: String,
    pub candidates_csv: String,
    pub interviews_csv: String,
    pub joined_csv: PathBuf,
    pub features_csv: PathBuf,
    pub state_db: PathBuf,
    pub unknown_category_policy: UnknownCategoryPolicy,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            requests_csv: "staffing_candidate_in_request_for_specialist.csv".to_string(),
            candidates_csv: "staffing_candidates.csv".to_string(),
            interviews_csv: "staffing_interview.csv".to_string(),
            joined_csv: PathBuf::from("clients_interviews.csv"),
            features_csv: PathBuf::from("clients_interviews_features.csv"),
            state_db: PathBuf::from("transformer_state.db"),
            unknown_category_policy: UnknownCategoryPolicy::Error,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let requests_csv = env::var("REQUESTS_CSV").unwrap_or(defaults.requests_csv);
        let candidates_csv = env::var("CANDIDATES_CSV").unwrap_or(defaults.candidates_csv);
        let interviews_csv = env::var("INTERVIEWS_CSV").unwrap_or(defaults.interviews_csv);

        let joined_csv = env::var("JOINED_CSV")
            .map(PathBuf::from)
            .unwrap_or(defaults.joined_csv);

        let features_csv = env::var("FEATURES_CSV")
            .map(PathBuf::from)
            .unwrap_or(defaults.features_csv);

        let state_db = env::var("STATE_DB")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_db);

        let unknown_category_policy = match env::var("UNKNOWN_CATEGORY_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.unknown_category_policy,
        };

        let show_progress = env::var("SHOW_PROGRESS")
            .ok()
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(defaults.show_progress);

        let config = Self {
            data_dir,
            requests_csv,
            candidates_csv,
            interviews_csv,
            joined_csv,
            features_csv,
            state_db,
            unknown_category_policy,
            show_progress,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.joined_csv == self.features_csv {
            return Err(Error::Config(format!(
                "joined table and feature matrix must be written to different files ({})",
                self.joined_csv.display()
            )));
        }
        Ok(())
    }

    pub fn requests_path(&self) -> PathBuf {
        self.data_dir.join(&self.requests_csv)
    }

    pub fn candidates_path(&self) -> PathBuf {
        self.data_dir.join(&self.candidates_csv)
    }

    pub fn interviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.interviews_csv)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub requests_path: PathBuf,
    pub candidates_path: PathBuf,
    pub interviews_path: PathBuf,
    pub joined_csv: PathBuf,
    pub features_csv: PathBuf,
    pub unknown_category_policy: UnknownCategoryPolicy,
    pub show_progress: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            requests_path: config.requests_path(),
            candidates_path: config.candidates_path(),
            interviews_path: config.interviews_path(),
            joined_csv: config.joined_csv.clone(),
            features_csv: config.features_csv.clone(),
            unknown_category_policy: config.unknown_category_policy,
            show_progress: config.show_progress,
        }
    }
}
