use std::fs;
use std::path::Path;

use interviewfeatures::storage::{read_joined, read_matrix};
use interviewfeatures::{
    Config, Error, FeatureTransformer, PipelineConfig, PreprocessingPipeline, StateStore,
    UnknownCategoryPolicy,
};
use tempfile::{tempdir, TempDir};

const REQUESTS: &str = "\
id,request_id,status,candidate_id
1,100,ACCEPTED,1
2,100,REJECT,2
3,101,CANCEL,3
4,101,ACCEPTED,4
5,102,TERMINATED,1
6,102,REJECT,5
7,103,ACCEPTED,6
";

const CANDIDATES: &str = "\
id,main_technology,seniority_level,english_level,additional_technologies,vacation_from
1,Java,Senior,C1,\"Kotlin, Spring\",
2,Python,Junior,,,2023-01-01
3,Java,Middle,B2,,
4,,Middle,B2,,
5,Python,Senior,B2,,
";

const INTERVIEWS: &str = "\
id,candidate_id,interview_type,subjective_readiness
1,1,TECH,8
2,1,TECH,6
3,1,SOFT,10
4,2,TECH,3.0
5,3,TECH,9
6,4,TECH,5
7,5,SOFT,7
8,6,TECH,4
9,,TECH,2
10,2,TECH,
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("staffing_candidate_in_request_for_specialist.csv"), REQUESTS).unwrap();
        fs::write(data.join("staffing_candidates.csv"), CANDIDATES).unwrap();
        fs::write(data.join("staffing_interview.csv"), INTERVIEWS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> Config {
        Config {
            data_dir: self.path("data"),
            joined_csv: self.path("clients_interviews.csv"),
            features_csv: self.path("features.csv"),
            state_db: self.path("state.db"),
            show_progress: false,
            ..Config::default()
        }
    }

    fn pipeline(&self) -> PreprocessingPipeline {
        let config = self.config();
        let store = StateStore::new(&config.state_db).unwrap();
        PreprocessingPipeline::new(store, PipelineConfig::from(&config))
    }
}

fn column(matrix: &interviewfeatures::models::FeatureMatrix, name: &str) -> Vec<f64> {
    matrix
        .column(name)
        .unwrap_or_else(|| panic!("missing column {}", name))
}

#[test]
fn test_combine_joins_and_aggregates() {
    let ws = Workspace::new();
    let rows = ws.pipeline().combine().unwrap();

    // Requests 3 and 5 are terminal, candidate 5 only has a SOFT interview,
    // candidate 6 has no profile row but keeps its request with empty fields.
    let summary: Vec<_> = rows
        .iter()
        .map(|r| (r.candidate_id.clone().unwrap(), r.subjective_readiness_avg))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("1".to_string(), 7),
            ("2".to_string(), 3),
            ("4".to_string(), 5),
            ("6".to_string(), 4),
        ]
    );
    assert_eq!(rows[3].main_technology, None);

    assert_eq!(read_joined(ws.path("clients_interviews.csv")).unwrap(), rows);
}

#[test]
fn test_run_writes_matrix_and_state() {
    let ws = Workspace::new();
    let matrix = ws.pipeline().run().unwrap();

    // Candidate 4 lacks a main technology and candidate 6 lacks a profile.
    assert_eq!(matrix.len(), 2);
    assert_eq!(
        matrix.columns,
        vec![
            "status",
            "subjective_readiness_avg",
            "main_technology_Java",
            "main_technology_Python",
            "seniority_level_Senior",
            "seniority_level_Junior",
            "english_level_C1",
            "english_level_B1",
        ]
    );
    assert_eq!(column(&matrix, "status"), vec![1.0, 0.0]);
    assert_eq!(column(&matrix, "subjective_readiness_avg"), vec![1.0, 0.0]);
    assert_eq!(column(&matrix, "english_level_B1"), vec![0.0, 1.0]);

    assert_eq!(read_matrix(ws.path("features.csv")).unwrap(), matrix);

    let store = StateStore::new(ws.path("state.db")).unwrap();
    let state = store.load_state().unwrap();
    assert_eq!((state.scaler.min, state.scaler.max), (3, 7));
}

#[test]
fn test_reloaded_state_reproduces_matrix() {
    let ws = Workspace::new();
    let fitted = ws.pipeline().run().unwrap();

    // A fresh process: reopen the store and transform the same joined table.
    let matrix = ws
        .pipeline()
        .apply(ws.path("clients_interviews.csv"), ws.path("replayed.csv"))
        .unwrap();

    assert_eq!(matrix, fitted);
    assert_eq!(
        fs::read_to_string(ws.path("replayed.csv")).unwrap(),
        fs::read_to_string(ws.path("features.csv")).unwrap()
    );
}

#[test]
fn test_refit_is_deterministic() {
    let ws = Workspace::new();
    let mut pipeline = ws.pipeline();
    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scaled_values_stay_in_unit_interval() {
    let ws = Workspace::new();
    let mut pipeline = ws.pipeline();
    pipeline.run().unwrap();

    let fresh = "\
status,candidate_id,main_technology,seniority_level,english_level,subjective_readiness_avg
ACCEPTED,7,Java,Senior,C1,0
REJECT,8,Python,Junior,,12
ACCEPTED,9,Java,Junior,B1,5
";
    fs::write(ws.path("fresh.csv"), fresh).unwrap();
    let matrix = pipeline
        .apply(ws.path("fresh.csv"), ws.path("fresh_features.csv"))
        .unwrap();

    let scaled = column(&matrix, "subjective_readiness_avg");
    assert_eq!(scaled, vec![0.0, 1.0, 0.5]);
    assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_unknown_category_leaves_feature_file_untouched() {
    let ws = Workspace::new();
    let mut pipeline = ws.pipeline();
    pipeline.run().unwrap();
    let before = fs::read_to_string(ws.path("features.csv")).unwrap();

    let fresh = "\
status,candidate_id,main_technology,seniority_level,english_level,subjective_readiness_avg
ACCEPTED,7,Rust,Senior,C1,6
";
    fs::write(ws.path("fresh.csv"), fresh).unwrap();
    let err = pipeline
        .apply(ws.path("fresh.csv"), ws.path("features.csv"))
        .unwrap_err();

    assert!(matches!(err, Error::UnknownCategory { .. }));
    assert_eq!(fs::read_to_string(ws.path("features.csv")).unwrap(), before);
}

#[test]
fn test_ignore_policy_zero_fills_unknown_category() {
    let ws = Workspace::new();
    ws.pipeline().run().unwrap();

    let config = Config {
        unknown_category_policy: UnknownCategoryPolicy::Ignore,
        ..ws.config()
    };
    let store = StateStore::new(&config.state_db).unwrap();
    let pipeline = PreprocessingPipeline::new(store, PipelineConfig::from(&config));

    let fresh = "\
status,candidate_id,main_technology,seniority_level,english_level,subjective_readiness_avg
ACCEPTED,7,Rust,Senior,C1,6
";
    fs::write(ws.path("fresh.csv"), fresh).unwrap();
    let matrix = pipeline
        .apply(ws.path("fresh.csv"), ws.path("fresh_features.csv"))
        .unwrap();

    assert_eq!(column(&matrix, "main_technology_Java"), vec![0.0]);
    assert_eq!(column(&matrix, "main_technology_Python"), vec![0.0]);
    assert_eq!(column(&matrix, "seniority_level_Senior"), vec![1.0]);
}

#[test]
fn test_apply_without_saved_state_fails() {
    let ws = Workspace::new();
    let pipeline = ws.pipeline();
    pipeline.combine().unwrap();

    let err = pipeline
        .apply(ws.path("clients_interviews.csv"), ws.path("features.csv"))
        .unwrap_err();
    assert!(matches!(err, Error::StateNotFound(_)));
    assert!(!Path::new(&ws.path("features.csv")).exists());
}

#[test]
fn test_failed_state_save_leaves_no_new_feature_file() {
    let ws = Workspace::new();
    let mut pipeline = ws.pipeline();
    pipeline.run().unwrap();
    fs::remove_file(ws.path("features.csv")).unwrap();

    let conn = rusqlite::Connection::open(ws.path("state.db")).unwrap();
    conn.execute_batch("DROP TABLE transformer_state").unwrap();
    drop(conn);

    let err = pipeline.prepare().unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert!(!ws.path("features.csv").exists());
}

#[test]
fn test_float_formatted_ids_reach_the_matrix() {
    let ws = Workspace::new();
    let data = ws.path("data");
    fs::write(
        data.join("staffing_candidate_in_request_for_specialist.csv"),
        "id,status,candidate_id\n1,ACCEPTED,1.0\n2,REJECT,\n3,REJECT,2.0\n",
    )
    .unwrap();
    fs::write(
        data.join("staffing_interview.csv"),
        "id,candidate_id,interview_type,subjective_readiness\n1,1.0,TECH,8.0\n2,NA,TECH,3\n3,2.0,TECH,4.0\n",
    )
    .unwrap();

    let matrix = ws.pipeline().run().unwrap();
    assert_eq!(matrix.len(), 2);
    assert_eq!(column(&matrix, "main_technology_Java"), vec![1.0, 0.0]);
    assert_eq!(column(&matrix, "main_technology_Python"), vec![0.0, 1.0]);
}

#[test]
fn test_malformed_source_aborts_before_writing() {
    let ws = Workspace::new();
    fs::write(
        ws.path("data").join("staffing_interview.csv"),
        "id,candidate_id,interview_type\n1,1,TECH\n",
    )
    .unwrap();

    let err = ws.pipeline().run().unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedSource { ref source_name, ref column }
            if source_name == "interviews" && column == "subjective_readiness"
    ));
    assert!(!ws.path("clients_interviews.csv").exists());
    assert!(!ws.path("features.csv").exists());
}

#[test]
fn test_no_matching_rows_gives_empty_matrix() {
    let ws = Workspace::new();
    fs::write(
        ws.path("data").join("staffing_interview.csv"),
        "id,candidate_id,interview_type,subjective_readiness\n1,1,SOFT,9\n",
    )
    .unwrap();

    let matrix = ws.pipeline().run().unwrap();
    assert!(matrix.is_empty());
    assert_eq!(
        fs::read_to_string(ws.path("features.csv")).unwrap(),
        "status,subjective_readiness_avg\n"
    );
}

#[test]
fn test_in_memory_transform_matches_library_example() {
    use interviewfeatures::models::{CandidateProfile, CandidateRequestRecord, ReadinessObservation};
    use interviewfeatures::JoinEngine;

    let requests = vec![CandidateRequestRecord::new("C1", "ACCEPTED")];
    let profiles = vec![CandidateProfile::new("C1", Some("Go"), Some("Senior"), None)];
    let observations = vec![
        ReadinessObservation::new("C1", "TECH", 8),
        ReadinessObservation::new("C1", "TECH", 6),
        ReadinessObservation::new("C1", "SOFT", 10),
    ];

    let rows = JoinEngine::combine(&requests, &profiles, &observations);
    assert_eq!(rows[0].subjective_readiness_avg, 7);

    let (matrix, _) = FeatureTransformer::default().fit_transform(&rows).unwrap();
    assert_eq!(column(&matrix, "status"), vec![1.0]);
    assert_eq!(column(&matrix, "english_level_B1"), vec![1.0]);
    assert_eq!(column(&matrix, "subjective_readiness_avg"), vec![0.0]);
}
