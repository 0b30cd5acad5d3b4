use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{FeatureMatrix, FeatureRow, JoinedRow};
use crate::transform::encoder::{EncoderState, OneHotEncoder, UnknownCategoryPolicy};
use crate::transform::scaler::{MinMaxScaler, ScalerState};

pub const LABEL_COLUMN: &str = "status";
pub const READINESS_COLUMN: &str = "subjective_readiness_avg";
pub const CATEGORICAL_COLUMNS: &[&str] = &["main_technology", "seniority_level", "english_level"];

pub const REJECT_STATUS: &str = "REJECT";
pub const DEFAULT_ENGLISH_LEVEL: &str = "B1";

/// Everything `transform` needs to reproduce a fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittedTransformerState {
    pub encoder: EncoderState,
    pub scaler: ScalerState,
}

impl FittedTransformerState {
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec![LABEL_COLUMN.to_string(), READINESS_COLUMN.to_string()];
        names.extend(self.encoder.feature_names());
        names
    }
}

pub fn status_label(status: Option<&str>) -> u8 {
    if status == Some(REJECT_STATUS) {
        0
    } else {
        1
    }
}

/// Label, filter and impute joined rows.
///
/// Rows without a main technology or seniority level are dropped; a missing
/// English level becomes `DEFAULT_ENGLISH_LEVEL`. The candidate id is not
/// carried over.
pub fn prepare_rows(rows: &[JoinedRow]) -> Vec<FeatureRow> {
    let prepared: Vec<FeatureRow> = rows
        .iter()
        .filter_map(|row| {
            Some(FeatureRow {
                status: status_label(row.status.as_deref()),
                main_technology: row.main_technology.clone()?,
                seniority_level: row.seniority_level.clone()?,
                english_level: row
                    .english_level
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENGLISH_LEVEL.to_string()),
                subjective_readiness_avg: row.subjective_readiness_avg,
            })
        })
        .collect();

    if prepared.len() < rows.len() {
        tracing::info!(
            "Dropped {} rows missing main technology or seniority level",
            rows.len() - prepared.len()
        );
    }

    prepared
}

pub struct FeatureTransformer {
    encoder: OneHotEncoder,
    scaler: MinMaxScaler,
    policy: UnknownCategoryPolicy,
}

impl FeatureTransformer {
    pub fn new(policy: UnknownCategoryPolicy) -> Self {
        Self {
            encoder: OneHotEncoder::new(CATEGORICAL_COLUMNS),
            scaler: MinMaxScaler::new(READINESS_COLUMN),
            policy,
        }
    }

    pub fn fit(&self, rows: &[FeatureRow]) -> Result<FittedTransformerState> {
        let encoder = self.encoder.fit(rows)?;
        let readiness: Vec<i64> = rows.iter().map(|r| r.subjective_readiness_avg).collect();
        let scaler = self.scaler.fit(&readiness);

        tracing::info!(
            "Fitted transformer on {} rows: {} indicator columns",
            rows.len(),
            encoder.width()
        );

        Ok(FittedTransformerState { encoder, scaler })
    }

    pub fn fit_transform(
        &self,
        rows: &[JoinedRow],
    ) -> Result<(FeatureMatrix, FittedTransformerState)> {
        let prepared = prepare_rows(rows);
        let state = self.fit(&prepared)?;
        // Everything was just seen, so no category can be unknown here.
        let matrix = encode_rows(&prepared, &state, UnknownCategoryPolicy::Error)?;
        Ok((matrix, state))
    }

    /// Apply a previously fitted state. Never refits.
    pub fn transform(
        &self,
        rows: &[JoinedRow],
        state: &FittedTransformerState,
    ) -> Result<FeatureMatrix> {
        let prepared = prepare_rows(rows);
        encode_rows(&prepared, state, self.policy)
    }
}

impl Default for FeatureTransformer {
    fn default() -> Self {
        Self::new(UnknownCategoryPolicy::Error)
    }
}

fn encode_rows(
    rows: &[FeatureRow],
    state: &FittedTransformerState,
    policy: UnknownCategoryPolicy,
) -> Result<FeatureMatrix> {
    let mut matrix = FeatureMatrix::new(state.feature_names());

    for row in rows {
        let mut values = Vec::with_capacity(matrix.columns.len());
        values.push(f64::from(row.status));
        values.push(state.scaler.scale(row.subjective_readiness_avg));
        values.extend(state.encoder.encode(row, policy)?);
        matrix.rows.push(values);
    }

    if matrix.is_empty() {
        tracing::warn!("No rows to encode, feature matrix is empty");
    }

    Ok(matrix)
}
