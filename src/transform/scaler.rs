use serde::{Deserialize, Serialize};

/// Bounds learned by `MinMaxScaler::fit`.
///
/// Bounds are stored as integers; the scaled column is an integer average, so
/// a reloaded state scales exactly as the fitted one did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalerState {
    pub column: String,
    pub min: i64,
    pub max: i64,
}

impl ScalerState {
    /// A single-valued (or empty) fit distribution.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Scale into [0, 1]. Degenerate bounds map every value to 0.
    pub fn scale(&self, value: i64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let min = i128::from(self.min);
        let range = (i128::from(self.max) - min) as f64;
        ((i128::from(value) - min) as f64 / range).clamp(0.0, 1.0)
    }
}

pub struct MinMaxScaler {
    column: String,
}

impl MinMaxScaler {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }

    pub fn fit(&self, values: &[i64]) -> ScalerState {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);

        let state = ScalerState {
            column: self.column.clone(),
            min,
            max,
        };

        if state.is_degenerate() {
            tracing::warn!(
                "Degenerate scale for '{}' (min = max = {}), all values scale to 0",
                self.column,
                min
            );
        } else {
            tracing::debug!("Scaler bounds for '{}': [{}, {}]", self.column, min, max);
        }

        state
    }
}
