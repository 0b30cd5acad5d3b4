use serde::{Deserialize, Serialize};

/// A joined row after labelling and imputation, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub status: u8,
    pub main_technology: String,
    pub seniority_level: String,
    pub english_level: String,
    pub subjective_readiness_avg: i64,
}

impl FeatureRow {
    pub fn category(&self, column: &str) -> Option<&str> {
        match column {
            "main_technology" => Some(self.main_technology.as_str()),
            "seniority_level" => Some(self.seniority_level.as_str()),
            "english_level" => Some(self.english_level.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }
}
