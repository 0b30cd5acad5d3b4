use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::FeatureRow;

/// What `transform` does with a category that was not seen at fit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCategoryPolicy {
    /// Abort with `Error::UnknownCategory`.
    Error,
    /// Zero-fill the column's indicators for that row and log a warning.
    Ignore,
}

impl FromStr for UnknownCategoryPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(UnknownCategoryPolicy::Error),
            "ignore" => Ok(UnknownCategoryPolicy::Ignore),
            other => Err(Error::Config(format!(
                "unknown category policy must be 'error' or 'ignore', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownCategoryPolicy::Error => write!(f, "error"),
            UnknownCategoryPolicy::Ignore => write!(f, "ignore"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
}

impl CategoricalColumn {
    fn position(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

/// Learned one-hot layout: columns in source order, categories in
/// first-encounter order within each column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderState {
    pub columns: Vec<CategoricalColumn>,
}

impl EncoderState {
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.categories.len()).sum()
    }

    /// The (column, category) pairs in output order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().flat_map(|column| {
            column
                .categories
                .iter()
                .map(move |category| (column.name.as_str(), category.as_str()))
        })
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.pairs()
            .map(|(column, category)| format!("{}_{}", column, category))
            .collect()
    }

    /// Indicator values for one row, in `feature_names` order.
    pub fn encode(&self, row: &FeatureRow, policy: UnknownCategoryPolicy) -> Result<Vec<f64>> {
        let mut encoded = Vec::with_capacity(self.width());

        for column in &self.columns {
            let value = row.category(&column.name).ok_or_else(|| {
                Error::Config(format!("'{}' is not a categorical feature", column.name))
            })?;

            let hit = column.position(value);
            if hit.is_none() {
                match policy {
                    UnknownCategoryPolicy::Error => {
                        return Err(Error::UnknownCategory {
                            column: column.name.clone(),
                            category: value.to_string(),
                        });
                    }
                    UnknownCategoryPolicy::Ignore => {
                        tracing::warn!(
                            "Unknown category '{}' in column '{}', indicators zero-filled",
                            value,
                            column.name
                        );
                    }
                }
            }

            encoded.extend((0..column.categories.len()).map(|i| {
                if Some(i) == hit {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        Ok(encoded)
    }
}

pub struct OneHotEncoder {
    columns: Vec<String>,
}

impl OneHotEncoder {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn fit(&self, rows: &[FeatureRow]) -> Result<EncoderState> {
        let columns = self
            .columns
            .iter()
            .map(|name| {
                let mut seen = HashSet::new();
                let mut categories = Vec::new();

                for row in rows {
                    let value = row.category(name).ok_or_else(|| {
                        Error::Config(format!("'{}' is not a categorical feature", name))
                    })?;
                    if seen.insert(value) {
                        categories.push(value.to_string());
                    }
                }

                tracing::debug!("Column '{}': {} categories", name, categories.len());
                Ok(CategoricalColumn {
                    name: name.clone(),
                    categories,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EncoderState { columns })
    }
}
