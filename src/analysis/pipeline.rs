use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::analysis::joiner::JoinEngine;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::RecordLoader;
use crate::models::{FeatureMatrix, JoinedRow};
use crate::storage::{read_joined, write_joined, write_matrix, StateStore};
use crate::transform::{FeatureTransformer, FittedTransformerState};

/// Loader → join/aggregate → intermediate table → transformer → matrix + state.
pub struct PreprocessingPipeline {
    loader: RecordLoader,
    transformer: FeatureTransformer,
    store: StateStore,
    config: PipelineConfig,
}

impl PreprocessingPipeline {
    pub fn new(store: StateStore, config: PipelineConfig) -> Self {
        Self {
            loader: RecordLoader::new(
                &config.requests_path,
                &config.candidates_path,
                &config.interviews_path,
            ),
            transformer: FeatureTransformer::new(config.unknown_category_policy),
            store,
            config,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Both stages, as one run.
    pub fn run(&mut self) -> Result<FeatureMatrix> {
        self.combine()?;
        let (matrix, _) = self.prepare()?;
        Ok(matrix)
    }

    /// Load, join and aggregate the raw sources and persist the joined table.
    pub fn combine(&self) -> Result<Vec<JoinedRow>> {
        let pb = self.stage_bar(3, "combine");

        pb.set_message("loading sources");
        let sources = self.loader.load()?;
        pb.inc(1);

        pb.set_message("joining");
        let rows = JoinEngine::combine(&sources.requests, &sources.profiles, &sources.observations);
        pb.inc(1);

        pb.set_message("writing joined table");
        write_joined(&rows, &self.config.joined_csv)?;
        pb.inc(1);

        pb.finish_with_message("Combined sources");
        Ok(rows)
    }

    /// Fit the transformer on the persisted joined table, then persist the
    /// fitted state and the matrix.
    pub fn prepare(&mut self) -> Result<(FeatureMatrix, FittedTransformerState)> {
        let pb = self.stage_bar(4, "prepare");

        pb.set_message("reading joined table");
        let rows = read_joined(&self.config.joined_csv)?;
        pb.inc(1);

        pb.set_message("fitting");
        let (matrix, state) = self.transformer.fit_transform(&rows)?;
        pb.inc(1);

        // State first: a feature file on disk always has its state persisted.
        pb.set_message("saving transformer state");
        self.store.save_state(&state)?;
        pb.inc(1);

        pb.set_message("writing feature matrix");
        write_matrix(&matrix, &self.config.features_csv)?;
        pb.inc(1);

        pb.finish_with_message("Prepared features");
        tracing::info!(
            "Feature matrix has {} rows and {} columns",
            matrix.len(),
            matrix.columns.len()
        );
        Ok((matrix, state))
    }

    /// Transform a joined table with the persisted state. Never refits.
    pub fn apply<P: AsRef<Path>>(&self, input: P, output: P) -> Result<FeatureMatrix> {
        let state = self.store.load_state()?;
        let rows = read_joined(input)?;
        let matrix = self.transformer.transform(&rows, &state)?;
        write_matrix(&matrix, output)?;
        Ok(matrix)
    }

    fn stage_bar(&self, stages: u64, name: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(stages);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} {{msg}}",
                    name
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}
