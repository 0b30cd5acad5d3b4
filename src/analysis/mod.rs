pub mod aggregator;
pub mod joiner;
pub mod pipeline;

pub use aggregator::{aggregate_readiness, ReadinessAggregator};
pub use joiner::JoinEngine;
pub use pipeline::PreprocessingPipeline;
