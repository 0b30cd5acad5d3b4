pub mod config;
pub mod error;
pub mod models;
pub mod loader;
pub mod analysis;
pub mod transform;
pub mod storage;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use loader::RecordLoader;
pub use analysis::{JoinEngine, PreprocessingPipeline};
pub use transform::{FeatureTransformer, FittedTransformerState, UnknownCategoryPolicy};
pub use storage::StateStore;
