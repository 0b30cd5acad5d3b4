pub mod encoder;
pub mod scaler;
pub mod features;

pub use encoder::{CategoricalColumn, EncoderState, OneHotEncoder, UnknownCategoryPolicy};
pub use scaler::{MinMaxScaler, ScalerState};
pub use features::{prepare_rows, FeatureTransformer, FittedTransformerState};
