pub mod record;
pub mod feature;

pub use record::*;
pub use feature::*;
