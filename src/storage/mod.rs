pub mod sqlite;
pub mod tables;

pub use sqlite::StateStore;
pub use tables::{read_joined, read_matrix, write_joined, write_matrix};
