//! Device records: the standardized schema, the standardizer that produces
//! it from raw source objects, and the pairwise merger.

pub mod merge;
pub mod schema;
pub mod standardize;

pub use merge::merge;
pub use schema::*;
pub use standardize::{normalize_program_changes, standardize, standardize_source_device};
