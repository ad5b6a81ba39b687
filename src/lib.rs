pub mod config;
pub mod dataset;
pub mod display;
pub mod errors;
pub mod group;
pub mod input;
pub mod types;

pub use group::{GroupedResult, group_by, try_group_by};
pub use types::{GroupValue, MissingKeyPolicy, Record};
