use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RegroupError {
    #[error("Record {index} has no '{key}' field (strict mode rejects records without the grouping key)")]
    InvalidRecord { index: usize, key: String },

    #[error("Input element {index} is not a JSON object")]
    NotARecord { index: usize },

    #[error("Failed to read input {path}: {source}")]
    InputReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse input: {detail}")]
    InputParseError { detail: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParseError { path: PathBuf, detail: String },

    #[error("No grouping key given. Pass --key <field> or set `key` in the config file")]
    MissingGroupKey,
}
