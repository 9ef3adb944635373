use std::path::PathBuf;

use pdfoutline_core::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input directory {0} not found")]
    InputNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed configuration file: {0}")]
    ConfigFile(String),

    #[error("At least one file extension must be configured")]
    NoExtensions,

    #[error("Failed to write {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize outline: {0}")]
    Serialize(#[from] serde_json::Error),
}
