//! Errors of the orchestration layer. The substitution core itself never fails.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not encode or decode state: {0}")]
    StateEncoding(#[from] bincode::Error),

    #[error("invalid dictionary asset {path}: {message}")]
    InvalidAsset { path: PathBuf, message: String },

    #[error("invalid import file: {0}")]
    InvalidImport(String),

    #[error("markup error: {0}")]
    Markup(String),

    #[error("both {0} are required")]
    MissingField(&'static str),

    #[error("word not in dictionary: {0}")]
    UnknownWord(String),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
