// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can surface to the caller of a pipeline run.
/// Extraction and classification never produce these; they skip and continue.
#[derive(Debug, Error)]
pub enum Error {
    #[error("required input not found: {}", path.display())]
    InputMissing { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed sheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn input_missing(path: impl Into<PathBuf>) -> Self {
        Error::InputMissing { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
