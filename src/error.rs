// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RhymeError>;

#[derive(Error, Debug)]
pub enum RhymeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Text extraction failed for {source_name}: {message}")]
    Extraction {
        source_name: String,
        message: String,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
