// src/utils/error.rs
use thiserror::Error;

// Fetch failures are the only errors extraction can surface.
// A missing section, label or value is an absent field, never an error.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500 Internal Server Error

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Request refused by server ({0}), likely rate limited")]
    RateLimited(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("{0}")]
    Fetch(#[from] FetchError), // Automatically convert fetch errors

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}
