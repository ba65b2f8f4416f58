//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
