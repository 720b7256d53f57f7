use thiserror::Error;

/// Errors produced by media storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media object not found: {0}")]
    NotFound(String),

    #[error("invalid media path: {0}")]
    InvalidPath(String),

    #[error("object of {actual} bytes exceeds the {limit} byte limit")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
