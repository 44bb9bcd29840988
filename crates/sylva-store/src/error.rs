//! Error types for the sample store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing stored samples.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Deleting is restricted to files inside the store directory.
    #[error("Path is outside the sample store: {}", .0.display())]
    OutsideStore(PathBuf),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
