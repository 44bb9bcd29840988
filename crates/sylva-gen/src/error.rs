//! Error types for the generation subsystem.

use thiserror::Error;

/// Errors that can occur while generating audio.
#[derive(Debug, Error)]
pub enum GenError {
    /// The prompt was empty after trimming whitespace.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The requested model file is not present in the local cache.
    #[error("Model not installed: expected {}", path.display())]
    ModelMissing { path: std::path::PathBuf },

    /// The backend could not produce a tensor.
    #[error("Backend failure: {0}")]
    Backend(String),

    /// ONNX Runtime error.
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    Onnx(#[from] ort::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for generation operations.
pub type GenResult<T> = std::result::Result<T, GenError>;
