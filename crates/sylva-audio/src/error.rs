//! Error types for the playback engine.

use thiserror::Error;

/// Errors that can occur while driving audio output.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Failed to query output device config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Unsupported output sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Output stream failed: {0}")]
    Stream(#[from] cpal::StreamError),
}

/// Result type alias for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;
