//! Sylva Core - Foundation types for the audio sketchpad
//!
//! This crate provides the types shared across the workspace:
//! - Stereo sample buffers handed between generation, playback, and display
//! - The immutable application configuration
//! - The core error type

pub mod buffer;
pub mod config;
pub mod error;

pub use buffer::{SharedBuffer, StereoBuffer, CHANNELS};
pub use config::AppConfig;
pub use error::{CoreError, Result};
