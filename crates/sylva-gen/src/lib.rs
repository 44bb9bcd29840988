//! Sylva Gen - Text-to-audio generation
//!
//! This crate turns a prompt into a canonical stereo buffer:
//! - Generation backends (procedural synth, MusicGen via the `onnx` feature)
//! - Tagged raw-tensor canonicalization into two channels
//! - Post-processing (duration fit, peak normalization)
//! - Model cache lookup

pub mod backend;
pub mod error;
pub mod models;
pub mod onnx;
pub mod pipeline;
pub mod procedural;
pub mod tensor;

pub use backend::{model, BackendInfo, GenerationBackend};
pub use error::{GenError, GenResult};
pub use models::{ModelCache, ModelId, ModelSpec};
#[cfg(feature = "onnx")]
pub use onnx::OnnxBackend;
pub use pipeline::{fit_duration, normalize_peak, post_process, PEAK_TARGET};
pub use procedural::ProceduralBackend;
pub use tensor::{canonicalize, RawTensor};
