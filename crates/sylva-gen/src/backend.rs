//! Generation backend contract and model constants.
//!
//! A backend turns a text prompt and a token budget into a raw tensor. What
//! it can do — in particular whether it decodes tokens to audio itself — is
//! fixed when it is constructed, never discovered per call.

use crate::error::GenResult;
use crate::tensor::RawTensor;

/// Constants for the MusicGen-style stereo model every backend emulates.
pub mod model {
    /// Output sample rate, Hz.
    pub const SAMPLE_RATE: u32 = 32_000;
    /// Hard cap on generated positions.
    pub const MAX_POSITION_EMBEDDINGS: usize = 2048;
    /// Classifier-free guidance scale used for sampling.
    pub const GUIDANCE_SCALE: f32 = 3.0;
    /// Padding token id.
    pub const PAD_TOKEN_ID: u32 = 2048;
    /// Beginning-of-stream token id.
    pub const BOS_TOKEN_ID: u32 = 2048;

    /// Audio samples one token stands for: the model's position limit spans
    /// 30 seconds of audio.
    pub fn samples_per_token() -> f64 {
        30.0 * SAMPLE_RATE as f64 / MAX_POSITION_EMBEDDINGS as f64
    }

    /// Tokens to request for a clip of `duration_secs`, clamped to the
    /// position limit.
    pub fn token_budget(duration_secs: f32) -> usize {
        let needed = (duration_secs as f64 * SAMPLE_RATE as f64 / samples_per_token()) as usize;
        needed.min(MAX_POSITION_EMBEDDINGS)
    }

    /// Samples a backend is expected to produce for a token count.
    pub fn samples_for_tokens(tokens: usize) -> usize {
        (tokens as f64 * samples_per_token()) as usize
    }
}

/// What a backend is, decided once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInfo {
    /// Short name for logs and the status line.
    pub name: &'static str,
    /// True when the backend emits waveforms directly; false when it emits
    /// raw codec tokens that would need a separate decoder.
    pub decodes_audio: bool,
}

/// A source of raw audio tensors.
///
/// `Send + Sync` so one instance constructed at startup can be shared with
/// generation worker threads.
pub trait GenerationBackend: Send + Sync {
    /// Capability and identity, fixed at construction.
    fn info(&self) -> BackendInfo;

    /// Produce a raw tensor for `prompt`, targeting `max_tokens` tokens.
    ///
    /// The returned shape is deliberately unconstrained; callers push it
    /// through [`crate::tensor::canonicalize`].
    fn generate(&self, prompt: &str, max_tokens: usize) -> GenResult<RawTensor>;
}

#[cfg(test)]
mod tests {
    use super::model;

    #[test]
    fn test_samples_per_token() {
        // 30 s * 32000 Hz / 2048 positions = 468.75
        assert!((model::samples_per_token() - 468.75).abs() < 1e-9);
    }

    #[test]
    fn test_token_budget_for_durations() {
        // 5 s: 5 * 32000 / 468.75 = 341.33… → 341 tokens.
        assert_eq!(model::token_budget(5.0), 341);
        // 8 s stays well under the position limit.
        assert_eq!(model::token_budget(8.0), 546);
    }

    #[test]
    fn test_token_budget_clamps_to_position_limit() {
        assert_eq!(model::token_budget(120.0), model::MAX_POSITION_EMBEDDINGS);
    }

    #[test]
    fn test_samples_for_tokens_round_trip() {
        let tokens = model::token_budget(5.0);
        let samples = model::samples_for_tokens(tokens);
        // Close to the requested 160000, but not exact — the duration
        // fitter makes up the difference.
        assert!((samples as i64 - 160_000i64).unsigned_abs() < 1_000);
    }
}
