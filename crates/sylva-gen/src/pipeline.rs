//! Post-processing pipeline: shape → length → level.
//!
//! Runs after the backend returns a raw tensor and before the result is
//! persisted or handed to playback: canonicalize the channels, fit the
//! duration exactly, and peak-normalize with headroom. No fading happens
//! here; boundary fades are playback's job, where the loop seam lives.

use crate::tensor::{canonicalize, RawTensor};
use sylva_core::StereoBuffer;
use tracing::debug;

/// Absolute peak every non-silent buffer is scaled to, leaving 10%
/// headroom against clipping on playback hardware.
pub const PEAK_TARGET: f32 = 0.9;

/// Trim or zero-pad a buffer to exactly `target_samples` per channel.
///
/// Longer buffers keep their prefix; shorter buffers are right-padded with
/// silence. Trimming can cut a non-silent boundary — smoothing that click
/// is the caller's concern, not this function's.
pub fn fit_duration(buffer: StereoBuffer, target_samples: usize) -> StereoBuffer {
    if buffer.len() == target_samples {
        return buffer;
    }
    debug!(
        from = buffer.len(),
        to = target_samples,
        "fitting buffer duration"
    );
    let sample_rate = buffer.sample_rate();
    let (mut left, mut right) = buffer.into_channels();
    left.resize(target_samples, 0.0);
    right.resize(target_samples, 0.0);
    StereoBuffer::new(left, right, sample_rate)
}

/// Scale the buffer so its absolute peak lands on [`PEAK_TARGET`].
///
/// A silent buffer is returned unchanged — never a divide by zero.
pub fn normalize_peak(buffer: StereoBuffer) -> StereoBuffer {
    let peak = buffer.peak();
    if peak <= 0.0 {
        return buffer;
    }
    let gain = PEAK_TARGET / peak;
    let sample_rate = buffer.sample_rate();
    let (mut left, mut right) = buffer.into_channels();
    for s in left.iter_mut().chain(right.iter_mut()) {
        *s *= gain;
    }
    StereoBuffer::new(left, right, sample_rate)
}

/// Full pipeline: raw tensor → canonical stereo → exact length → safe level.
pub fn post_process(raw: RawTensor, target_samples: usize, sample_rate: u32) -> StereoBuffer {
    let buffer = canonicalize(raw, sample_rate);
    let buffer = fit_duration(buffer, target_samples);
    normalize_peak(buffer)
}
