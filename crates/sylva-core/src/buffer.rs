//! Stereo sample buffers.
//!
//! The canonical audio container: exactly two channels of equal length at a
//! fixed sample rate. A buffer is built once by the generation pipeline (or
//! loaded from disk) and read-only afterwards; playback and display share it
//! through [`SharedBuffer`].

use std::sync::Arc;

/// Channel count every downstream consumer assumes.
pub const CHANNELS: usize = 2;

/// A two-channel sample buffer at a fixed sample rate.
///
/// Both channels always hold the same number of samples. Amplitudes are
/// nominally within [-1, 1] after normalization but are not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl StereoBuffer {
    /// Create a buffer from two channels.
    ///
    /// If the channels disagree in length, both are truncated to the shorter
    /// one so the equal-length invariant holds. The generation pipeline
    /// always produces equal lengths; only tolerant file loaders can
    /// disagree.
    pub fn new(mut left: Vec<f32>, mut right: Vec<f32>, sample_rate: u32) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self {
            left,
            right,
            sample_rate,
        }
    }

    /// A silent buffer of `len` samples per channel.
    pub fn silent(len: usize, sample_rate: u32) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
            sample_rate,
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Buffer duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f32 / self.sample_rate as f32
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Largest absolute amplitude across both channels, 0.0 when empty.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Per-sample mean of the two channels. Used for display downsampling.
    pub fn mono_fold(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect()
    }

    /// Iterate over interleaved (left, right) frames, for file writers.
    pub fn frames(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.left
            .iter()
            .copied()
            .zip(self.right.iter().copied())
    }

    /// Consume the buffer, returning its channels. Used by the pipeline
    /// stages that rebuild the buffer with transformed samples.
    pub fn into_channels(self) -> (Vec<f32>, Vec<f32>) {
        (self.left, self.right)
    }
}

/// Arc-wrapped buffer for shared read-only ownership.
pub type SharedBuffer = Arc<StereoBuffer>;
