//! Linear boundary fades.
//!
//! A short linear ramp at each edge of a buffer suppresses the click that a
//! hard onset or cutoff would produce, both at the start of playback and at
//! the loop seam. The ramp length is fixed at construction (derived from the
//! configured fade duration) and the gain lookup is plain arithmetic, so it
//! is safe to evaluate per-sample inside the audio callback.

use sylva_core::StereoBuffer;

/// Applies linear fade-in and fade-out ramps of a fixed sample length.
///
/// The ramp spans `fade_samples` points from exactly 0.0 at the outermost
/// sample to exactly 1.0 at the innermost. Buffers shorter than the ramp
/// pass through unchanged; a length of zero disables fading entirely.
#[derive(Debug, Clone, Copy)]
pub struct Fader {
    fade_samples: usize,
}

impl Fader {
    /// A fader with the given ramp length in samples.
    pub fn new(fade_samples: usize) -> Self {
        Self { fade_samples }
    }

    /// Ramp length in samples.
    pub fn fade_samples(&self) -> usize {
        self.fade_samples
    }

    /// Ramp gain at `i` steps in from the buffer edge.
    ///
    /// Evenly spaced over `fade_samples` points including both endpoints,
    /// so `ramp(0) == 0.0` and `ramp(fade_samples - 1) == 1.0`. A one-sample
    /// ramp degenerates to a single zeroed edge sample.
    fn ramp(&self, i: usize) -> f32 {
        if self.fade_samples <= 1 {
            return 0.0;
        }
        i as f32 / (self.fade_samples - 1) as f32
    }

    /// Combined fade gain for the sample at absolute `position` in a buffer
    /// of `len` samples per channel.
    ///
    /// Positions inside the leading ramp take the fade-in gain, positions
    /// inside the trailing ramp take the fade-out gain, and a buffer shorter
    /// than twice the ramp multiplies the two where they overlap. Buffers
    /// shorter than one ramp get unity gain everywhere, matching the
    /// whole-buffer apply functions. Allocation-free.
    pub fn gain_at(&self, position: usize, len: usize) -> f32 {
        let n = self.fade_samples;
        if n == 0 || len < n || position >= len {
            return 1.0;
        }
        let mut gain = 1.0;
        if position < n {
            gain *= self.ramp(position);
        }
        if position >= len - n {
            gain *= self.ramp(len - 1 - position);
        }
        gain
    }

    /// Apply the fade-in ramp to the head of both channels.
    pub fn apply_fade_in(&self, buffer: StereoBuffer) -> StereoBuffer {
        let n = self.fade_samples;
        if n == 0 || buffer.len() < n {
            return buffer;
        }
        let sample_rate = buffer.sample_rate();
        let (mut left, mut right) = buffer.into_channels();
        for i in 0..n {
            let gain = self.ramp(i);
            left[i] *= gain;
            right[i] *= gain;
        }
        StereoBuffer::new(left, right, sample_rate)
    }

    /// Apply the fade-out ramp to the tail of both channels.
    pub fn apply_fade_out(&self, buffer: StereoBuffer) -> StereoBuffer {
        let n = self.fade_samples;
        let len = buffer.len();
        if n == 0 || len < n {
            return buffer;
        }
        let sample_rate = buffer.sample_rate();
        let (mut left, mut right) = buffer.into_channels();
        for i in 0..n {
            let gain = self.ramp(i);
            left[len - 1 - i] *= gain;
            right[len - 1 - i] *= gain;
        }
        StereoBuffer::new(left, right, sample_rate)
    }
}
