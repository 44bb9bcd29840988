//! Raw backend output and channel canonicalization.
//!
//! A generation backend guarantees nothing about its output layout beyond
//! one of four shapes, so the raw result is a tagged variant and every tag
//! has an explicit rule for folding it into exactly two equal-length
//! channels. Canonicalization never fails: malformed output degrades into
//! something audible, preferring duplication over truncation-to-silence.

use sylva_core::StereoBuffer;
use tracing::warn;

/// Raw tensor returned by a generation backend.
///
/// The variants cover the shapes observed from MusicGen-style models across
/// versions: a mono vector, channel-major or sample-major rank-2 output, and
/// rank-3 output with a leading batch axis.
#[derive(Debug, Clone)]
pub enum RawTensor {
    /// Rank 1: a single channel.
    Mono(Vec<f32>),
    /// Rank 2, channel-major: `rows[channel][sample]`.
    ChannelFirst(Vec<Vec<f32>>),
    /// Rank 2, sample-major: `rows[sample][channel]`.
    ChannelLast(Vec<Vec<f32>>),
    /// Rank 3: leading batch axis over channel-major entries.
    Batched(Vec<Vec<Vec<f32>>>),
}

impl RawTensor {
    /// Total number of scalar samples across all axes. Logging only.
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Mono(samples) => samples.len(),
            Self::ChannelFirst(rows) | Self::ChannelLast(rows) => {
                rows.iter().map(Vec::len).sum()
            }
            Self::Batched(batches) => batches
                .iter()
                .flat_map(|rows| rows.iter())
                .map(Vec::len)
                .sum(),
        }
    }

    /// Short shape description for logs, e.g. `[1, 2, 160000]`.
    pub fn shape_desc(&self) -> String {
        match self {
            Self::Mono(samples) => format!("[{}]", samples.len()),
            Self::ChannelFirst(rows) | Self::ChannelLast(rows) => {
                let inner = rows.first().map(Vec::len).unwrap_or(0);
                format!("[{}, {}]", rows.len(), inner)
            }
            Self::Batched(batches) => {
                let rows = batches.first().map(Vec::len).unwrap_or(0);
                let inner = batches
                    .first()
                    .and_then(|b| b.first())
                    .map(Vec::len)
                    .unwrap_or(0);
                format!("[{}, {}, {}]", batches.len(), rows, inner)
            }
        }
    }
}

/// Fold any raw tensor into exactly two channels at `sample_rate`.
///
/// Policy, applied in order:
/// 1. strip the leading batch axis (first entry wins, extras are dropped),
/// 2. duplicate mono into both channels,
/// 3. a channel-major tensor with more than two rows is really sample-major
///    data, so it is transposed; a channel axis still wider than two keeps
///    only the first two channels (deliberately lossy),
/// 4. anything else falls back to duplicating channel 0 into channel 1.
///
/// Ragged rows are clipped to the shortest row so the equal-length
/// invariant holds.
pub fn canonicalize(raw: RawTensor, sample_rate: u32) -> StereoBuffer {
    match raw {
        RawTensor::Mono(samples) => {
            let right = samples.clone();
            StereoBuffer::new(samples, right, sample_rate)
        }
        RawTensor::ChannelFirst(rows) => from_channel_major(rows, sample_rate),
        RawTensor::ChannelLast(rows) => from_sample_major(rows, sample_rate),
        RawTensor::Batched(mut batches) => {
            if batches.len() > 1 {
                warn!(
                    batches = batches.len(),
                    "multi-entry batch from backend, keeping the first"
                );
            }
            match batches.drain(..).next() {
                Some(rows) => from_channel_major(rows, sample_rate),
                None => StereoBuffer::silent(0, sample_rate),
            }
        }
    }
}

/// Canonicalize channel-major rows: 1 row duplicates, 2 rows map directly,
/// more than 2 rows means the leading axis is the long (sample) axis and
/// the data gets transposed.
fn from_channel_major(mut rows: Vec<Vec<f32>>, sample_rate: u32) -> StereoBuffer {
    if rows.len() > 2 {
        return from_sample_major(rows, sample_rate);
    }
    let right = if rows.len() == 2 { rows.pop() } else { None };
    let left = rows.pop();
    match (left, right) {
        (Some(left), Some(right)) => StereoBuffer::new(left, right, sample_rate),
        (Some(left), None) => {
            warn!("single-channel output, duplicating into both channels");
            let right = left.clone();
            StereoBuffer::new(left, right, sample_rate)
        }
        _ => StereoBuffer::silent(0, sample_rate),
    }
}

/// Canonicalize sample-major frames: channel `c` is column `c`. Wider than
/// two columns keeps the first two; a single column duplicates.
fn from_sample_major(frames: Vec<Vec<f32>>, sample_rate: u32) -> StereoBuffer {
    let width = frames.iter().map(Vec::len).min().unwrap_or(0);
    if width == 0 || frames.is_empty() {
        return StereoBuffer::silent(0, sample_rate);
    }
    if width > 2 {
        warn!(channels = width, "more than two channels, keeping the first two");
    }
    let mut left = Vec::with_capacity(frames.len());
    let mut right = Vec::with_capacity(frames.len());
    for frame in &frames {
        left.push(frame[0]);
        // A single-column tensor duplicates its only channel.
        right.push(if width >= 2 { frame[1] } else { frame[0] });
    }
    StereoBuffer::new(left, right, sample_rate)
}
