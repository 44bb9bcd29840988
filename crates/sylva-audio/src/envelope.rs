//! Amplitude envelope for waveform display.
//!
//! Reduces a mono signal to one peak-magnitude column per display pixel,
//! plus the inverse mapping from a pixel coordinate back to a sample
//! position for click-to-seek.

/// Per-pixel peak magnitudes for one displayed buffer.
///
/// Column `i` covers the window of samples `[i*len/width, (i+1)*len/width)`
/// and holds the largest absolute amplitude inside it. Recomputed only when
/// the source buffer or the display width changes; disposable otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    columns: Vec<f32>,
}

impl Envelope {
    /// Compute an envelope of `width` columns from mono samples.
    ///
    /// Windows are contiguous and cover the whole signal. When `width`
    /// exceeds the sample count some windows are empty and their columns
    /// are 0.0; an empty signal yields all-zero columns.
    pub fn compute(samples: &[f32], width: usize) -> Self {
        let len = samples.len();
        let mut columns = Vec::with_capacity(width);
        for i in 0..width {
            let start = i * len / width;
            let end = (i + 1) * len / width;
            let peak = samples[start..end]
                .iter()
                .fold(0.0f32, |acc, s| acc.max(s.abs()));
            columns.push(peak);
        }
        Self { columns }
    }

    /// Peak magnitude per display column.
    pub fn columns(&self) -> &[f32] {
        &self.columns
    }

    /// Number of display columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Map a pixel coordinate on a waveform of `width` pixels to a sample
/// position in a buffer of `len` samples.
///
/// The coordinate is clamped to the drawn area first, so clicks in the
/// horizontal padding snap to the nearest end. The result is in
/// `0..=len` — the far right edge maps to the buffer length itself.
pub fn position_for_x(x: f32, width: f32, len: usize) -> usize {
    if width <= 0.0 || len == 0 {
        return 0;
    }
    let ratio = (x / width).clamp(0.0, 1.0);
    let position = (f64::from(ratio) * len as f64).round() as usize;
    position.min(len)
}
