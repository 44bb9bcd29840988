//! Sylva Store - On-disk sample library
//!
//! Persists generated buffers as 32-bit float WAV files in one flat
//! directory and lists them back newest-first. Reading is tolerant:
//! integer WAVs are scaled to float, mono files are duplicated to stereo,
//! and extra channels beyond two are dropped.

pub mod error;

pub use error::{StoreError, StoreResult};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use sylva_core::{StereoBuffer, CHANNELS};
use tracing::{debug, info};

/// One stored sample, as returned by [`SampleStore::list`].
#[derive(Debug, Clone)]
pub struct StoredSample {
    pub path: PathBuf,
    /// File name without the `.wav` extension.
    pub stem: String,
    pub modified: SystemTime,
}

/// A flat directory of WAV samples.
#[derive(Debug, Clone)]
pub struct SampleStore {
    dir: PathBuf,
}

impl SampleStore {
    /// A store rooted at `dir`. The directory is created lazily on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store's root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a buffer as `<stem>.wav`, returning the full path.
    ///
    /// Samples are stored as interleaved 32-bit float, so a later read
    /// reproduces the buffer bit-exactly. An existing file with the same
    /// stem is overwritten.
    pub fn write(&self, buffer: &StereoBuffer, stem: &str) -> StoreResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{stem}.wav"));

        let spec = WavSpec {
            channels: CHANNELS as u16,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec)?;
        for (l, r) in buffer.frames() {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
        writer.finalize()?;

        info!(
            path = %path.display(),
            samples = buffer.len(),
            "sample written"
        );
        Ok(path)
    }

    /// Read a WAV file back into a stereo buffer.
    ///
    /// Accepts float and integer sample formats at any bit depth and any
    /// channel count: integers are scaled by their full-scale value, mono
    /// is duplicated to both channels, channels beyond the second are
    /// dropped.
    pub fn read(&self, path: &Path) -> StoreResult<StereoBuffer> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let buffer = if channels == 1 {
            StereoBuffer::new(samples.clone(), samples, spec.sample_rate)
        } else {
            let mut left = Vec::with_capacity(samples.len() / channels);
            let mut right = Vec::with_capacity(samples.len() / channels);
            for frame in samples.chunks_exact(channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            StereoBuffer::new(left, right, spec.sample_rate)
        };

        debug!(
            path = %path.display(),
            samples = buffer.len(),
            sample_rate = buffer.sample_rate(),
            "sample read"
        );
        Ok(buffer)
    }

    /// List stored samples, newest first.
    ///
    /// Non-WAV files are skipped. A store whose directory does not exist
    /// yet is simply empty.
    pub fn list(&self) -> StoreResult<Vec<StoredSample>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut samples = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("wav") {
                continue;
            }
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let modified = entry.metadata()?.modified()?;
            samples.push(StoredSample {
                path,
                stem,
                modified,
            });
        }

        samples.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.stem.cmp(&a.stem))
        });
        Ok(samples)
    }

    /// Delete a stored sample.
    ///
    /// Refuses paths that do not resolve to a direct child of the store
    /// directory, so a stale or forged path cannot remove files elsewhere.
    pub fn delete(&self, path: &Path) -> StoreResult<()> {
        let canonical = path.canonicalize()?;
        let dir = self.dir.canonicalize()?;
        if canonical.parent() != Some(dir.as_path()) {
            return Err(StoreError::OutsideStore(path.to_path_buf()));
        }
        fs::remove_file(&canonical)?;
        info!(path = %canonical.display(), "sample deleted");
        Ok(())
    }
}

/// Derive a file stem from a prompt and a timestamp.
///
/// The first three words of the prompt are joined with dashes and stripped
/// to `[A-Za-z0-9_-]`; a prompt with nothing usable falls back to
/// `sample`. The timestamp suffix keeps repeated prompts from colliding.
pub fn file_stem(prompt: &str, timestamp: DateTime<Local>) -> String {
    let joined = prompt
        .split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join("-");
    let name: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let name = if name.is_empty() { "sample" } else { &name };
    format!("{name}-{}", timestamp.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    const SR: u32 = 32_000;

    fn test_buffer() -> StereoBuffer {
        let left: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        let right: Vec<f32> = (0..64).map(|i| -(i as f32) / 64.0).collect();
        StereoBuffer::new(left, right, SR)
    }

    #[test]
    fn test_write_then_read_is_bit_exact() {
        let dir = tempdir().unwrap();
        let store = SampleStore::new(dir.path());
        let buffer = test_buffer();

        let path = store.write(&buffer, "test-sample").unwrap();
        assert!(path.ends_with("test-sample.wav"));

        let loaded = store.read(&path).unwrap();
        assert_eq!(loaded, buffer);
        assert_eq!(loaded.sample_rate(), SR);
    }

    #[test]
    fn test_read_mono_duplicates_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: SR,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [0.1f32, -0.4, 0.9] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let store = SampleStore::new(dir.path());
        let buffer = store.read(&path).unwrap();
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.left(), buffer.right());
        assert!((buffer.left()[1] + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_read_int16_scales_to_float() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("int.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for s in [16_384i16, -16_384, 0, 32_767] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let store = SampleStore::new(dir.path());
        let buffer = store.read(&path).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.sample_rate(), 44_100);
        assert!((buffer.left()[0] - 0.5).abs() < 1e-4);
        assert!((buffer.right()[0] + 0.5).abs() < 1e-4);
        assert!((buffer.right()[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_read_drops_channels_beyond_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.wav");
        let spec = WavSpec {
            channels: 4,
            sample_rate: SR,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for frame in 0..3 {
            for ch in 0..4 {
                writer.write_sample(frame as f32 + ch as f32 * 0.1).unwrap();
            }
        }
        writer.finalize().unwrap();

        let store = SampleStore::new(dir.path());
        let buffer = store.read(&path).unwrap();
        assert_eq!(buffer.len(), 3);
        assert!((buffer.left()[2] - 2.0).abs() < 1e-6);
        assert!((buffer.right()[2] - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_list_newest_first() {
        let dir = tempdir().unwrap();
        let store = SampleStore::new(dir.path());
        let buffer = test_buffer();

        store.write(&buffer, "alpha").unwrap();
        store.write(&buffer, "beta").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        // beta wins on mtime, or on the name tiebreak within the same tick.
        assert_eq!(listed[0].stem, "beta");
        assert_eq!(listed[1].stem, "alpha");
    }

    #[test]
    fn test_list_skips_non_wav() {
        let dir = tempdir().unwrap();
        let store = SampleStore::new(dir.path());
        store.write(&test_buffer(), "keep").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not audio").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].stem, "keep");
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let store = SampleStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_inside_store() {
        let dir = tempdir().unwrap();
        let store = SampleStore::new(dir.path());
        let path = store.write(&test_buffer(), "doomed").unwrap();

        store.delete(&path).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_refuses_outside_paths() {
        let store_dir = tempdir().unwrap();
        let other_dir = tempdir().unwrap();
        let store = SampleStore::new(store_dir.path());
        // The store dir must exist for the guard comparison.
        store.write(&test_buffer(), "anchor").unwrap();

        let outside = other_dir.path().join("victim.wav");
        fs::write(&outside, b"RIFF").unwrap();

        let err = store.delete(&outside).unwrap_err();
        assert!(matches!(err, StoreError::OutsideStore(_)));
        assert!(outside.exists());
    }

    #[test]
    fn test_file_stem_uses_first_three_words() {
        let ts = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        assert_eq!(
            file_stem("warm tape hiss loop pedal", ts),
            "warm-tape-hiss-20240301-143005"
        );
    }

    #[test]
    fn test_file_stem_strips_punctuation() {
        let ts = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        assert_eq!(file_stem("lo-fi! beat?", ts), "lo-fi-beat-20240301-143005");
    }

    #[test]
    fn test_file_stem_empty_prompt_falls_back() {
        let ts = Local.with_ymd_and_hms(2024, 3, 1, 14, 30, 5).unwrap();
        assert_eq!(file_stem("   ", ts), "sample-20240301-143005");
        assert_eq!(file_stem("???", ts), "sample-20240301-143005");
    }
}
