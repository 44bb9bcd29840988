//! Model file cache.
//!
//! Resolves ONNX model files in the local cache directory. There is no
//! downloader: models are exported offline and dropped into the cache by
//! hand, and a missing file is reported as exactly that.

use crate::error::{GenError, GenResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Identifies a generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    /// MusicGen stereo small, ONNX export with bundled audio decoder.
    MusicgenStereoSmall,
}

/// Static facts about a model file.
pub struct ModelSpec {
    pub id: ModelId,
    /// Filename inside the cache directory.
    pub filename: &'static str,
    /// Upstream weights this file is exported from.
    pub source: &'static str,
    /// Expected file size in bytes, for sanity logging.
    pub size_bytes: u64,
}

impl ModelId {
    /// Static facts about this model's file.
    pub fn spec(&self) -> ModelSpec {
        match self {
            Self::MusicgenStereoSmall => ModelSpec {
                id: *self,
                filename: "musicgen-stereo-small.onnx",
                source: "https://huggingface.co/facebook/musicgen-stereo-small",
                size_bytes: 1_200_000_000,
            },
        }
    }

    /// Approximate size, for the missing-model hint.
    pub fn size_human(&self) -> &'static str {
        match self {
            Self::MusicgenStereoSmall => "1.2 GB",
        }
    }
}

/// Resolves model files under a cache directory.
pub struct ModelCache {
    dir: PathBuf,
}

impl ModelCache {
    /// Create a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check whether a model file is present.
    pub fn is_cached(&self, model: ModelId) -> bool {
        self.model_path(model).exists()
    }

    /// Local path for a model (whether or not it exists yet).
    pub fn model_path(&self, model: ModelId) -> PathBuf {
        self.dir.join(model.spec().filename)
    }

    /// Return the path to a cached model, or an error telling the user
    /// where to put it.
    pub fn ensure(&self, model: ModelId) -> GenResult<PathBuf> {
        let path = self.model_path(model);
        if path.exists() {
            info!(model = ?model, path = %path.display(), "model already cached");
            return Ok(path);
        }
        std::fs::create_dir_all(&self.dir)?;
        info!(
            model = ?model,
            size = model.size_human(),
            source = model.spec().source,
            "model not installed"
        );
        Err(GenError::ModelMissing { path })
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
