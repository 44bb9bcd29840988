//! MusicGen inference via ONNX Runtime.
//!
//! Gated behind the `onnx` feature flag. Expects a merged text-to-audio
//! export with inputs `input_ids`, `attention_mask`, `max_new_tokens` and a
//! waveform head `audio_values` of shape `[batch, channels, samples]`.
//! Whether the chosen export bundles the audio decoder is probed once at
//! load, never rediscovered per call.

#[cfg(feature = "onnx")]
use crate::backend::{BackendInfo, GenerationBackend};
#[cfg(feature = "onnx")]
use crate::error::{GenError, GenResult};
#[cfg(feature = "onnx")]
use crate::tensor::RawTensor;
#[cfg(feature = "onnx")]
use std::path::Path;
#[cfg(feature = "onnx")]
use tracing::info;

/// MusicGen-style backend running on ONNX Runtime.
#[cfg(feature = "onnx")]
pub struct OnnxBackend {
    session: ort::Session,
    decodes_audio: bool,
}

#[cfg(feature = "onnx")]
impl OnnxBackend {
    /// Load a model export and probe its capability.
    pub fn load(model_path: &Path) -> GenResult<Self> {
        info!(path = %model_path.display(), "loading ONNX session");

        let session = ort::Session::builder()?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_intra_threads(num_cpus::get())?
            .commit_from_file(model_path)?;

        // Exports with a bundled EnCodec decoder expose the waveform head;
        // tokens-only exports stop at `audio_codes`.
        let decodes_audio = session.outputs.iter().any(|o| o.name == "audio_values");
        info!(decodes_audio, "ONNX session loaded");

        Ok(Self {
            session,
            decodes_audio,
        })
    }

    /// Fold an output view into the tagged tensor by rank.
    fn tensor_from_view(view: ndarray::ArrayViewD<'_, f32>) -> RawTensor {
        match view.ndim() {
            0 => RawTensor::Mono(Vec::new()),
            1 => RawTensor::Mono(view.iter().copied().collect()),
            2 => RawTensor::ChannelFirst(
                view.outer_iter()
                    .map(|row| row.iter().copied().collect())
                    .collect(),
            ),
            _ => RawTensor::Batched(
                view.outer_iter()
                    .map(|batch| {
                        batch
                            .outer_iter()
                            .map(|row| row.iter().copied().collect())
                            .collect()
                    })
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "onnx")]
impl GenerationBackend for OnnxBackend {
    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: "musicgen-onnx",
            decodes_audio: self.decodes_audio,
        }
    }

    fn generate(&self, prompt: &str, max_tokens: usize) -> GenResult<RawTensor> {
        if prompt.trim().is_empty() {
            return Err(GenError::EmptyPrompt);
        }
        if !self.decodes_audio {
            return Err(GenError::Backend(
                "model export has no bundled audio decoder".into(),
            ));
        }

        // Byte-level ids; the export carries its own embedding so full T5
        // tokenization is not reproduced here.
        let ids: Vec<i64> = prompt.trim().bytes().map(i64::from).collect();
        let len = ids.len();
        let input_ids = ndarray::Array2::from_shape_vec((1, len), ids)
            .map_err(|e| GenError::Backend(e.to_string()))?;
        let attention_mask = ndarray::Array2::<i64>::ones((1, len));
        let max_new_tokens = ndarray::arr1(&[max_tokens as i64]);

        let inputs = ort::inputs![
            "input_ids" => input_ids.view(),
            "attention_mask" => attention_mask.view(),
            "max_new_tokens" => max_new_tokens.view(),
        ]?;

        let outputs = self.session.run(inputs)?;
        let audio = outputs[0].try_extract_tensor::<f32>()?;

        Ok(Self::tensor_from_view(audio.view()))
    }
}
