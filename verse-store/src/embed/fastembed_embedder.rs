//! Local sentence-transformer embeddings via `fastembed` (ONNX Runtime).
//!
//! The model is downloaded (or read from the cache dir) and loaded once at
//! startup. The execution provider is picked once as well:
//! CUDA when requested/available, CPU otherwise.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use tracing::{debug, info, warn};

use crate::{
    config::{DeviceKind, StoreConfig},
    embed::EmbeddingsProvider,
    errors::StoreError,
};

/// Device actually used for inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedDevice {
    Cpu,
    Cuda,
}

impl std::fmt::Display for ResolvedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedDevice::Cpu => f.write_str("cpu"),
            ResolvedDevice::Cuda => f.write_str("cuda"),
        }
    }
}

/// Maps a model name to a supported `fastembed` model.
///
/// Accepts the sentence-transformers names with or without their
/// organisation prefix, case-insensitively.
pub fn model_from_name(name: &str) -> Result<EmbeddingModel, StoreError> {
    let lowered = name.trim().to_ascii_lowercase();
    let key = lowered
        .trim_start_matches("sentence-transformers/")
        .trim_start_matches("baai/");
    match key {
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Ok(EmbeddingModel::AllMiniLML12V2),
        "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
        _ => Err(StoreError::Config(format!(
            "unsupported embedding model `{name}` (expected all-MiniLM-L6-v2, all-MiniLM-L12-v2, bge-small-en-v1.5 or bge-base-en-v1.5)"
        ))),
    }
}

/// Resolves the device preference once, probing CUDA for `Auto`.
pub fn resolve_device(pref: DeviceKind) -> ResolvedDevice {
    match pref {
        DeviceKind::Cpu => ResolvedDevice::Cpu,
        DeviceKind::Cuda => {
            if !cuda_available() {
                warn!("EMBEDDING_DEVICE=cuda but CUDA is not available; ONNX Runtime will fall back to CPU");
            }
            ResolvedDevice::Cuda
        }
        DeviceKind::Auto => {
            if cuda_available() {
                ResolvedDevice::Cuda
            } else {
                ResolvedDevice::Cpu
            }
        }
    }
}

fn cuda_available() -> bool {
    match CUDAExecutionProvider::default().is_available() {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "CUDA availability probe failed");
            false
        }
    }
}

/// Embedding engine backed by a local ONNX sentence-transformer.
///
/// `TextEmbedding::embed` needs exclusive access to the session, so the
/// model sits behind a `Mutex`.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
    name: String,
    device: ResolvedDevice,
}

impl FastEmbedder {
    /// Loads the configured model on the resolved device.
    ///
    /// # Errors
    /// - [`StoreError::Config`] for an unknown model name.
    /// - [`StoreError::ModelLoad`] if the model cannot be fetched or initialised.
    pub fn load(cfg: &StoreConfig) -> Result<Self, StoreError> {
        let model = model_from_name(&cfg.model_name)?;
        let device = resolve_device(cfg.device);

        let mut opts = InitOptions::new(model).with_show_download_progress(true);
        if let Some(dir) = &cfg.cache_dir {
            opts = opts.with_cache_dir(dir.clone());
        }
        if device == ResolvedDevice::Cuda {
            opts = opts.with_execution_providers(vec![CUDAExecutionProvider::default().build()]);
        }

        info!(model = %cfg.model_name, %device, "loading embedding model");
        let te = TextEmbedding::try_new(opts).map_err(|e| StoreError::ModelLoad {
            model: cfg.model_name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            model: Mutex::new(te),
            name: cfg.model_name.clone(),
            device,
        })
    }

    /// Device the session was created for.
    pub fn device(&self) -> ResolvedDevice {
        self.device
    }
}

impl EmbeddingsProvider for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Embedding("model returned no vector".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, StoreError> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| StoreError::Embedding("embedding model lock poisoned".into()))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| StoreError::Embedding(e.to_string()))
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
