//! Corpus and embedding-model configuration.

use std::{path::PathBuf, str::FromStr};

use crate::errors::StoreError;

pub const DEFAULT_CSV_PATH: &str = "processed_v1.0.csv";
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Where the embedding model runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeviceKind {
    /// CUDA when the runtime reports it available, otherwise CPU.
    #[default]
    Auto,
    Cpu,
    Cuda,
}

impl FromStr for DeviceKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(DeviceKind::Auto),
            "cpu" => Ok(DeviceKind::Cpu),
            "cuda" | "gpu" => Ok(DeviceKind::Cuda),
            other => Err(StoreError::Config(format!(
                "EMBEDDING_DEVICE must be auto, cpu or cuda (got `{other}`)"
            ))),
        }
    }
}

/// Configuration for loading the corpus and its embeddings.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// CSV file with the reference verses.
    pub csv_path: PathBuf,
    /// Sentence-embedding model name, e.g. `all-MiniLM-L6-v2`.
    pub model_name: String,
    /// Device preference for inference.
    pub device: DeviceKind,
    /// Where downloaded model files are cached (library default if `None`).
    pub cache_dir: Option<PathBuf>,
    /// Texts per inference call while embedding the corpus.
    pub batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            model_name: DEFAULT_MODEL.to_string(),
            device: DeviceKind::Auto,
            cache_dir: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl StoreConfig {
    /// Reads `VERSES_CSV`, `EMBEDDING_MODEL`, `EMBEDDING_DEVICE`,
    /// `EMBEDDING_CACHE_DIR` and `EMBEDDING_BATCH_SIZE`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`StoreConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let dflt = Self::default();

        let batch_size = match non_empty("EMBEDDING_BATCH_SIZE") {
            Some(v) => v.parse::<usize>().map_err(|_| {
                StoreError::Config(format!("EMBEDDING_BATCH_SIZE must be a positive integer (got `{v}`)"))
            })?,
            None => dflt.batch_size,
        };

        let cfg = Self {
            csv_path: non_empty("VERSES_CSV").map(PathBuf::from).unwrap_or(dflt.csv_path),
            model_name: non_empty("EMBEDDING_MODEL").unwrap_or(dflt.model_name),
            device: match non_empty("EMBEDDING_DEVICE") {
                Some(v) => v.parse()?,
                None => dflt.device,
            },
            cache_dir: non_empty("EMBEDDING_CACHE_DIR").map(PathBuf::from),
            batch_size,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.csv_path.as_os_str().is_empty() {
            return Err(StoreError::Config("csv_path is empty".into()));
        }
        if self.model_name.trim().is_empty() {
            return Err(StoreError::Config("model_name is empty".into()));
        }
        if self.batch_size == 0 {
            return Err(StoreError::Config("batch_size must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
        assert_eq!(cfg.model_name, DEFAULT_MODEL);
        assert_eq!(cfg.device, DeviceKind::Auto);
        assert_eq!(cfg.batch_size, DEFAULT_BATCH_SIZE);
        assert!(cfg.cache_dir.is_none());
    }

    #[test]
    fn overrides() {
        let cfg = StoreConfig::from_lookup(lookup(&[
            ("VERSES_CSV", "/data/gita.csv"),
            ("EMBEDDING_DEVICE", "CPU"),
            ("EMBEDDING_BATCH_SIZE", "16"),
            ("EMBEDDING_CACHE_DIR", "/tmp/models"),
        ]))
        .unwrap();
        assert_eq!(cfg.csv_path, PathBuf::from("/data/gita.csv"));
        assert_eq!(cfg.device, DeviceKind::Cpu);
        assert_eq!(cfg.batch_size, 16);
        assert_eq!(cfg.cache_dir, Some(PathBuf::from("/tmp/models")));
    }

    #[test]
    fn rejects_bad_device_and_zero_batch() {
        assert!(StoreConfig::from_lookup(lookup(&[("EMBEDDING_DEVICE", "tpu")])).is_err());
        assert!(StoreConfig::from_lookup(lookup(&[("EMBEDDING_BATCH_SIZE", "0")])).is_err());
    }
}
