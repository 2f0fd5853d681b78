// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Reads and writes the model artifact: one directory holding
// both halves of the trained pipeline.
//
//   model/
//     pipeline.json   ← column encodings, class names, hidden size
//     model.mpk       ← network weights (burn CompactRecorder)
//
// pipeline.json is needed first: the network's input width is
// the encoded width of its columns, so the network cannot be
// rebuilt (and its weights loaded) without it.
//
// Loading happens once at startup. Any failure here is a
// ModelLoadError and the process does not start.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::encoder::{ColumnEncoding, ColumnSpec, FeatureEncoder};
use crate::domain::prediction::IncomeLabel;
use crate::domain::schema::FeatureSchema;
use crate::ml::model::{CensusClassifier, CensusClassifierConfig};

const PIPELINE_FILE: &str = "pipeline.json";
const WEIGHTS_FILE:  &str = "model";

/// The model artifact could not be loaded. Fatal at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model artifact '{}' not found", path.display())]
    Missing { path: PathBuf },

    #[error("cannot read '{}'", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not a valid pipeline description", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' describes an unusable pipeline: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("cannot load weights from '{}': {reason}", path.display())]
    Weights { path: PathBuf, reason: String },

    #[error("pipeline does not match the feature schema: {0}")]
    SchemaMismatch(String),
}

/// Contents of pipeline.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Column encodings in training order
    pub columns: Vec<ColumnSpec>,

    /// Class names, indexed by network output position
    pub classes: Vec<IncomeLabel>,

    /// Width of the network's hidden layer
    pub hidden_dim: usize,
}

impl PipelineConfig {
    /// A pipeline with identity scaling and one-hot columns for `schema`.
    pub fn for_schema(schema: &FeatureSchema, hidden_dim: usize) -> Self {
        Self {
            columns: FeatureEncoder::for_schema(schema).into_columns(),
            classes: IncomeLabel::ALL.to_vec(),
            hidden_dim,
        }
    }

    pub fn encoder(&self) -> FeatureEncoder {
        FeatureEncoder::new(self.columns.clone())
    }

    /// Network architecture implied by the columns and classes.
    pub fn model_config(&self) -> CensusClassifierConfig {
        CensusClassifierConfig::new(self.encoder().width(), self.hidden_dim)
            .with_num_classes(self.classes.len())
    }

    fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("pipeline lists no classes".into());
        }
        if self.hidden_dim == 0 {
            return Err("hidden_dim must be positive".into());
        }
        if let Some(column) = self.columns.iter().find(|c| {
            matches!(&c.encoding, ColumnEncoding::OneHot { categories } if categories.is_empty())
        }) {
            return Err(format!("one-hot column '{}' has no categories", column.name));
        }
        Ok(())
    }
}

/// Manages the files of one model directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Loading never creates the directory; saving does.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write pipeline.json, creating the directory if needed.
    pub fn save_pipeline(&self, pipeline: &PipelineConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        let path = self.dir.join(PIPELINE_FILE);
        let json = serde_json::to_string_pretty(pipeline)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write pipeline to '{}'", path.display()))?;

        tracing::debug!("Saved pipeline to '{}'", path.display());
        Ok(())
    }

    /// Read and sanity-check pipeline.json.
    pub fn load_pipeline(&self) -> Result<PipelineConfig, ModelLoadError> {
        let path = self.dir.join(PIPELINE_FILE);

        let json = fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ModelLoadError::Missing { path: path.clone() },
            _ => ModelLoadError::Unreadable { path: path.clone(), source },
        })?;

        let pipeline: PipelineConfig = serde_json::from_str(&json)
            .map_err(|source| ModelLoadError::Corrupt { path: path.clone(), source })?;

        pipeline.validate().map_err(|reason| ModelLoadError::Invalid { path, reason })?;
        Ok(pipeline)
    }

    /// Save network weights with burn's CompactRecorder.
    pub fn save_weights<B: Backend>(&self, model: &CensusClassifier<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create model directory '{}'", self.dir.display()))?;

        // Path without extension; the recorder appends its own
        let path = self.dir.join(WEIGHTS_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::debug!("Saved weights to '{}'", path.display());
        Ok(())
    }

    /// Restore weights into `model`, which must already have the
    /// architecture described by pipeline.json.
    pub fn load_weights<B: Backend>(
        &self,
        model:  CensusClassifier<B>,
        device: &B::Device,
    ) -> Result<CensusClassifier<B>, ModelLoadError> {
        let path = self.dir.join(WEIGHTS_FILE);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| ModelLoadError::Weights { path: path.clone(), reason: e.to_string() })?;

        tracing::debug!("Loaded weights from '{}'", path.display());
        Ok(model.load_record(record))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_pipeline_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model"));
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 16);

        ckpt.save_pipeline(&pipeline).unwrap();
        assert_eq!(ckpt.load_pipeline().unwrap(), pipeline);
    }

    #[test]
    fn test_model_config_follows_pipeline() {
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 16);
        let cfg = pipeline.model_config();
        assert_eq!(cfg.input_dim, 105);
        assert_eq!(cfg.hidden_dim, 16);
        assert_eq!(cfg.num_classes, 2);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nowhere"));
        assert!(matches!(ckpt.load_pipeline(), Err(ModelLoadError::Missing { .. })));
        assert!(!dir.path().join("nowhere").exists());
    }

    #[test]
    fn test_corrupt_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PIPELINE_FILE), "{ \"columns\": 3 }").unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(matches!(ckpt.load_pipeline(), Err(ModelLoadError::Corrupt { .. })));
    }

    #[test]
    fn test_unknown_class_name_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let mut json = serde_json::to_value(PipelineConfig::for_schema(&FeatureSchema::census(), 4)).unwrap();
        json["classes"] = serde_json::json!(["<=50K", "rich"]);
        fs::write(dir.path().join(PIPELINE_FILE), json.to_string()).unwrap();

        let ckpt = CheckpointManager::new(dir.path());
        assert!(matches!(ckpt.load_pipeline(), Err(ModelLoadError::Corrupt { .. })));
    }

    #[test]
    fn test_empty_class_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 4);
        pipeline.classes.clear();
        let ckpt = CheckpointManager::new(dir.path());
        ckpt.save_pipeline(&pipeline).unwrap();
        assert!(matches!(ckpt.load_pipeline(), Err(ModelLoadError::Invalid { .. })));
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = Default::default();
        let cfg = CensusClassifierConfig::new(6, 3);

        let model = cfg.init::<TestBackend>(&device);
        ckpt.save_weights(&model).unwrap();

        let first = ckpt.load_weights(cfg.init::<TestBackend>(&device), &device).unwrap();
        let second = ckpt.load_weights(cfg.init::<TestBackend>(&device), &device).unwrap();
        let input = Tensor::<TestBackend, 2>::ones([1, 6], &device);
        let a = first.forward(input.clone()).into_data().to_vec::<f32>().unwrap();
        let b = second.forward(input).into_data().to_vec::<f32>().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = Default::default();
        let model = CensusClassifierConfig::new(6, 3).init::<TestBackend>(&device);
        assert!(matches!(
            ckpt.load_weights(model, &device),
            Err(ModelLoadError::Weights { .. })
        ));
    }
}
