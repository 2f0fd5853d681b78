// ============================================================
// Layer 5 — Inferencer
// ============================================================
// The model gateway. Loaded once at startup, then shared by
// every request through the IncomeClassifier trait.
//
// One prediction:
//   InputRecord ─encode→ [1, width] tensor ─forward→ logits ─argmax→ class name
//
// The network sits behind a Mutex because burn modules are Send
// but not Sync. Nothing is ever written through the lock; it only
// serialises forward passes.

use std::sync::Mutex;

use burn::{backend::ndarray::NdArrayDevice, prelude::*};

use crate::data::encoder::FeatureEncoder;
use crate::domain::error::InferenceError;
use crate::domain::prediction::IncomeLabel;
use crate::domain::record::InputRecord;
use crate::domain::schema::FeatureSchema;
use crate::domain::traits::IncomeClassifier;
use crate::infra::checkpoint::{CheckpointManager, ModelLoadError, PipelineConfig};
use crate::ml::model::CensusClassifier;

type InferBackend = burn::backend::NdArray;

pub struct Inferencer {
    model:   Mutex<CensusClassifier<InferBackend>>,
    encoder: FeatureEncoder,
    classes: Vec<IncomeLabel>,
    device:  NdArrayDevice,
}

impl Inferencer {
    /// Load pipeline.json and the weights from `ckpt`, checking the
    /// pipeline's columns against `schema`.
    pub fn from_checkpoint(
        ckpt:   &CheckpointManager,
        schema: &FeatureSchema,
    ) -> Result<Self, ModelLoadError> {
        let device   = NdArrayDevice::default();
        let pipeline = ckpt.load_pipeline()?;
        let encoder  = pipeline.encoder();
        encoder.check_schema(schema).map_err(ModelLoadError::SchemaMismatch)?;

        let model = pipeline.model_config().init::<InferBackend>(&device);
        let model = ckpt.load_weights(model, &device)?;

        tracing::info!(
            "Model loaded from '{}': {} columns, {} encoded features, {} classes",
            ckpt.dir().display(),
            encoder.columns().len(),
            encoder.width(),
            pipeline.classes.len(),
        );

        Self::new(model, encoder, pipeline.classes, device)
    }

    /// Assemble an inferencer from parts. The network's input width
    /// must equal the encoder's width and its output width the number
    /// of classes.
    pub fn new(
        model:   CensusClassifier<InferBackend>,
        encoder: FeatureEncoder,
        classes: Vec<IncomeLabel>,
        device:  NdArrayDevice,
    ) -> Result<Self, ModelLoadError> {
        let [input_dim, _]  = model.hidden.weight.val().dims();
        let [_, output_dim] = model.output.weight.val().dims();

        if input_dim != encoder.width() {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "network expects {input_dim} inputs, encoder produces {}",
                encoder.width()
            )));
        }
        if output_dim != classes.len() {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "network has {output_dim} outputs, pipeline lists {} classes",
                classes.len()
            )));
        }

        Ok(Self { model: Mutex::new(model), encoder, classes, device })
    }

    pub fn classes(&self) -> &[IncomeLabel] {
        &self.classes
    }

    /// Raw logits for one encoded feature vector.
    fn logits(&self, features: Vec<f32>) -> Result<Vec<f32>, InferenceError> {
        let width = features.len();
        let input = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(features, [1, width]),
            &self.device,
        );

        let model = self
            .model
            .lock()
            .map_err(|_| InferenceError::Backend("model lock poisoned".into()))?;

        model
            .forward(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| InferenceError::Backend(format!("{e:?}")))
    }
}

impl IncomeClassifier for Inferencer {
    fn predict(&self, record: &InputRecord) -> Result<IncomeLabel, InferenceError> {
        let features = self.encoder.encode(record)?;
        let logits   = self.logits(features)?;

        let index = argmax(&logits)
            .ok_or_else(|| InferenceError::Backend("model returned no logits".into()))?;

        self.classes
            .get(index)
            .copied()
            .ok_or(InferenceError::UnknownClass { index, classes: self.classes.len() })
    }
}

/// Write a model directory for `schema` with identity scaling and
/// randomly initialised weights. Predictions from it are arbitrary;
/// it exists so the adapters can be run before a real model is fit.
pub fn init_untrained(
    ckpt:       &CheckpointManager,
    schema:     &FeatureSchema,
    hidden_dim: usize,
) -> anyhow::Result<()> {
    let device   = NdArrayDevice::default();
    let pipeline = PipelineConfig::for_schema(schema, hidden_dim);
    let model    = pipeline.model_config().init::<InferBackend>(&device);

    ckpt.save_pipeline(&pipeline)?;
    ckpt.save_weights(&model)?;

    tracing::info!(
        "Wrote untrained model to '{}' ({} encoded features, hidden {})",
        ckpt.dir().display(),
        pipeline.encoder().width(),
        hidden_dim,
    );
    Ok(())
}

/// Index of the largest value; NaN sorts below every number.
fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let a = if a.is_nan() { f32::NEG_INFINITY } else { **a };
            let b = if b.is_nan() { f32::NEG_INFINITY } else { **b };
            a.total_cmp(&b)
        })
        .map(|(i, _)| i)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RecordBuilder;
    use crate::ml::model::CensusClassifierConfig;
    use serde_json::json;

    fn census_record() -> InputRecord {
        RecordBuilder::new(FeatureSchema::census())
            .build(
                json!({
                    "age": 52, "workclass": "Self-emp-inc", "education": "Masters",
                    "marital.status": "Married-civ-spouse", "occupation": "Exec-managerial",
                    "relationship": "Husband", "race": "White", "sex": "Male",
                    "capital.gain": 15024, "capital.loss": 0, "hours.per.week": 60,
                    "native.country": "United-States"
                })
                .as_object()
                .unwrap(),
            )
            .unwrap()
    }

    fn census_inferencer() -> Inferencer {
        let device   = NdArrayDevice::default();
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 8);
        let model    = pipeline.model_config().init::<InferBackend>(&device);
        Inferencer::new(model, pipeline.encoder(), pipeline.classes, device).unwrap()
    }

    #[test]
    fn test_predicts_a_known_class() {
        let inferencer = census_inferencer();
        let label = inferencer.predict(&census_record()).unwrap();
        assert!(IncomeLabel::ALL.contains(&label));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let inferencer = census_inferencer();
        let record = census_record();
        assert_eq!(
            inferencer.predict(&record).unwrap(),
            inferencer.predict(&record).unwrap()
        );
    }

    #[test]
    fn test_width_mismatch_is_rejected_at_construction() {
        let device   = NdArrayDevice::default();
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 8);
        let model    = CensusClassifierConfig::new(10, 8).init::<InferBackend>(&device);
        assert!(matches!(
            Inferencer::new(model, pipeline.encoder(), pipeline.classes, device),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_foreign_record_is_an_inference_error() {
        use crate::domain::schema::FieldSpec;
        const OTHER: &[FieldSpec] = &[FieldSpec::numeric("age", 0, 120, 30)];

        let record = RecordBuilder::new(FeatureSchema::new(OTHER))
            .build(json!({ "age": 30 }).as_object().unwrap())
            .unwrap();
        assert!(matches!(
            census_inferencer().predict(&record),
            Err(InferenceError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_load_from_checkpoint() {
        let dir      = tempfile::tempdir().unwrap();
        let ckpt     = CheckpointManager::new(dir.path());
        let device   = NdArrayDevice::default();
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::census(), 8);
        ckpt.save_pipeline(&pipeline).unwrap();
        ckpt.save_weights(&pipeline.model_config().init::<InferBackend>(&device)).unwrap();

        let inferencer = Inferencer::from_checkpoint(&ckpt, &FeatureSchema::census()).unwrap();
        assert_eq!(inferencer.classes(), IncomeLabel::ALL);
        assert!(inferencer.predict(&census_record()).is_ok());
    }

    #[test]
    fn test_init_untrained_is_loadable() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model"));
        init_untrained(&ckpt, &FeatureSchema::census(), 4).unwrap();

        assert_eq!(ckpt.load_pipeline().unwrap().hidden_dim, 4);
        let inferencer = Inferencer::from_checkpoint(&ckpt, &FeatureSchema::census()).unwrap();
        assert!(inferencer.predict(&census_record()).is_ok());
    }

    #[test]
    fn test_checkpoint_for_other_schema_fails_to_load() {
        use crate::domain::schema::FieldSpec;
        const OTHER: &[FieldSpec] = &[
            FieldSpec::numeric("age", 0, 120, 30),
            FieldSpec::categorical("sex", &["Female", "Male"]),
        ];

        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = NdArrayDevice::default();
        let pipeline = PipelineConfig::for_schema(&FeatureSchema::new(OTHER), 4);
        ckpt.save_pipeline(&pipeline).unwrap();
        ckpt.save_weights(&pipeline.model_config().init::<InferBackend>(&device)).unwrap();

        assert!(matches!(
            Inferencer::from_checkpoint(&ckpt, &FeatureSchema::census()),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[f32::NAN, -3.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
