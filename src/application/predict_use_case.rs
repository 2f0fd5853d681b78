// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// The long-lived service object. Owns the feature schema and the
// loaded classifier, and runs one request through:
//
//   Step 1: Drop fields outside the schema     (logged, not an error)
//   Step 2: Validate + normalise               (Layer 3 - RecordBuilder)
//   Step 3: Predict                            (Layer 5 via IncomeClassifier)
//
// Adapters hold it behind an Arc; nothing in it changes after
// construction.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{
    FeatureSchema, IncomeClassifier, InferenceError, PredictionResult, RecordBuilder,
    ValidationError,
};

/// Why one prediction request failed.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub struct PredictUseCase {
    builder:    RecordBuilder,
    classifier: Arc<dyn IncomeClassifier>,
}

impl PredictUseCase {
    pub fn new(schema: FeatureSchema, classifier: Arc<dyn IncomeClassifier>) -> Self {
        Self { builder: RecordBuilder::new(schema), classifier }
    }

    pub fn schema(&self) -> FeatureSchema {
        self.builder.schema()
    }

    /// Validate a partial field map and predict its income label.
    pub fn execute(&self, input: &Map<String, Value>) -> Result<PredictionResult, PredictError> {
        let ignored = self.schema().unknown_fields(input);
        if !ignored.is_empty() {
            tracing::debug!(?ignored, "Dropping fields outside the feature schema");
        }

        let record = self.builder.build(input)?;
        let label  = self.classifier.predict(&record)?;

        tracing::debug!(%label, "Prediction complete");
        Ok(PredictionResult::new(label))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{IncomeLabel, InputRecord};
    use serde_json::json;

    /// Answers with a fixed label, or fails every call.
    pub(crate) struct FixedClassifier(pub Option<IncomeLabel>);

    impl IncomeClassifier for FixedClassifier {
        fn predict(&self, record: &InputRecord) -> Result<IncomeLabel, InferenceError> {
            assert_eq!(record.len(), 14, "classifier must only see complete records");
            self.0.ok_or_else(|| InferenceError::Backend("stub failure".into()))
        }
    }

    pub(crate) fn use_case(label: Option<IncomeLabel>) -> PredictUseCase {
        PredictUseCase::new(FeatureSchema::census(), Arc::new(FixedClassifier(label)))
    }

    pub(crate) fn valid_body() -> Value {
        json!({
            "age": 30,
            "workclass": "Private",
            "education": "Bachelors",
            "marital.status": "Never-married",
            "occupation": "Tech-support",
            "relationship": "Not-in-family",
            "race": "White",
            "sex": "Male",
            "capital.gain": 0,
            "capital.loss": 0,
            "hours.per.week": 40,
            "native.country": "United-States"
        })
    }

    #[test]
    fn test_valid_input_is_predicted() {
        let result = use_case(Some(IncomeLabel::Above50K))
            .execute(valid_body().as_object().unwrap())
            .unwrap();
        assert_eq!(result.label, IncomeLabel::Above50K);
    }

    #[test]
    fn test_validation_error_stops_before_the_model() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("sex");

        // The failing stub proves the classifier was never reached
        let err = use_case(None).execute(body.as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            PredictError::Validation(ValidationError::MissingField { ref field }) if field == "sex"
        ));
    }

    #[test]
    fn test_inference_error_is_reported() {
        let err = use_case(None).execute(valid_body().as_object().unwrap()).unwrap_err();
        assert!(matches!(err, PredictError::Inference(InferenceError::Backend(_))));
    }

    #[test]
    fn test_extra_fields_do_not_fail() {
        let mut body = valid_body();
        body["income"] = json!("<=50K");
        let result = use_case(Some(IncomeLabel::AtMost50K))
            .execute(body.as_object().unwrap())
            .unwrap();
        assert_eq!(result.label, IncomeLabel::AtMost50K);
    }
}
