// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The model is an external collaborator. Everything above the
// ml layer sees it only through IncomeClassifier, so the HTTP
// adapter, the form and the tests can swap in any implementation.

use crate::domain::error::InferenceError;
use crate::domain::prediction::IncomeLabel;
use crate::domain::record::InputRecord;

// ─── IncomeClassifier ─────────────────────────────────────────────────────────
/// A loaded, read-only income classifier.
///
/// Implementations:
///   - Inferencer → burn network + preprocessing loaded from a model directory
///
/// `Send + Sync` because one instance is shared by every request.
pub trait IncomeClassifier: Send + Sync {
    /// Score one validated record.
    fn predict(&self, record: &InputRecord) -> Result<IncomeLabel, InferenceError>;
}
