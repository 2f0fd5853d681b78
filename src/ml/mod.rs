// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All network code lives here:
//
//   model.rs      — Linear → ReLU → Linear classifier over the
//                   encoded feature vector
//
//   inferencer.rs — the model gateway: loads pipeline + weights
//                   once, implements IncomeClassifier for the
//                   use case, and writes untrained model
//                   directories for init-model
//
// Inference runs on burn's NdArray CPU backend.

/// Feed-forward census classifier
pub mod model;

/// Loaded model behind the IncomeClassifier trait
pub mod inferencer;
