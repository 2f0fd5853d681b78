// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//   checkpoint.rs — reads and writes the model directory:
//                   pipeline.json (serde_json) and the network
//                   weights (burn CompactRecorder). Load failures
//                   are typed as ModelLoadError.

/// Model artifact saving and loading
pub mod checkpoint;
