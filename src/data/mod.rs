// ============================================================
// Layer 4 — Data Layer
// ============================================================
// Turns validated records into model inputs. The encoder is
// the preprocessing half of the trained pipeline; its column
// encodings come from pipeline.json.
//
//   InputRecord ─FeatureEncoder→ Vec<f32> (one row of the input tensor)

/// Scaling and one-hot encoding of schema-ordered records
pub mod encoder;
