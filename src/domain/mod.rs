// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing the census feature contract:
// what fields exist, how a partial input becomes a complete
// record, and what a prediction looks like.
//
// Rules for this layer:
//   - NO burn types
//   - NO file or network I/O
//   - Only structs, enums, traits and pure functions

// The fixed list of pipeline input fields
pub mod schema;

// Partial map → validated, schema-ordered record
pub mod record;

// Income label and prediction result
pub mod prediction;

// Validation and inference error taxonomy
pub mod error;

// The classifier abstraction the ml layer implements
pub mod traits;

pub use error::{InferenceError, ValidationError};
pub use prediction::{IncomeLabel, PredictionResult};
pub use record::{FieldValue, InputRecord, RecordBuilder};
pub use schema::{FeatureSchema, FieldKind, FieldSpec};
pub use traits::IncomeClassifier;
