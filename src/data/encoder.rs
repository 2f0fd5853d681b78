// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// The preprocessing half of the trained pipeline. Converts one
// InputRecord into the flat f32 vector the network consumes.
//
// Each pipeline column has one encoding:
//   scaled  → (x - mean) / scale           one slot
//   one_hot → 1.0 at the category's index  one slot per category
//             all zeros for a category the pipeline never saw
//
// Columns are stored in the order the pipeline was fit on and
// must line up one-to-one with the feature schema. That is
// checked once at load time (check_schema) and again per record
// (encode), so a mismatch is an error rather than silently
// shifted features.
//
// Example, columns [age: scaled(mean 40, scale 10), sex: one_hot(Female, Male)]:
//   { age: 50, sex: "Male" }  →  [1.0, 0.0, 1.0]

use serde::{Deserialize, Serialize};

use crate::domain::error::InferenceError;
use crate::domain::record::{FieldValue, InputRecord};
use crate::domain::schema::{FeatureSchema, FieldKind};

/// How one column is turned into model inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum ColumnEncoding {
    Scaled { mean: f64, scale: f64 },
    OneHot { categories: Vec<String> },
}

impl ColumnEncoding {
    /// Number of model inputs this column produces.
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoding::Scaled { .. } => 1,
            ColumnEncoding::OneHot { categories } => categories.len(),
        }
    }
}

/// One pipeline column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(flatten)]
    pub encoding: ColumnEncoding,
}

/// Ordered list of column encodings.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    columns: Vec<ColumnSpec>,
}

impl FeatureEncoder {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Identity scaling for numbers, one-hot over the allowed values
    /// for categories. Used when writing a fresh pipeline.
    pub fn for_schema(schema: &FeatureSchema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                let encoding = match field.kind {
                    FieldKind::Categorical => ColumnEncoding::OneHot {
                        categories: field.allowed_values.iter().map(|v| v.to_string()).collect(),
                    },
                    FieldKind::Numeric | FieldKind::Placeholder => {
                        ColumnEncoding::Scaled { mean: 0.0, scale: 1.0 }
                    }
                };
                ColumnSpec { name: field.name.to_string(), encoding }
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<ColumnSpec> {
        self.columns
    }

    /// Total length of an encoded record.
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.encoding.width()).sum()
    }

    /// Verify the columns line up with `schema`: same names, same
    /// order, one-hot exactly where the schema is categorical.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<(), String> {
        if self.columns.len() != schema.len() {
            return Err(format!(
                "pipeline has {} columns, schema has {} fields",
                self.columns.len(),
                schema.len()
            ));
        }

        for (position, (column, field)) in self.columns.iter().zip(schema.fields()).enumerate() {
            if column.name != field.name {
                return Err(format!(
                    "column {position} is '{}' in the pipeline but '{}' in the schema",
                    column.name, field.name
                ));
            }

            let categorical = field.kind == FieldKind::Categorical;
            let one_hot = matches!(column.encoding, ColumnEncoding::OneHot { .. });
            if categorical != one_hot {
                return Err(format!(
                    "column '{}' is {:?} in the schema but encoded as {}",
                    column.name,
                    field.kind,
                    if one_hot { "one_hot" } else { "scaled" }
                ));
            }
        }

        Ok(())
    }

    /// Encode a record into a flat feature vector of length `width()`.
    pub fn encode(&self, record: &InputRecord) -> Result<Vec<f32>, InferenceError> {
        if record.len() != self.columns.len() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.columns.len(),
                found:    record.len(),
            });
        }

        let mut features = Vec::with_capacity(self.width());

        for (column, (name, value)) in self.columns.iter().zip(record.iter()) {
            if column.name != name {
                return Err(InferenceError::ColumnMismatch {
                    field:  name.to_string(),
                    column: column.name.clone(),
                });
            }

            match (&column.encoding, value) {
                (ColumnEncoding::Scaled { mean, scale }, FieldValue::Number(x)) => {
                    // A constant training column has scale 0; treat it as 1.
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    features.push(((x - mean) / scale) as f32);
                }
                (ColumnEncoding::OneHot { categories }, FieldValue::Category(c)) => {
                    let hot = categories.iter().position(|known| known == c);
                    features.extend((0..categories.len()).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
                }
                (ColumnEncoding::Scaled { .. }, _) => {
                    return Err(InferenceError::ValueKind { field: name.to_string(), expected: "a number" });
                }
                (ColumnEncoding::OneHot { .. }, _) => {
                    return Err(InferenceError::ValueKind { field: name.to_string(), expected: "a category" });
                }
            }
        }

        Ok(features)
    }
}
