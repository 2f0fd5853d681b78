// ============================================================
// Layer 3 — Record Builder
// ============================================================
// Turns a partial, untyped field map (an API body or the form's
// answers) into a complete, typed InputRecord.
//
// Rules, applied per schema field in schema order:
//   - absent (or null) placeholder → its default
//   - absent (or null) other field → MissingField
//   - categorical  → must be a string in allowed_values
//   - numeric / placeholder → JSON number or numeric string, finite
//
// Keys the schema does not know are dropped. That is the policy,
// not an error: callers may send extra columns.
//
// The output order is always the schema order, whatever order
// the input map happens to have.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::ValidationError;
use crate::domain::schema::{FeatureSchema, FieldKind, FieldSpec};

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Category(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FieldValue::Category(c) => Some(c),
            FieldValue::Number(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Category(c) => serializer.serialize_str(c),
        }
    }
}

/// Complete record holding exactly the schema's fields, in schema order.
/// Only `RecordBuilder` creates these.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl InputRecord {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }
}

/// Serialises as a JSON object whose keys follow schema order.
impl Serialize for InputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Builds `InputRecord`s against one schema. Pure: no I/O, no state.
#[derive(Debug, Clone, Copy)]
pub struct RecordBuilder {
    schema: FeatureSchema,
}

impl RecordBuilder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    /// Validate `input` and assemble a complete record.
    /// The first violation in schema order is returned.
    pub fn build(&self, input: &Map<String, Value>) -> Result<InputRecord, ValidationError> {
        let fields = self
            .schema
            .fields()
            .iter()
            .map(|spec| {
                let value = match input.get(spec.name) {
                    None | Some(Value::Null) => default_for(spec)?,
                    Some(raw) => coerce(spec, raw)?,
                };
                Ok((spec.name, value))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(InputRecord { fields })
    }
}

fn default_for(spec: &FieldSpec) -> Result<FieldValue, ValidationError> {
    match (spec.kind, spec.default) {
        (FieldKind::Placeholder, Some(default)) => Ok(FieldValue::Number(default)),
        _ => Err(ValidationError::MissingField { field: spec.name.to_string() }),
    }
}

fn coerce(spec: &FieldSpec, raw: &Value) -> Result<FieldValue, ValidationError> {
    match spec.kind {
        FieldKind::Categorical => {
            let Value::String(value) = raw else {
                return Err(invalid_type(spec, "a string", raw));
            };
            if !spec.allows(value) {
                return Err(ValidationError::InvalidCategory {
                    field: spec.name.to_string(),
                    value: value.clone(),
                });
            }
            Ok(FieldValue::Category(value.clone()))
        }
        FieldKind::Numeric | FieldKind::Placeholder => {
            let number = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            number
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(|| invalid_type(spec, "a finite number", raw))
        }
    }
}

fn invalid_type(spec: &FieldSpec, expected: &'static str, raw: &Value) -> ValidationError {
    ValidationError::InvalidType {
        field: spec.name.to_string(),
        expected,
        found: describe(raw),
    }
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
