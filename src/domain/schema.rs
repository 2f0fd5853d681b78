// ============================================================
// Layer 3 — Feature Schema
// ============================================================
// The fixed list of fields the trained census pipeline was fit on.
//
// Every field has one of three kinds:
//   - Numeric      → a number the caller must supply
//   - Categorical  → a string from a closed set of values
//   - Placeholder  → structurally required by the pipeline's input
//                    shape, filled with a default when absent
//
// The order of CENSUS_FIELDS is the column order of the training
// data. Records are always assembled in this order.

use serde::Serialize;
use serde_json::{Map, Value};

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical,
    Placeholder,
}

/// Bounds of the interactive form's slider for a numeric field.
/// The record builder does not enforce these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumericBounds {
    pub min:     i64,
    pub max:     i64,
    pub default: i64,
}

impl NumericBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Description of one pipeline input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,

    /// Legal values; empty unless `kind` is Categorical
    #[serde(skip_serializing_if = "no_values")]
    pub allowed_values: &'static [&'static str],

    /// Fill value; only set when `kind` is Placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,

    /// Form widget bounds; only set when `kind` is Numeric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<NumericBounds>,
}

fn no_values(values: &&[&str]) -> bool {
    values.is_empty()
}

impl FieldSpec {
    pub const fn numeric(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric,
            allowed_values: &[],
            default: None,
            bounds: Some(NumericBounds { min, max, default }),
        }
    }

    pub const fn categorical(name: &'static str, allowed_values: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: FieldKind::Categorical,
            allowed_values,
            default: None,
            bounds: None,
        }
    }

    pub const fn placeholder(name: &'static str, default: f64) -> Self {
        Self {
            name,
            kind: FieldKind::Placeholder,
            allowed_values: &[],
            default: Some(default),
            bounds: None,
        }
    }

    /// A field the caller must supply (everything except placeholders).
    pub fn is_required(&self) -> bool {
        self.kind != FieldKind::Placeholder
    }

    /// Exact, case-sensitive membership test against `allowed_values`.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.contains(&value)
    }
}

/// Ordered, immutable set of field specs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    fields: &'static [FieldSpec],
}

impl FeatureSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// The schema of the 1994 census income pipeline.
    pub const fn census() -> Self {
        Self::new(CENSUS_FIELDS)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.name)
    }

    /// Keys of `input` that the schema does not know about, in input order.
    pub fn unknown_fields<'a>(&self, input: &'a Map<String, Value>) -> Vec<&'a str> {
        input
            .keys()
            .filter(|k| self.field(k).is_none())
            .map(String::as_str)
            .collect()
    }
}

// ─── Census field tables ─────────────────────────────────────────────────────

pub const WORKCLASS: &[&str] = &[
    "Private", "Self-emp-not-inc", "Self-emp-inc", "Federal-gov",
    "Local-gov", "State-gov", "Without-pay", "Never-worked",
];

pub const EDUCATION: &[&str] = &[
    "Bachelors", "Some-college", "11th", "HS-grad", "Prof-school",
    "Assoc-acdm", "Assoc-voc", "9th", "7th-8th", "12th", "Masters",
    "1st-4th", "10th", "Doctorate", "5th-6th", "Preschool",
];

pub const MARITAL_STATUS: &[&str] = &[
    "Married-civ-spouse", "Divorced", "Never-married", "Separated",
    "Widowed", "Married-spouse-absent", "Married-AF-spouse",
];

pub const OCCUPATION: &[&str] = &[
    "Tech-support", "Craft-repair", "Other-service", "Sales",
    "Exec-managerial", "Prof-specialty", "Handlers-cleaners",
    "Machine-op-inspct", "Adm-clerical", "Farming-fishing",
    "Transport-moving", "Priv-house-serv", "Protective-serv", "Armed-Forces",
];

pub const RELATIONSHIP: &[&str] = &[
    "Wife", "Own-child", "Husband", "Not-in-family", "Other-relative", "Unmarried",
];

pub const RACE: &[&str] = &[
    "White", "Asian-Pac-Islander", "Amer-Indian-Eskimo", "Other", "Black",
];

pub const SEX: &[&str] = &["Female", "Male"];

pub const NATIVE_COUNTRY: &[&str] = &[
    "United-States", "Cambodia", "England", "Puerto-Rico", "Canada",
    "Germany", "Outlying-US(Guam-USVI-etc)", "India", "Japan", "Greece",
    "South", "China", "Cuba", "Iran", "Honduras", "Philippines", "Italy",
    "Poland", "Jamaica", "Vietnam", "Mexico", "Portugal", "Ireland",
    "France", "Dominican-Republic", "Laos", "Ecuador", "Taiwan", "Haiti",
    "Columbia", "Hungary", "Guatemala", "Nicaragua", "Scotland", "Thailand",
    "Yugoslavia", "El-Salvador", "Trinadad&Tobago", "Peru", "Hong",
    "Holand-Netherlands",
];

/// Column order of the training data.
pub const CENSUS_FIELDS: &[FieldSpec] = &[
    FieldSpec::numeric("age", 17, 90, 30),
    FieldSpec::categorical("workclass", WORKCLASS),
    FieldSpec::placeholder("fnlwgt", 0.0),
    FieldSpec::categorical("education", EDUCATION),
    FieldSpec::placeholder("education.num", 0.0),
    FieldSpec::categorical("marital.status", MARITAL_STATUS),
    FieldSpec::categorical("occupation", OCCUPATION),
    FieldSpec::categorical("relationship", RELATIONSHIP),
    FieldSpec::categorical("race", RACE),
    FieldSpec::categorical("sex", SEX),
    FieldSpec::numeric("capital.gain", 0, 99_999, 0),
    FieldSpec::numeric("capital.loss", 0, 4_356, 0),
    FieldSpec::numeric("hours.per.week", 1, 99, 40),
    FieldSpec::categorical("native.country", NATIVE_COUNTRY),
];

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_census_field_order() {
        let names: Vec<_> = FeatureSchema::census().names().collect();
        assert_eq!(
            names,
            [
                "age", "workclass", "fnlwgt", "education", "education.num",
                "marital.status", "occupation", "relationship", "race", "sex",
                "capital.gain", "capital.loss", "hours.per.week", "native.country",
            ]
        );
    }

    #[test]
    fn test_placeholders_default_to_zero() {
        let schema = FeatureSchema::census();
        let placeholders: Vec<_> = schema
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Placeholder)
            .collect();

        assert_eq!(placeholders.len(), 2);
        assert_eq!(placeholders[0].name, "fnlwgt");
        assert_eq!(placeholders[1].name, "education.num");
        assert!(placeholders.iter().all(|f| f.default == Some(0.0) && !f.is_required()));
    }

    #[test]
    fn test_every_categorical_field_has_values() {
        for field in FeatureSchema::census().fields() {
            match field.kind {
                FieldKind::Categorical => assert!(!field.allowed_values.is_empty(), "{}", field.name),
                _ => assert!(field.allowed_values.is_empty(), "{}", field.name),
            }
        }
    }

    #[test]
    fn test_numeric_defaults_sit_inside_bounds() {
        for field in FeatureSchema::census().fields() {
            if let Some(bounds) = field.bounds {
                assert_eq!(field.kind, FieldKind::Numeric);
                assert!(bounds.contains(bounds.default), "{}", field.name);
            }
        }
    }

    #[test]
    fn test_allows_is_case_sensitive() {
        let workclass = FeatureSchema::census().field("workclass").unwrap();
        assert!(workclass.allows("Private"));
        assert!(!workclass.allows("private"));
        assert!(!workclass.allows("Retired"));
    }

    #[test]
    fn test_unknown_fields() {
        let input = json!({ "age": 30, "zodiac": "Leo", "shoe.size": 44 });
        let unknown = FeatureSchema::census().unknown_fields(input.as_object().unwrap());
        assert_eq!(unknown.len(), 2);
        assert!(unknown.contains(&"zodiac"));
        assert!(unknown.contains(&"shoe.size"));
    }

    #[test]
    fn test_serialises_as_field_list() {
        let value = serde_json::to_value(FeatureSchema::census()).unwrap();
        let fields = value.as_array().unwrap();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0]["kind"], "numeric");
        assert_eq!(fields[2]["kind"], "placeholder");
        assert_eq!(fields[2]["default"], 0.0);
        assert_eq!(fields[9]["allowed_values"], json!(["Female", "Male"]));
    }
}
