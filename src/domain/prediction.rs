// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================
// The census pipeline is a binary classifier. Its two class
// names are kept verbatim from the training labels.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Income bracket predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeLabel {
    #[serde(rename = "<=50K")]
    AtMost50K,

    #[serde(rename = ">50K")]
    Above50K,
}

impl IncomeLabel {
    pub const ALL: [IncomeLabel; 2] = [IncomeLabel::AtMost50K, IncomeLabel::Above50K];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeLabel::AtMost50K => "<=50K",
            IncomeLabel::Above50K  => ">50K",
        }
    }
}

impl fmt::Display for IncomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| format!("unknown income label '{s}'"))
    }
}

/// Outcome of one prediction request. No confidence is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub label: IncomeLabel,
}

impl PredictionResult {
    pub fn new(label: IncomeLabel) -> Self {
        Self { label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_use_training_class_names() {
        assert_eq!(serde_json::to_string(&IncomeLabel::AtMost50K).unwrap(), "\"<=50K\"");
        assert_eq!(serde_json::to_string(&IncomeLabel::Above50K).unwrap(), "\">50K\"");
        let parsed: IncomeLabel = serde_json::from_str("\">50K\"").unwrap();
        assert_eq!(parsed, IncomeLabel::Above50K);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("<=50K".parse::<IncomeLabel>(), Ok(IncomeLabel::AtMost50K));
        assert!("50K".parse::<IncomeLabel>().is_err());
    }
}
