//! Prediction result

use serde::Serialize;
use uuid::Uuid;

use super::Identity;

/// Raw label the classifier emits for "disease present"
pub const POSITIVE_LABEL: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    DiseasePresent,
    NoDisease,
}

impl Diagnosis {
    /// Anything other than the positive label reads as no disease
    pub fn from_label(label: i64) -> Self {
        if label == POSITIVE_LABEL {
            Diagnosis::DiseasePresent
        } else {
            Diagnosis::NoDisease
        }
    }

    /// Label as echoed back by the report form; only the exact text "1" is positive
    pub fn from_form_value(value: &str) -> Self {
        if value == "1" {
            Diagnosis::DiseasePresent
        } else {
            Diagnosis::NoDisease
        }
    }

    pub fn as_answer(&self) -> &'static str {
        match self {
            Diagnosis::DiseasePresent => "Yes",
            Diagnosis::NoDisease => "No",
        }
    }
}

/// Outcome of one successful `/predict` call
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub id: Uuid,
    pub identity: Identity,
    pub label: i64,
    pub diagnosis: Diagnosis,
}

impl PredictionOutcome {
    pub fn new(identity: Identity, label: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            label,
            diagnosis: Diagnosis::from_label(label),
        }
    }

    pub fn prediction_text(&self) -> String {
        format!("Heart Disease Prediction: {}", self.diagnosis.as_answer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Diagnosis::from_label(1), Diagnosis::DiseasePresent);
        assert_eq!(Diagnosis::from_label(0), Diagnosis::NoDisease);
        assert_eq!(Diagnosis::from_label(2), Diagnosis::NoDisease);
        assert_eq!(Diagnosis::from_label(-1), Diagnosis::NoDisease);
    }

    #[test]
    fn test_form_value_mapping() {
        assert_eq!(Diagnosis::from_form_value("1"), Diagnosis::DiseasePresent);
        assert_eq!(Diagnosis::from_form_value("0"), Diagnosis::NoDisease);
        // Current behavior: unrecognized values quietly read as "No"
        assert_eq!(Diagnosis::from_form_value(""), Diagnosis::NoDisease);
        assert_eq!(Diagnosis::from_form_value(" 1"), Diagnosis::NoDisease);
        assert_eq!(Diagnosis::from_form_value("yes"), Diagnosis::NoDisease);
    }

    #[test]
    fn test_prediction_text() {
        let outcome = PredictionOutcome::new(Identity::new("A", "B"), 1);
        assert_eq!(outcome.prediction_text(), "Heart Disease Prediction: Yes");

        let outcome = PredictionOutcome::new(Identity::new("A", "B"), 0);
        assert_eq!(outcome.prediction_text(), "Heart Disease Prediction: No");
    }
}
