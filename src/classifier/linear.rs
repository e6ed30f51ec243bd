//! Logistic regression exported as JSON
//!
//! Matches what a scikit-learn `StandardScaler` + `LogisticRegression`
//! pipeline exposes: per-feature mean/scale, one coefficient per feature and
//! an intercept. Class 1 is predicted when the decision value is positive.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::{Classifier, InferenceError, ModelError};
use crate::models::{FEATURE_COUNT, FEATURE_KEYS};

/// On-disk layout
#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    scaler: Option<ScalerArtifact>,
}

#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Standardizer {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    coefficients: Array1<f64>,
    intercept: f64,
    scaler: Option<Standardizer>,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        check_len(coefficients.len())?;
        Ok(Self {
            coefficients: Array1::from(coefficients),
            intercept,
            scaler: None,
        })
    }

    /// Standardize inputs as `(x - mean) / scale` before the linear term
    pub fn with_scaler(mut self, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        check_len(mean.len())?;
        check_len(scale.len())?;

        if let Some(i) = scale.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ModelError::Format(format!(
                "scaler scale for {} must be finite and non-zero",
                FEATURE_KEYS[i]
            )));
        }

        self.scaler = Some(Standardizer {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        });
        Ok(self)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: LogisticArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::Format(e.to_string()))?;

        if let Some(kind) = artifact.model_type.as_deref() {
            if kind != "logistic_regression" {
                return Err(ModelError::Format(format!("unexpected model_type '{}'", kind)));
            }
        }

        // Column order must be the order the model was trained on
        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_KEYS.iter().copied()) {
                return Err(ModelError::Format(format!(
                    "feature_names {:?} do not match expected order {:?}",
                    names, FEATURE_KEYS
                )));
            }
        }

        let model = Self::new(artifact.coefficients, artifact.intercept)?;
        match artifact.scaler {
            Some(s) => model.with_scaler(s.mean, s.scale),
            None => Ok(model),
        }
    }

    /// Signed distance from the decision boundary
    pub fn decision_function(&self, features: ArrayView1<'_, f64>) -> Result<f64, InferenceError> {
        if features.len() != FEATURE_COUNT {
            return Err(InferenceError(format!(
                "expected {} features, got {}",
                FEATURE_COUNT,
                features.len()
            )));
        }

        let z = match &self.scaler {
            Some(s) => {
                let scaled = (&features - &s.mean) / &s.scale;
                self.coefficients.dot(&scaled)
            }
            None => self.coefficients.dot(&features),
        } + self.intercept;

        if !z.is_finite() {
            return Err(InferenceError(format!("decision value is not finite ({})", z)));
        }
        Ok(z)
    }
}

impl Classifier for LogisticModel {
    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<i64, InferenceError> {
        let z = self.decision_function(features)?;
        Ok(if z > 0.0 { 1 } else { 0 })
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}

fn check_len(actual: usize) -> Result<(), ModelError> {
    if actual != FEATURE_COUNT {
        return Err(ModelError::Shape { expected: FEATURE_COUNT, actual });
    }
    Ok(())
}
