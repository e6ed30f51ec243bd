//! Classifier backends
//!
//! The model is an opaque, externally trained artifact. The service only ever
//! asks it one question: given the 13 features in training order, which class?
//! Backends are picked by artifact extension and loaded once at startup.

pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::ArrayView1;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::FEATURE_COUNT;

pub use linear::LogisticModel;

/// Inference call failed
#[derive(Debug, Clone, Error)]
#[error("Model inference failed: {0}")]
pub struct InferenceError(pub String);

/// Artifact could not be loaded
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model artifact: {0}")]
    Format(String),

    #[error("Model expects {expected} features, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),
}

/// Binary classifier over the clinical feature vector
pub trait Classifier: Send + Sync {
    /// Raw class label for one sample
    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<i64, InferenceError>;

    /// Backend name for logs and `/health`
    fn kind(&self) -> &'static str;
}

/// Loaded model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub path: String,
    pub sha256: String,
    pub feature_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Classifier plus where it came from
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub info: ModelInfo,
}

/// Load a model artifact, dispatching on its extension
pub fn load(path: &Path) -> Result<LoadedModel, ModelError> {
    tracing::info!("Loading model from: {}", path.display());

    if !path.exists() {
        return Err(ModelError::NotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let classifier: Arc<dyn Classifier> = match extension.as_str() {
        "json" => Arc::new(LogisticModel::from_slice(&bytes)?),
        #[cfg(feature = "onnx")]
        "onnx" => Arc::new(onnx::OnnxClassifier::from_bytes(&bytes)?),
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            return Err(ModelError::UnsupportedFormat(
                "onnx (rebuild with the `onnx` feature)".to_string(),
            ))
        }
        other => return Err(ModelError::UnsupportedFormat(other.to_string())),
    };

    let info = ModelInfo {
        kind: classifier.kind().to_string(),
        path: path.display().to_string(),
        sha256: checksum(&bytes),
        feature_count: FEATURE_COUNT,
        loaded_at: Utc::now(),
    };

    tracing::info!("Model loaded: {} ({}, sha256 {})", info.path, info.kind, info.sha256);

    Ok(LoadedModel { classifier, info })
}

fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
