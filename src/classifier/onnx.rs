//! ONNX Runtime backend
//!
//! Loads classifiers exported with `skl2onnx` or similar: one float input of
//! shape `[1, 13]`, first output is the predicted label.

use ndarray::{Array2, ArrayView1};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::{Classifier, InferenceError, ModelError};
use crate::models::FEATURE_COUNT;

pub struct OnnxClassifier {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ModelError::Format(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Format(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ModelError::Format(format!("Load from memory error: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Format("No output defined".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: ArrayView1<'_, f64>) -> Result<i64, InferenceError> {
        let input: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        // skl2onnx emits int64 labels; regressors-as-classifiers emit floats
        if let Ok((_, labels)) = output.try_extract_tensor::<i64>() {
            return labels
                .first()
                .copied()
                .ok_or_else(|| InferenceError("Empty label tensor".to_string()));
        }

        let (_, scores) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        scores
            .first()
            .map(|s| s.round() as i64)
            .ok_or_else(|| InferenceError("Empty output tensor".to_string()))
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal protobuf writer, enough to assemble an ONNX graph in memory.
    fn varint(buf: &mut Vec<u8>, mut value: u64) {
        while value >= 0x80 {
            buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        buf.push(value as u8);
    }

    fn int_field(buf: &mut Vec<u8>, field: u64, value: u64) {
        varint(buf, field << 3);
        varint(buf, value);
    }

    fn bytes_field(buf: &mut Vec<u8>, field: u64, bytes: &[u8]) {
        varint(buf, (field << 3) | 2);
        varint(buf, bytes.len() as u64);
        buf.extend_from_slice(bytes);
    }

    const FLOAT: u64 = 1;
    const INT64: u64 = 7;

    fn value_info(name: &str, elem_type: u64, dims: &[u64]) -> Vec<u8> {
        let mut shape = Vec::new();
        for &d in dims {
            let mut dim = Vec::new();
            int_field(&mut dim, 1, d);
            bytes_field(&mut shape, 1, &dim);
        }
        let mut tensor = Vec::new();
        int_field(&mut tensor, 1, elem_type);
        bytes_field(&mut tensor, 2, &shape);
        let mut type_proto = Vec::new();
        bytes_field(&mut type_proto, 1, &tensor);

        let mut info = Vec::new();
        bytes_field(&mut info, 1, name.as_bytes());
        bytes_field(&mut info, 2, &type_proto);
        info
    }

    fn int_attribute(name: &str, value: u64) -> Vec<u8> {
        let mut attr = Vec::new();
        bytes_field(&mut attr, 1, name.as_bytes());
        int_field(&mut attr, 3, value);
        int_field(&mut attr, 20, 2); // AttributeType::INT
        attr
    }

    /// `label = ArgMax(x, axis=1)`: x is `[1, 13]` float, label is `[1]` int64
    fn argmax_model() -> Vec<u8> {
        let mut node = Vec::new();
        bytes_field(&mut node, 1, b"x");
        bytes_field(&mut node, 2, b"label");
        bytes_field(&mut node, 4, b"ArgMax");
        bytes_field(&mut node, 5, &int_attribute("axis", 1));
        bytes_field(&mut node, 5, &int_attribute("keepdims", 0));

        let mut graph = Vec::new();
        bytes_field(&mut graph, 1, &node);
        bytes_field(&mut graph, 2, b"argmax");
        bytes_field(&mut graph, 11, &value_info("x", FLOAT, &[1, FEATURE_COUNT as u64]));
        bytes_field(&mut graph, 12, &value_info("label", INT64, &[1]));

        let mut opset = Vec::new();
        int_field(&mut opset, 2, 13);

        let mut model = Vec::new();
        int_field(&mut model, 1, 8); // ir_version
        bytes_field(&mut model, 7, &graph);
        bytes_field(&mut model, 8, &opset);
        model
    }

    #[test]
    fn test_int64_label_output() {
        let classifier = OnnxClassifier::from_bytes(&argmax_model()).unwrap();
        assert_eq!(classifier.output_name, "label");
        assert_eq!(classifier.kind(), "onnx");

        let mut x = [0.0; FEATURE_COUNT];
        x[4] = 233.0;
        assert_eq!(classifier.predict(ArrayView1::from(&x[..])).unwrap(), 4);

        x[7] = 250.0;
        assert_eq!(classifier.predict(ArrayView1::from(&x[..])).unwrap(), 7);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = OnnxClassifier::from_bytes(b"not an onnx graph").err().unwrap();
        assert!(matches!(err, ModelError::Format(_)));
    }
}
