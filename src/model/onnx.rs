//! ONNX-backed implementation of the risk model capability interface.
//!
//! Handles both output conventions of sklearn-family exports: tensor
//! probabilities (XGBoost, RandomForest) and seq(map) probabilities
//! (CatBoost, LightGBM).

use crate::error::RiskError;
use crate::model::RiskModel;
use ort::memory::Allocator;
use ort::session::Session;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::RwLock;
use tracing::debug;

/// A loaded ONNX classifier.
///
/// The session is loaded once and shared read-only across evaluations;
/// the lock exists only because `run` takes the session mutably.
pub struct OnnxRiskModel {
    session: RwLock<Session>,
    input_name: String,
    label_output: String,
    probability_output: String,
    feature_count: usize,
    importances: Option<Vec<f64>>,
}

impl OnnxRiskModel {
    pub fn new(
        session: Session,
        input_name: String,
        label_output: String,
        probability_output: String,
        feature_count: usize,
        importances: Option<Vec<f64>>,
    ) -> Self {
        Self {
            session: RwLock::new(session),
            input_name,
            label_output,
            probability_output,
            feature_count,
            importances,
        }
    }

    /// Number of features the classifier expects.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Whether a feature-importance sidecar was loaded with the model.
    pub fn feature_importances_available(&self) -> bool {
        self.importances.is_some()
    }

    fn input_tensor(&self, features: &[f32]) -> Result<Tensor<f32>, RiskError> {
        if features.len() != self.feature_count {
            return Err(RiskError::ModelInvocation(format!(
                "feature vector has {} entries, classifier expects {}",
                features.len(),
                self.feature_count
            )));
        }

        // Shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        Tensor::from_array((shape, features.to_vec()))
            .map_err(|e| RiskError::ModelInvocation(format!("failed to create input tensor: {}", e)))
    }

    fn probabilities_from_value(
        &self,
        output: &ort::value::DynValue,
    ) -> Result<Option<Vec<f64>>, RiskError> {
        // Tensor format: [batch, num_classes] with batch_size = 1
        if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            return Ok(Some(data.iter().map(|&p| p as f64).collect()));
        }

        // seq(map(int64, float)) format
        if DynSequenceValueType::can_downcast(&output.dtype()) {
            return Ok(Some(self.probabilities_from_sequence_map(output)?));
        }

        Ok(None)
    }

    /// Extract a class-ordered probability vector from seq(map(int64, float)).
    fn probabilities_from_sequence_map(
        &self,
        output: &ort::value::DynValue,
    ) -> Result<Vec<f64>, RiskError> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| RiskError::ModelInvocation(format!("failed to downcast sequence: {}", e)))?;

        let maps = sequence
            .try_extract_sequence::<DynMapValueType>(&allocator)
            .map_err(|e| RiskError::ModelInvocation(format!("failed to extract sequence: {}", e)))?;

        let map_value = maps.first().ok_or_else(|| {
            RiskError::ModelInvocation("empty probability sequence".to_string())
        })?;

        let kv_pairs = map_value
            .try_extract_key_values::<i64, f32>()
            .map_err(|e| RiskError::ModelInvocation(format!("failed to extract map: {}", e)))?;

        let max_class = kv_pairs.iter().map(|(class, _)| *class).max().ok_or_else(|| {
            RiskError::ModelInvocation("empty probability map".to_string())
        })?;

        let mut probabilities = vec![0.0; (max_class + 1) as usize];
        for (class, prob) in kv_pairs {
            if class >= 0 {
                probabilities[class as usize] = prob as f64;
            }
        }

        Ok(probabilities)
    }
}

impl RiskModel for OnnxRiskModel {
    fn predict(&self, features: &[f32]) -> Result<i64, RiskError> {
        let input_tensor = self.input_tensor(features)?;

        let mut session = self
            .session
            .write()
            .map_err(|e| RiskError::ModelInvocation(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| RiskError::ModelInvocation(format!("inference failed: {}", e)))?;

        if let Some(output) = outputs.get(self.label_output.as_str()) {
            if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                if let Some(&class) = data.first() {
                    debug!(class = class, "Classifier prediction");
                    return Ok(class);
                }
            }
        }

        // No label output in the graph: fall back to the argmax of the
        // probability vector, the same decision for standard exports.
        let mut probabilities = None;
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(probs) = self.probabilities_from_value(&output)? {
                probabilities = Some(probs);
                break;
            }
        }

        let probabilities = probabilities.ok_or_else(|| {
            RiskError::ModelInvocation("classifier produced no usable outputs".to_string())
        })?;

        let (class, _) = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or_else(|| {
                RiskError::ModelInvocation("classifier produced an empty probability vector".to_string())
            })?;

        debug!(class = class, "Classifier prediction (argmax fallback)");
        Ok(class as i64)
    }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f64>, RiskError> {
        let input_tensor = self.input_tensor(features)?;

        let mut session = self
            .session
            .write()
            .map_err(|e| RiskError::ModelInvocation(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(|e| RiskError::ModelInvocation(format!("inference failed: {}", e)))?;

        if let Some(output) = outputs.get(self.probability_output.as_str()) {
            if let Some(probs) = self.probabilities_from_value(output)? {
                debug!(probabilities = ?probs, "Classifier probabilities");
                return Ok(probs);
            }
        }

        // Fallback: scan all outputs, skipping the label
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(probs) = self.probabilities_from_value(&output)? {
                debug!(output = %name, probabilities = ?probs, "Extracted probabilities from fallback output");
                return Ok(probs);
            }
        }

        Err(RiskError::ModelInvocation(
            "no probability output found in classifier results".to_string(),
        ))
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.importances.clone()
    }
}
