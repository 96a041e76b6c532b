//! ONNX classifier loader

use crate::encoder::FEATURE_COUNT;
use crate::model::onnx::OnnxRiskModel;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{info, warn};

/// Loader for the serialized ONNX classifier.
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Result<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        // Initialize ONNX Runtime
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the classifier from file, with an optional feature-importance
    /// sidecar exported at training time.
    ///
    /// ONNX graphs do not carry importances themselves; a missing or absent
    /// sidecar leaves the capability unavailable rather than failing.
    pub fn load_model<P: AsRef<Path>>(
        &self,
        path: P,
        importance_path: Option<&Path>,
    ) -> Result<OnnxRiskModel> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX classifier");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        // Get input/output names; sklearn-family exports name these
        // "float_input", "output_label", and "output_probability"
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let label_output = pick_label_output(&output_names);
        let probability_output = pick_probability_output(&output_names);

        let importances = match importance_path {
            Some(sidecar) if sidecar.exists() => {
                let raw = std::fs::read_to_string(sidecar)
                    .context(format!("Failed to read importance sidecar {:?}", sidecar))?;
                let weights = parse_importances(&raw)
                    .context(format!("Failed to parse importance sidecar {:?}", sidecar))?;
                accept_importances(weights, sidecar)
            }
            Some(sidecar) => {
                info!(
                    sidecar = %sidecar.display(),
                    "Importance sidecar not found, feature importance unavailable"
                );
                None
            }
            None => {
                info!("No importance sidecar configured, feature importance unavailable");
                None
            }
        };

        info!(
            input = %input_name,
            label_output = %label_output,
            probability_output = %probability_output,
            "Classifier loaded successfully"
        );

        Ok(OnnxRiskModel::new(
            session,
            input_name,
            label_output,
            probability_output,
            FEATURE_COUNT,
            importances,
        ))
    }
}

/// Parse a training-time importance sidecar: a JSON array of weights in
/// feature column order.
pub fn parse_importances(raw: &str) -> Result<Vec<f64>> {
    let weights: Vec<f64> = serde_json::from_str(raw)?;
    Ok(weights)
}

/// Accept a sidecar only if it covers every feature column.
///
/// A mismatched weight count cannot be zipped with the feature names, and
/// importance is display-only: degrade to unavailable instead of poisoning
/// every evaluation.
fn accept_importances(weights: Vec<f64>, sidecar: &Path) -> Option<Vec<f64>> {
    if weights.len() != FEATURE_COUNT {
        warn!(
            sidecar = %sidecar.display(),
            weights = weights.len(),
            features = FEATURE_COUNT,
            "Importance sidecar does not match the feature schema, feature importance unavailable"
        );
        return None;
    }

    info!(
        sidecar = %sidecar.display(),
        features = weights.len(),
        "Feature importances loaded"
    );
    Some(weights)
}

/// Pick the label output by name, preferring an explicit "label" match.
fn pick_label_output(output_names: &[String]) -> String {
    output_names
        .iter()
        .find(|name| name.contains("label"))
        .cloned()
        .unwrap_or_else(|| "output_label".to_string())
}

/// Pick the probability output by name.
///
/// "prob" matches take priority: a generic "output" match alone would pick
/// "output_label" for sklearn-family exports.
fn pick_probability_output(output_names: &[String]) -> String {
    output_names
        .iter()
        .find(|name| name.contains("prob"))
        .or_else(|| {
            output_names
                .iter()
                .find(|name| name.contains("output") && !name.contains("label"))
        })
        .cloned()
        .unwrap_or_else(|| {
            output_names
                .last()
                .cloned()
                .unwrap_or_else(|| "output_probability".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_importances() {
        let raw = "[0.05, 0.02, 0.03, 0.04, 0.08, 0.21, 0.33, 0.2, 0.04]";
        let weights = parse_importances(raw).unwrap();
        assert_eq!(weights.len(), 9);
        assert_eq!(weights[6], 0.33);
    }

    #[test]
    fn test_parse_importances_rejects_non_array() {
        assert!(parse_importances("{\"Age\": 0.1}").is_err());
    }

    #[test]
    fn test_mismatched_sidecar_degrades_to_unavailable() {
        let sidecar = Path::new("models/credit_risk.importance.json");

        let short = vec![0.1; FEATURE_COUNT - 1];
        assert!(accept_importances(short, sidecar).is_none());

        let long = vec![0.1; FEATURE_COUNT + 1];
        assert!(accept_importances(long, sidecar).is_none());

        let exact = vec![0.1; FEATURE_COUNT];
        assert_eq!(accept_importances(exact, sidecar).unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_probability_output_prefers_prob_over_generic_output() {
        let names = vec![
            "output_label".to_string(),
            "output_probability".to_string(),
        ];
        assert_eq!(pick_probability_output(&names), "output_probability");
        assert_eq!(pick_label_output(&names), "output_label");

        // Same export with the outputs reversed
        let reversed = vec![
            "output_probability".to_string(),
            "output_label".to_string(),
        ];
        assert_eq!(pick_probability_output(&reversed), "output_probability");
    }

    #[test]
    fn test_probability_output_fallbacks() {
        // No "prob" output: generic "output" match must skip the label
        let names = vec!["output_label".to_string(), "output_scores".to_string()];
        assert_eq!(pick_probability_output(&names), "output_scores");

        // Nothing recognizable: last output wins
        let names = vec!["labels".to_string(), "scores".to_string()];
        assert_eq!(pick_probability_output(&names), "scores");
    }
}
