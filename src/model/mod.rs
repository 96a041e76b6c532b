//! Model boundary: capability interface and ONNX-backed classifier

pub mod loader;
pub mod onnx;

pub use loader::ModelLoader;
pub use onnx::OnnxRiskModel;

use crate::error::RiskError;

/// Capability interface for the opaque pre-trained classifier.
///
/// Any concrete model (tree ensemble, linear model) substitutes behind
/// these three operations. The model is loaded once and treated as an
/// immutable, stateless function object afterward.
pub trait RiskModel: Send + Sync {
    /// Predict the class for a feature vector (0 = low risk, 1 = high risk).
    fn predict(&self, features: &[f32]) -> Result<i64, RiskError>;

    /// Predict per-class probabilities; index 1 is the high-risk class.
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f64>, RiskError>;

    /// Per-feature importance weights, in feature column order.
    ///
    /// Returns `None` when the model does not expose importances; absence
    /// of this capability is not an error.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }
}
