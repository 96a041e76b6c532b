//! Interpretation of classifier output into display-ready risk results.

use crate::error::RiskError;
use crate::types::result::{
    BarColor, BucketCuts, FeatureImportance, RiskBucket, RiskLabel, RiskResult,
};
use serde::Deserialize;

/// Display threshold configuration.
///
/// Three independent cutoffs are in play for one probability: the bucket
/// cuts (0.4/0.7), the gauge bar red cutoff (0.6), and the classifier's own
/// internal decision threshold behind the predicted class. They can
/// disagree, and the trained presentation depends on that exact behavior,
/// so they are kept as three separate knobs rather than consolidated.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayThresholds {
    /// Probability at or below which the bucket is "low"
    #[serde(default = "default_bucket_low")]
    pub bucket_low: f64,
    /// Probability at or below which the bucket is "medium"
    #[serde(default = "default_bucket_high")]
    pub bucket_high: f64,
    /// Probability above which the gauge bar turns red
    #[serde(default = "default_bar_red")]
    pub bar_red: f64,
}

fn default_bucket_low() -> f64 {
    0.4
}

fn default_bucket_high() -> f64 {
    0.7
}

fn default_bar_red() -> f64 {
    0.6
}

impl Default for DisplayThresholds {
    fn default() -> Self {
        Self {
            bucket_low: default_bucket_low(),
            bucket_high: default_bucket_high(),
            bar_red: default_bar_red(),
        }
    }
}

/// Interprets a classifier's class choice and probability vector into a
/// [`RiskResult`]. One-shot and stateless; each call is independent.
pub struct RiskInterpreter {
    thresholds: DisplayThresholds,
}

impl RiskInterpreter {
    /// Create an interpreter with the default display thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(DisplayThresholds::default())
    }

    /// Create an interpreter with custom display thresholds.
    pub fn with_thresholds(thresholds: DisplayThresholds) -> Self {
        Self { thresholds }
    }

    /// Interpret a prediction for one applicant.
    ///
    /// Index 1 of `probabilities` is the high-risk class probability; a
    /// vector with fewer than two entries is malformed model output.
    pub fn interpret(
        &self,
        application_id: &str,
        prediction: i64,
        probabilities: &[f64],
    ) -> Result<RiskResult, RiskError> {
        if probabilities.len() < 2 {
            return Err(RiskError::ModelInvocation(format!(
                "expected a two-class probability vector, got {} entries",
                probabilities.len()
            )));
        }

        let high_risk_probability = probabilities[1];
        let cuts = BucketCuts {
            low: self.thresholds.bucket_low,
            high: self.thresholds.bucket_high,
        };

        Ok(RiskResult::new(
            application_id.to_string(),
            RiskLabel::from_class(prediction),
            high_risk_probability,
            RiskBucket::from_probability(high_risk_probability, &cuts),
            BarColor::from_probability(high_risk_probability, self.thresholds.bar_red),
        ))
    }

    /// Rank feature importances descending by weight.
    ///
    /// `weights` and `feature_names` are zipped positionally; a weight
    /// vector whose length differs from the feature count does not match
    /// the trained schema and is rejected.
    pub fn rank_importances(
        &self,
        weights: &[f64],
        feature_names: &[&str],
    ) -> Result<Vec<FeatureImportance>, RiskError> {
        if weights.len() != feature_names.len() {
            return Err(RiskError::ModelInvocation(format!(
                "importance vector has {} entries for {} features",
                weights.len(),
                feature_names.len()
            )));
        }

        let mut ranking: Vec<FeatureImportance> = feature_names
            .iter()
            .zip(weights.iter())
            .map(|(name, weight)| FeatureImportance {
                feature: name.to_string(),
                weight: *weight,
            })
            .collect();

        ranking.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Ok(ranking)
    }
}

impl Default for RiskInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_risk_prediction() {
        let interpreter = RiskInterpreter::new();
        let result = interpreter.interpret("app_1", 1, &[0.3, 0.7]).unwrap();

        assert_eq!(result.label, RiskLabel::HighRisk);
        assert_eq!(result.high_risk_probability, 0.7);
        assert_eq!(result.bucket, RiskBucket::Medium); // 0.7 is still medium
        assert_eq!(result.bar_color, BarColor::Red);
    }

    #[test]
    fn test_low_risk_prediction() {
        let interpreter = RiskInterpreter::new();
        let result = interpreter.interpret("app_1", 0, &[0.9, 0.1]).unwrap();

        assert_eq!(result.label, RiskLabel::LowRisk);
        assert_eq!(result.high_risk_probability, 0.1);
        assert_eq!(result.bucket, RiskBucket::Low);
        assert_eq!(result.bar_color, BarColor::Green);
    }

    #[test]
    fn test_label_and_bucket_can_disagree() {
        // Classifier chose class 1 at p=0.45: label says high-risk while
        // bucket and color both sit below their cutoffs.
        let interpreter = RiskInterpreter::new();
        let result = interpreter.interpret("app_1", 1, &[0.55, 0.45]).unwrap();

        assert_eq!(result.label, RiskLabel::HighRisk);
        assert_eq!(result.high_risk_probability, 0.45);
        assert_eq!(result.bucket, RiskBucket::Medium);
        assert_eq!(result.bar_color, BarColor::Green);
    }

    #[test]
    fn test_bucket_cut_boundaries() {
        let interpreter = RiskInterpreter::new();

        let at_low_cut = interpreter.interpret("app_1", 0, &[0.6, 0.4]).unwrap();
        assert_eq!(at_low_cut.bucket, RiskBucket::Low);

        let at_high_cut = interpreter.interpret("app_1", 1, &[0.3, 0.7]).unwrap();
        assert_eq!(at_high_cut.bucket, RiskBucket::Medium);

        let above_high_cut = interpreter.interpret("app_1", 1, &[0.25, 0.75]).unwrap();
        assert_eq!(above_high_cut.bucket, RiskBucket::High);
    }

    #[test]
    fn test_malformed_probability_vector() {
        let interpreter = RiskInterpreter::new();
        let result = interpreter.interpret("app_1", 1, &[0.7]);
        assert!(matches!(result, Err(RiskError::ModelInvocation(_))));
    }

    #[test]
    fn test_importance_ranking_sorted_descending() {
        let interpreter = RiskInterpreter::new();
        let names = ["Age", "Credit amount", "Duration"];
        let weights = [0.2, 0.5, 0.3];

        let ranking = interpreter.rank_importances(&weights, &names).unwrap();

        assert_eq!(ranking[0].feature, "Credit amount");
        assert_eq!(ranking[1].feature, "Duration");
        assert_eq!(ranking[2].feature, "Age");
    }

    #[test]
    fn test_importance_length_mismatch_rejected() {
        let interpreter = RiskInterpreter::new();
        let result = interpreter.rank_importances(&[0.5, 0.5], &["Age"]);
        assert!(matches!(result, Err(RiskError::ModelInvocation(_))));
    }

    #[test]
    fn test_partial_threshold_config_fills_defaults() {
        let thresholds: DisplayThresholds = serde_json::from_str("{\"bar_red\": 0.5}").unwrap();

        assert_eq!(thresholds.bar_red, 0.5);
        assert_eq!(thresholds.bucket_low, 0.4);
        assert_eq!(thresholds.bucket_high, 0.7);
    }
}
