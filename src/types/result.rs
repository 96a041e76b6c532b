//! Risk evaluation result data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The classifier's chosen class for an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "low-risk")]
    LowRisk,
    #[serde(rename = "high-risk")]
    HighRisk,
}

impl RiskLabel {
    /// Passthrough of the classifier's own decision. The class is taken
    /// as-is, never recomputed from the probability, so a model with a
    /// non-0.5 internal threshold keeps its own cutoff.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }
}

/// Coarse three-level categorization of the high-risk probability for
/// human-readable presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl RiskBucket {
    /// Determine display bucket from probability and cut points.
    ///
    /// Cuts are inclusive on the low side: p <= low is Low, p <= high is
    /// Medium, anything above is High.
    pub fn from_probability(probability: f64, cuts: &BucketCuts) -> Self {
        if probability <= cuts.low {
            RiskBucket::Low
        } else if probability <= cuts.high {
            RiskBucket::Medium
        } else {
            RiskBucket::High
        }
    }
}

/// Display bucket cut points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCuts {
    pub low: f64,
    pub high: f64,
}

impl Default for BucketCuts {
    fn default() -> Self {
        Self { low: 0.4, high: 0.7 }
    }
}

/// Gauge bar color for the risk meter.
///
/// The red cutoff (0.6 by default) is deliberately independent of the bucket
/// cuts; the trained presentation uses both and they can disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Green,
    Red,
}

impl BarColor {
    pub fn from_probability(probability: f64, red_above: f64) -> Self {
        if probability > red_above {
            BarColor::Red
        } else {
            BarColor::Green
        }
    }
}

/// One entry in the feature-importance ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    /// Feature column name
    pub feature: String,
    /// Importance weight reported by the model
    pub weight: f64,
}

/// Result of one risk evaluation, the sole data handed to any rendering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskResult {
    /// Unique evaluation identifier
    pub evaluation_id: String,

    /// Associated application ID
    pub application_id: String,

    /// Classifier decision
    pub label: RiskLabel,

    /// Probability of the high-risk class (0.0 - 1.0)
    pub high_risk_probability: f64,

    /// Display bucket derived from the probability
    pub bucket: RiskBucket,

    /// Gauge bar color derived from the probability
    pub bar_color: BarColor,

    /// Per-feature importance ranking, descending by weight.
    /// `None` when the model does not expose importances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<Vec<FeatureImportance>>,

    /// Evaluation timestamp
    pub timestamp: DateTime<Utc>,
}

impl RiskResult {
    pub fn new(
        application_id: String,
        label: RiskLabel,
        high_risk_probability: f64,
        bucket: RiskBucket,
        bar_color: BarColor,
    ) -> Self {
        Self {
            evaluation_id: uuid::Uuid::new_v4().to_string(),
            application_id,
            label,
            high_risk_probability,
            bucket,
            bar_color,
            feature_importance: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a feature-importance ranking to the result
    pub fn with_feature_importance(mut self, ranking: Vec<FeatureImportance>) -> Self {
        self.feature_importance = Some(ranking);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(RiskLabel::from_class(0), RiskLabel::LowRisk);
        assert_eq!(RiskLabel::from_class(1), RiskLabel::HighRisk);
    }

    #[test]
    fn test_bucket_boundaries() {
        let cuts = BucketCuts::default();

        assert_eq!(RiskBucket::from_probability(0.1, &cuts), RiskBucket::Low);
        // Cut points land on the low side
        assert_eq!(RiskBucket::from_probability(0.4, &cuts), RiskBucket::Low);
        assert_eq!(RiskBucket::from_probability(0.41, &cuts), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_probability(0.7, &cuts), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_probability(0.71, &cuts), RiskBucket::High);
    }

    #[test]
    fn test_bar_color_cutoff() {
        assert_eq!(BarColor::from_probability(0.6, 0.6), BarColor::Green);
        assert_eq!(BarColor::from_probability(0.61, 0.6), BarColor::Red);
    }

    #[test]
    fn test_result_serialization() {
        let result = RiskResult::new(
            "app_123".to_string(),
            RiskLabel::HighRisk,
            0.78,
            RiskBucket::High,
            BarColor::Red,
        );

        let json = serde_json::to_string(&result).unwrap();
        // Importance absent: omitted from payload, not null
        assert!(!json.contains("feature_importance"));
        assert!(json.contains("\"high-risk\""));

        let deserialized: RiskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.application_id, deserialized.application_id);
        assert_eq!(result.label, deserialized.label);
        assert_eq!(result.high_risk_probability, deserialized.high_risk_probability);
    }
}
