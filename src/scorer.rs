//! One-shot risk evaluation chain: validate, encode, score, interpret.

use crate::encoder::FeatureEncoder;
use crate::error::RiskError;
use crate::interpreter::RiskInterpreter;
use crate::model::RiskModel;
use crate::types::applicant::ApplicantRecord;
use crate::types::result::RiskResult;
use tracing::debug;

/// Evaluates applicants against the loaded classifier.
///
/// Stateless apart from the shared read-only model; each evaluation is an
/// independent blocking call chain and cannot affect subsequent requests.
pub struct RiskScorer<M: RiskModel> {
    encoder: FeatureEncoder,
    model: M,
    interpreter: RiskInterpreter,
}

impl<M: RiskModel> RiskScorer<M> {
    pub fn new(encoder: FeatureEncoder, model: M, interpreter: RiskInterpreter) -> Self {
        Self {
            encoder,
            model,
            interpreter,
        }
    }

    /// Evaluate a single applicant.
    ///
    /// The record is validated before it reaches the encoder; validation
    /// and schema failures are re-enterable caller errors, model failures
    /// are fatal for this request only.
    pub fn evaluate(&self, record: &ApplicantRecord) -> Result<RiskResult, RiskError> {
        record.validate()?;

        let features = self.encoder.encode(record)?;
        debug!(
            application_id = %record.application_id,
            features = ?features,
            "Applicant encoded"
        );

        let prediction = self.model.predict(&features)?;
        let probabilities = self.model.predict_proba(&features)?;

        let mut result =
            self.interpreter
                .interpret(&record.application_id, prediction, &probabilities)?;

        // Importance is a capability, not a requirement: absent stays absent
        if let Some(weights) = self.model.feature_importances() {
            let ranking = self
                .interpreter
                .rank_importances(&weights, self.encoder.feature_names())?;
            result = result.with_feature_importance(ranking);
        }

        debug!(
            application_id = %record.application_id,
            label = ?result.label,
            high_risk_probability = result.high_risk_probability,
            bucket = ?result.bucket,
            "Applicant evaluated"
        );

        Ok(result)
    }

    /// Get the feature encoder.
    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::applicant::{CheckingAccount, Housing, Purpose, SavingAccount, Sex};
    use crate::types::result::{BarColor, RiskBucket, RiskLabel};

    /// Scriptable stand-in for the classifier
    struct StubModel {
        class: i64,
        probabilities: Vec<f64>,
        importances: Option<Vec<f64>>,
    }

    impl RiskModel for StubModel {
        fn predict(&self, _features: &[f32]) -> Result<i64, RiskError> {
            Ok(self.class)
        }

        fn predict_proba(&self, _features: &[f32]) -> Result<Vec<f64>, RiskError> {
            Ok(self.probabilities.clone())
        }

        fn feature_importances(&self) -> Option<Vec<f64>> {
            self.importances.clone()
        }
    }

    fn sample_record() -> ApplicantRecord {
        ApplicantRecord {
            application_id: "app_001".to_string(),
            age: 42,
            sex: Sex::Female,
            job: 1,
            housing: Housing::Rent,
            saving_account: SavingAccount::Moderate,
            checking_account: CheckingAccount::Little,
            credit_amount: 5000,
            duration_months: 24,
            purpose: Purpose::Education,
        }
    }

    fn scorer(model: StubModel) -> RiskScorer<StubModel> {
        RiskScorer::new(FeatureEncoder::new(), model, RiskInterpreter::new())
    }

    #[test]
    fn test_evaluation_chain() {
        let scorer = scorer(StubModel {
            class: 1,
            probabilities: vec![0.2, 0.8],
            importances: None,
        });

        let result = scorer.evaluate(&sample_record()).unwrap();

        assert_eq!(result.application_id, "app_001");
        assert_eq!(result.label, RiskLabel::HighRisk);
        assert_eq!(result.high_risk_probability, 0.8);
        assert_eq!(result.bucket, RiskBucket::High);
        assert_eq!(result.bar_color, BarColor::Red);
    }

    #[test]
    fn test_missing_importance_capability_is_not_an_error() {
        let scorer = scorer(StubModel {
            class: 0,
            probabilities: vec![0.9, 0.1],
            importances: None,
        });

        let result = scorer.evaluate(&sample_record()).unwrap();
        assert!(result.feature_importance.is_none());
    }

    #[test]
    fn test_importance_ranking_attached_when_available() {
        let scorer = scorer(StubModel {
            class: 0,
            probabilities: vec![0.9, 0.1],
            importances: Some(vec![0.05, 0.02, 0.03, 0.04, 0.08, 0.21, 0.33, 0.2, 0.04]),
        });

        let result = scorer.evaluate(&sample_record()).unwrap();
        let ranking = result.feature_importance.unwrap();

        assert_eq!(ranking.len(), 9);
        assert_eq!(ranking[0].feature, "Credit amount");
        assert_eq!(ranking[1].feature, "Checking account");
    }

    #[test]
    fn test_invalid_record_rejected_before_model_call() {
        struct PanickingModel;

        impl RiskModel for PanickingModel {
            fn predict(&self, _features: &[f32]) -> Result<i64, RiskError> {
                panic!("model must not be invoked for an invalid record");
            }

            fn predict_proba(&self, _features: &[f32]) -> Result<Vec<f64>, RiskError> {
                panic!("model must not be invoked for an invalid record");
            }
        }

        let scorer = RiskScorer::new(
            FeatureEncoder::new(),
            PanickingModel,
            RiskInterpreter::new(),
        );

        let mut record = sample_record();
        record.credit_amount = 0;

        assert!(matches!(
            scorer.evaluate(&record),
            Err(RiskError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_probability_vector_is_request_fatal_only() {
        let failing = scorer(StubModel {
            class: 1,
            probabilities: vec![0.8],
            importances: None,
        });

        let record = sample_record();
        assert!(matches!(
            failing.evaluate(&record),
            Err(RiskError::ModelInvocation(_))
        ));

        // The scorer holds no per-request state: the same record against a
        // well-formed model output still succeeds afterward.
        let healthy = scorer(StubModel {
            class: 0,
            probabilities: vec![0.9, 0.1],
            importances: None,
        });
        assert!(healthy.evaluate(&record).is_ok());
    }
}
