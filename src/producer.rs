//! NATS message producer for risk results

use crate::error::RiskError;
use crate::types::result::RiskResult;
use anyhow::Result;
use async_nats::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structured error payload sent back to a requester when an evaluation is
/// rejected. Validation and schema failures are re-enterable: the caller
/// corrects the record and resubmits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRejection {
    /// Machine-readable error kind
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl EvaluationRejection {
    pub fn from_error(error: &RiskError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Producer for publishing risk results to NATS
#[derive(Clone)]
pub struct ResultProducer {
    client: Client,
    subject: String,
}

impl ResultProducer {
    /// Create a new result producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a risk result to the results subject
    pub async fn publish(&self, result: &RiskResult) -> Result<()> {
        let payload = serde_json::to_vec(result)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            evaluation_id = %result.evaluation_id,
            application_id = %result.application_id,
            high_risk_probability = result.high_risk_probability,
            "Published risk result"
        );

        Ok(())
    }

    /// Reply to a request inbox with a risk result
    pub async fn reply(&self, inbox: String, result: &RiskResult) -> Result<()> {
        let payload = serde_json::to_vec(result)?;
        self.client.publish(inbox, payload.into()).await?;
        Ok(())
    }

    /// Reply to a request inbox with a structured rejection
    pub async fn reply_rejection(&self, inbox: String, error: &RiskError) -> Result<()> {
        let rejection = EvaluationRejection::from_error(error);
        let payload = serde_json::to_vec(&rejection)?;

        self.client.publish(inbox, payload.into()).await?;

        debug!(
            kind = %rejection.kind,
            message = %rejection.message,
            "Replied with evaluation rejection"
        );

        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
