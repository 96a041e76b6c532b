//! Typed errors for the risk evaluation core.
//!
//! Infrastructure paths (config, model loading, transport) use `anyhow`;
//! the evaluation chain itself reports one of these classified errors so
//! callers can distinguish re-enterable input problems from request-fatal
//! model failures.

use thiserror::Error;

/// Errors produced while evaluating a single applicant.
#[derive(Debug, Error)]
pub enum RiskError {
    /// Applicant input failed validation before encoding. Non-fatal: the
    /// caller corrects the record and resubmits.
    #[error("invalid applicant input: {0}")]
    Validation(String),

    /// A categorical value has no code in the injected encoding tables.
    /// Fails loudly; silent defaulting would corrupt the feature vector
    /// without any signal.
    #[error("unknown categorical value: {0}")]
    Schema(String),

    /// Model invocation failed (malformed vector shape, runtime error).
    /// Fatal for this request only; the model is stateless, so subsequent
    /// requests are unaffected.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),
}

impl RiskError {
    /// Short machine-readable kind, used in error payloads sent back to
    /// requesters.
    pub fn kind(&self) -> &'static str {
        match self {
            RiskError::Validation(_) => "validation",
            RiskError::Schema(_) => "schema",
            RiskError::ModelInvocation(_) => "model_invocation",
        }
    }
}
