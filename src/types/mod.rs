//! Type definitions for the credit risk scorer

pub mod applicant;
pub mod result;

pub use applicant::{ApplicantRecord, CheckingAccount, Housing, Purpose, SavingAccount, Sex};
pub use result::{BarColor, BucketCuts, FeatureImportance, RiskBucket, RiskLabel, RiskResult};
