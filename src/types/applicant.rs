//! Applicant data structures for credit risk evaluation

use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Applicant sex as recorded in the training data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Canonical label, matching the training dataset vocabulary
    pub fn as_label(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl FromStr for Sex {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_label() == s)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("sex: {:?}", s)))
    }
}

/// Housing situation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Housing {
    Own,
    Free,
    Rent,
}

impl Housing {
    pub const ALL: [Housing; 3] = [Housing::Own, Housing::Free, Housing::Rent];

    pub fn as_label(&self) -> &'static str {
        match self {
            Housing::Own => "own",
            Housing::Free => "free",
            Housing::Rent => "rent",
        }
    }
}

impl FromStr for Housing {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_label() == s)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("housing: {:?}", s)))
    }
}

/// Saving account balance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingAccount {
    None,
    Little,
    Moderate,
    Rich,
    #[serde(rename = "quite rich")]
    QuiteRich,
}

impl SavingAccount {
    pub const ALL: [SavingAccount; 5] = [
        SavingAccount::None,
        SavingAccount::Little,
        SavingAccount::Moderate,
        SavingAccount::Rich,
        SavingAccount::QuiteRich,
    ];

    pub fn as_label(&self) -> &'static str {
        match self {
            SavingAccount::None => "none",
            SavingAccount::Little => "little",
            SavingAccount::Moderate => "moderate",
            SavingAccount::Rich => "rich",
            SavingAccount::QuiteRich => "quite rich",
        }
    }
}

impl FromStr for SavingAccount {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_label() == s)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("saving account: {:?}", s)))
    }
}

/// Checking account balance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckingAccount {
    Unknown,
    Little,
    Moderate,
    Rich,
}

impl CheckingAccount {
    pub const ALL: [CheckingAccount; 4] = [
        CheckingAccount::Unknown,
        CheckingAccount::Little,
        CheckingAccount::Moderate,
        CheckingAccount::Rich,
    ];

    pub fn as_label(&self) -> &'static str {
        match self {
            CheckingAccount::Unknown => "unknown",
            CheckingAccount::Little => "little",
            CheckingAccount::Moderate => "moderate",
            CheckingAccount::Rich => "rich",
        }
    }
}

impl FromStr for CheckingAccount {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_label() == s)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("checking account: {:?}", s)))
    }
}

/// Loan purpose, the eight categories the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "radio/TV")]
    RadioTv,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "furniture/equipment")]
    FurnitureEquipment,
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "domestic appliances")]
    DomesticAppliances,
    #[serde(rename = "repairs")]
    Repairs,
    #[serde(rename = "vacation/others")]
    VacationOthers,
}

impl Purpose {
    pub const ALL: [Purpose; 8] = [
        Purpose::RadioTv,
        Purpose::Education,
        Purpose::FurnitureEquipment,
        Purpose::Car,
        Purpose::Business,
        Purpose::DomesticAppliances,
        Purpose::Repairs,
        Purpose::VacationOthers,
    ];

    pub fn as_label(&self) -> &'static str {
        match self {
            Purpose::RadioTv => "radio/TV",
            Purpose::Education => "education",
            Purpose::FurnitureEquipment => "furniture/equipment",
            Purpose::Car => "car",
            Purpose::Business => "business",
            Purpose::DomesticAppliances => "domestic appliances",
            Purpose::Repairs => "repairs",
            Purpose::VacationOthers => "vacation/others",
        }
    }
}

impl FromStr for Purpose {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_label() == s)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("purpose: {:?}", s)))
    }
}

/// A single loan application to be scored for credit risk.
///
/// Constructed fresh per evaluation and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRecord {
    /// Unique application identifier
    #[serde(default = "default_application_id")]
    pub application_id: String,

    /// Age in years (18-100)
    #[serde(alias = "Age")]
    pub age: u32,

    /// Applicant sex
    #[serde(alias = "Sex")]
    pub sex: Sex,

    /// Job skill level (0 = unskilled, 3 = highly skilled)
    #[serde(alias = "Job")]
    pub job: u8,

    /// Housing situation
    #[serde(alias = "Housing")]
    pub housing: Housing,

    /// Saving account band
    #[serde(alias = "Saving accounts")]
    pub saving_account: SavingAccount,

    /// Checking account band
    #[serde(alias = "Checking account")]
    pub checking_account: CheckingAccount,

    /// Requested loan amount, must be positive
    #[serde(alias = "Credit amount")]
    pub credit_amount: u64,

    /// Repayment duration in months, must be positive
    #[serde(alias = "Duration")]
    pub duration_months: u32,

    /// Loan purpose
    #[serde(alias = "Purpose")]
    pub purpose: Purpose,
}

fn default_application_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl ApplicantRecord {
    /// Check the record against the declared input ranges.
    ///
    /// Must pass before the record reaches the feature encoder; the encoder
    /// itself performs no bounds checking.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.credit_amount == 0 {
            return Err(RiskError::Validation(
                "credit amount must be greater than zero".to_string(),
            ));
        }
        if self.duration_months == 0 {
            return Err(RiskError::Validation(
                "duration must be greater than zero".to_string(),
            ));
        }
        if !(18..=100).contains(&self.age) {
            return Err(RiskError::Validation(format!(
                "age {} outside accepted range 18-100",
                self.age
            )));
        }
        if self.job > 3 {
            return Err(RiskError::Validation(format!(
                "job level {} outside accepted range 0-3",
                self.job
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ApplicantRecord {
        ApplicantRecord {
            application_id: "app_001".to_string(),
            age: 35,
            sex: Sex::Male,
            job: 2,
            housing: Housing::Own,
            saving_account: SavingAccount::Little,
            checking_account: CheckingAccount::Moderate,
            credit_amount: 2000,
            duration_months: 12,
            purpose: Purpose::Car,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_zero_credit_amount_rejected() {
        let mut record = sample_record();
        record.credit_amount = 0;
        assert!(matches!(
            record.validate(),
            Err(RiskError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut record = sample_record();
        record.duration_months = 0;
        assert!(matches!(
            record.validate(),
            Err(RiskError::Validation(_))
        ));
    }

    #[test]
    fn test_age_out_of_range_rejected() {
        let mut record = sample_record();
        record.age = 17;
        assert!(record.validate().is_err());
        record.age = 101;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_record_serialization() {
        let record = sample_record();

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ApplicantRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record.application_id, deserialized.application_id);
        assert_eq!(record.credit_amount, deserialized.credit_amount);
        assert_eq!(record.purpose, deserialized.purpose);
    }

    #[test]
    fn test_multiword_labels_round_trip() {
        let json = serde_json::to_string(&SavingAccount::QuiteRich).unwrap();
        assert_eq!(json, "\"quite rich\"");

        let json = serde_json::to_string(&Purpose::RadioTv).unwrap();
        assert_eq!(json, "\"radio/TV\"");

        let parsed: Purpose = serde_json::from_str("\"domestic appliances\"").unwrap();
        assert_eq!(parsed, Purpose::DomesticAppliances);
    }

    #[test]
    fn test_unknown_purpose_fails_loudly() {
        assert!(matches!(
            "gambling".parse::<Purpose>(),
            Err(RiskError::Schema(_))
        ));
        assert!(serde_json::from_str::<Purpose>("\"gambling\"").is_err());
    }
}
