//! Feature encoding for credit risk model inference.
//!
//! This module maps applicant records into the numeric feature vector
//! the classifier was trained on. Codes and column order must match the
//! training-time preprocessing exactly; the classifier has no schema
//! validation of its own, so any deviation silently produces a wrong
//! prediction rather than an error.

use crate::error::RiskError;
use crate::types::applicant::ApplicantRecord;
use std::collections::HashMap;

/// Number of features the classifier expects
pub const FEATURE_COUNT: usize = 9;

/// Feature column names in training order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Sex",
    "Job",
    "Housing",
    "Saving accounts",
    "Checking account",
    "Credit amount",
    "Duration",
    "Purpose",
];

/// Category-to-code tables, injected into the encoder at construction.
///
/// The defaults reproduce the training-time encoding. Housing codes are
/// non-contiguous and non-ordinal (own:1, free:2, rent:0); they carry no
/// natural ordering and must be preserved as-is.
#[derive(Debug, Clone)]
pub struct EncodingTables {
    pub sex: HashMap<String, i64>,
    pub housing: HashMap<String, i64>,
    pub saving_account: HashMap<String, i64>,
    pub checking_account: HashMap<String, i64>,
    pub purpose: HashMap<String, i64>,
}

fn table(entries: &[(&str, i64)]) -> HashMap<String, i64> {
    entries
        .iter()
        .map(|(label, code)| (label.to_string(), *code))
        .collect()
}

impl Default for EncodingTables {
    fn default() -> Self {
        Self {
            sex: table(&[("male", 1), ("female", 0)]),
            housing: table(&[("own", 1), ("free", 2), ("rent", 0)]),
            saving_account: table(&[
                ("none", 0),
                ("little", 1),
                ("moderate", 2),
                ("rich", 3),
                ("quite rich", 4),
            ]),
            checking_account: table(&[
                ("unknown", 0),
                ("little", 1),
                ("moderate", 2),
                ("rich", 3),
            ]),
            purpose: table(&[
                ("radio/TV", 5),
                ("education", 3),
                ("furniture/equipment", 4),
                ("car", 1),
                ("business", 0),
                ("domestic appliances", 2),
                ("repairs", 6),
                ("vacation/others", 7),
            ]),
        }
    }
}

/// Encoder that transforms applicant records into model input features.
///
/// Pure and deterministic; callers validate the record before encoding,
/// the encoder performs no bounds checking of its own.
pub struct FeatureEncoder {
    tables: EncodingTables,
}

impl FeatureEncoder {
    /// Create an encoder with the training-time encoding tables.
    pub fn new() -> Self {
        Self::with_tables(EncodingTables::default())
    }

    /// Create an encoder with alternate tables, for models trained with a
    /// different categorical schema.
    pub fn with_tables(tables: EncodingTables) -> Self {
        Self { tables }
    }

    /// Encode an applicant record into the fixed-order feature vector.
    ///
    /// A categorical value absent from the injected tables is a schema
    /// error; it is never silently encoded as a default.
    pub fn encode(&self, record: &ApplicantRecord) -> Result<Vec<f32>, RiskError> {
        let mut features = Vec::with_capacity(FEATURE_COUNT);

        features.push(record.age as f32);
        features.push(self.code(&self.tables.sex, record.sex.as_label(), "sex")? as f32);
        features.push(record.job as f32);
        features.push(self.code(&self.tables.housing, record.housing.as_label(), "housing")? as f32);
        features.push(
            self.code(
                &self.tables.saving_account,
                record.saving_account.as_label(),
                "saving account",
            )? as f32,
        );
        features.push(
            self.code(
                &self.tables.checking_account,
                record.checking_account.as_label(),
                "checking account",
            )? as f32,
        );
        features.push(record.credit_amount as f32);
        features.push(record.duration_months as f32);
        features.push(self.code(&self.tables.purpose, record.purpose.as_label(), "purpose")? as f32);

        Ok(features)
    }

    fn code(
        &self,
        table: &HashMap<String, i64>,
        label: &str,
        field: &str,
    ) -> Result<i64, RiskError> {
        table
            .get(label)
            .copied()
            .ok_or_else(|| RiskError::Schema(format!("{}: {:?} has no encoding", field, label)))
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in column order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::applicant::{CheckingAccount, Housing, Purpose, SavingAccount, Sex};

    fn sample_record() -> ApplicantRecord {
        ApplicantRecord {
            application_id: "app_001".to_string(),
            age: 35,
            sex: Sex::Male,
            job: 2,
            housing: Housing::Free,
            saving_account: SavingAccount::QuiteRich,
            checking_account: CheckingAccount::Moderate,
            credit_amount: 2000,
            duration_months: 12,
            purpose: Purpose::Car,
        }
    }

    #[test]
    fn test_fixed_order_and_count() {
        let encoder = FeatureEncoder::new();
        let features = encoder.encode(&sample_record()).unwrap();

        assert_eq!(features.len(), encoder.feature_count());
        assert_eq!(features[0], 35.0); // Age
        assert_eq!(features[1], 1.0); // Sex: male
        assert_eq!(features[2], 2.0); // Job
        assert_eq!(features[3], 2.0); // Housing: free
        assert_eq!(features[4], 4.0); // Saving: quite rich
        assert_eq!(features[5], 2.0); // Checking: moderate
        assert_eq!(features[6], 2000.0); // Credit amount
        assert_eq!(features[7], 12.0); // Duration
        assert_eq!(features[8], 1.0); // Purpose: car
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = FeatureEncoder::new();
        let record = sample_record();

        let first = encoder.encode(&record).unwrap();
        let second = encoder.encode(&record).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_every_purpose_has_a_code() {
        let encoder = FeatureEncoder::new();
        let mut record = sample_record();

        let expected = [
            (Purpose::RadioTv, 5.0),
            (Purpose::Education, 3.0),
            (Purpose::FurnitureEquipment, 4.0),
            (Purpose::Car, 1.0),
            (Purpose::Business, 0.0),
            (Purpose::DomesticAppliances, 2.0),
            (Purpose::Repairs, 6.0),
            (Purpose::VacationOthers, 7.0),
        ];

        for (purpose, code) in expected {
            record.purpose = purpose;
            let features = encoder.encode(&record).unwrap();
            assert_eq!(features[8], code, "purpose {:?}", purpose);
        }
    }

    #[test]
    fn test_housing_codes_are_non_ordinal() {
        let encoder = FeatureEncoder::new();
        let mut record = sample_record();

        record.housing = Housing::Own;
        assert_eq!(encoder.encode(&record).unwrap()[3], 1.0);
        record.housing = Housing::Free;
        assert_eq!(encoder.encode(&record).unwrap()[3], 2.0);
        record.housing = Housing::Rent;
        assert_eq!(encoder.encode(&record).unwrap()[3], 0.0);
    }

    #[test]
    fn test_incomplete_table_fails_loudly() {
        let mut tables = EncodingTables::default();
        tables.purpose.remove("car");
        let encoder = FeatureEncoder::with_tables(tables);

        let result = encoder.encode(&sample_record());
        assert!(matches!(result, Err(RiskError::Schema(_))));
    }

    #[test]
    fn test_feature_names_match_count() {
        let encoder = FeatureEncoder::new();
        assert_eq!(encoder.feature_names().len(), encoder.feature_count());
        assert_eq!(encoder.feature_names()[3], "Housing");
    }
}
