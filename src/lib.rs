//! Credit Risk Scorer Library
//!
//! Maps loan applicant attributes to the feature vector a pre-trained
//! classifier expects, runs inference, and interprets the output into a
//! display-ready risk result.

pub mod config;
pub mod consumer;
pub mod encoder;
pub mod error;
pub mod interpreter;
pub mod metrics;
pub mod model;
pub mod producer;
pub mod scorer;
pub mod types;

pub use config::AppConfig;
pub use consumer::ApplicationConsumer;
pub use encoder::{EncodingTables, FeatureEncoder};
pub use error::RiskError;
pub use interpreter::{DisplayThresholds, RiskInterpreter};
pub use model::{ModelLoader, OnnxRiskModel, RiskModel};
pub use producer::ResultProducer;
pub use scorer::RiskScorer;
pub use types::{ApplicantRecord, RiskResult};
