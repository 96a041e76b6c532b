//! Configuration management for the credit risk scorer

use crate::interpreter::DisplayThresholds;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub display: DisplayThresholds,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming applications
    pub application_subject: String,
    /// Subject for outgoing risk results
    pub result_subject: String,
    /// Queue group for load-balancing across scorer instances
    #[serde(default = "default_queue_group")]
    pub queue_group: String,
}

fn default_queue_group() -> String {
    "risk-scorers".to_string()
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the serialized ONNX classifier
    pub path: String,
    /// Optional path to the feature-importance sidecar exported at training
    #[serde(default)]
    pub importance_path: Option<String>,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent evaluation workers
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                application_subject: "risk.applications".to_string(),
                result_subject: "risk.results".to_string(),
                queue_group: default_queue_group(),
            },
            model: ModelConfig {
                path: "models/credit_risk.onnx".to_string(),
                importance_path: Some("models/credit_risk.importance.json".to_string()),
                onnx_threads: 1,
            },
            display: DisplayThresholds::default(),
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.application_subject, "risk.applications");
        assert_eq!(config.nats.queue_group, "risk-scorers");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_default_display_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.display.bucket_low, 0.4);
        assert_eq!(config.display.bucket_high, 0.7);
        assert_eq!(config.display.bar_red, 0.6);
    }
}
