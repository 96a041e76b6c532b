//! Credit Risk Scorer - Main Entry Point
//!
//! Consumes loan applications from NATS, runs classifier inference, and
//! publishes risk results. Requesters using request/reply get the result
//! (or a structured rejection) back on their inbox.

use anyhow::Result;
use credit_risk_scorer::{
    config::AppConfig,
    consumer::ApplicationConsumer,
    encoder::FeatureEncoder,
    interpreter::RiskInterpreter,
    metrics::{MetricsReporter, ScorerMetrics},
    model::ModelLoader,
    producer::ResultProducer,
    scorer::RiskScorer,
    types::ApplicantRecord,
};
use futures::StreamExt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("credit_risk_scorer=info".parse()?),
        )
        .init();

    info!("Starting Credit Risk Scorer");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        "Display thresholds: bucket low<={:.2}, medium<={:.2}, bar red>{:.2}",
        config.display.bucket_low, config.display.bucket_high, config.display.bar_red
    );

    // Initialize metrics
    let metrics = Arc::new(ScorerMetrics::new());

    // Initialize the evaluation chain
    let encoder = FeatureEncoder::new();
    info!(
        "Feature encoder initialized ({} features)",
        encoder.feature_count()
    );

    let loader = ModelLoader::with_threads(config.model.onnx_threads)?;
    let model = loader.load_model(
        &config.model.path,
        config.model.importance_path.as_deref().map(Path::new),
    )?;
    info!(
        "Classifier loaded, feature importance {}",
        if model.feature_importances_available() {
            "available"
        } else {
            "unavailable"
        }
    );

    let interpreter = RiskInterpreter::with_thresholds(config.display.clone());
    let scorer = Arc::new(RiskScorer::new(encoder, model, interpreter));

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = ApplicationConsumer::new(
        client.clone(),
        &config.nats.application_subject,
        &config.nats.queue_group,
    );
    let producer = Arc::new(ResultProducer::new(client.clone(), &config.nats.result_subject));

    let num_workers = config.pipeline.workers;
    info!(
        "Starting application processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.application_subject);
    info!("Publishing results to: {}", config.nats.result_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process applications in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        // Clone shared resources for the spawned task
        let scorer = scorer.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to evaluate this application
        tokio::spawn(async move {
            let start_time = Instant::now();
            let reply_inbox = message.reply.clone();

            match serde_json::from_slice::<ApplicantRecord>(&message.payload) {
                Ok(record) => {
                    let app_id = record.application_id.clone();

                    match scorer.evaluate(&record) {
                        Ok(result) => {
                            let evaluation_time = start_time.elapsed();

                            metrics.record_evaluation(
                                evaluation_time,
                                result.high_risk_probability,
                                &format!("{:?}", result.bucket).to_lowercase(),
                            );

                            if let Err(e) = producer.publish(&result).await {
                                error!(
                                    application_id = %app_id,
                                    error = %e,
                                    "Failed to publish risk result"
                                );
                            }

                            if let Some(inbox) = reply_inbox {
                                if let Err(e) =
                                    producer.reply(inbox.to_string(), &result).await
                                {
                                    error!(
                                        application_id = %app_id,
                                        error = %e,
                                        "Failed to reply with risk result"
                                    );
                                }
                            }

                            debug!(
                                application_id = %app_id,
                                label = ?result.label,
                                high_risk_probability = result.high_risk_probability,
                                evaluation_time_us = evaluation_time.as_micros(),
                                "Application evaluated"
                            );

                            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                            // Log progress every 100 applications
                            if count % 100 == 0 {
                                let throughput = metrics.get_throughput();
                                let stats = metrics.get_evaluation_stats();
                                info!(
                                    processed = count,
                                    throughput = format!("{:.1} eval/s", throughput),
                                    avg_latency_us = stats.mean_us,
                                    "Processing milestone"
                                );
                            }
                        }
                        Err(e) => {
                            metrics.record_rejection(e.kind());

                            warn!(
                                application_id = %app_id,
                                kind = e.kind(),
                                error = %e,
                                "Evaluation rejected"
                            );

                            // Re-enterable path: hand the rejection back to
                            // the requester so the record can be corrected
                            if let Some(inbox) = reply_inbox {
                                if let Err(publish_err) =
                                    producer.reply_rejection(inbox.to_string(), &e).await
                                {
                                    error!(
                                        application_id = %app_id,
                                        error = %publish_err,
                                        "Failed to reply with rejection"
                                    );
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize application");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Scorer shutting down...");
    metrics.print_summary();

    Ok(())
}
