//! Performance metrics and statistics tracking for the risk scorer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for evaluation throughput and outcomes
pub struct ScorerMetrics {
    /// Total evaluations completed
    pub evaluations_completed: AtomicU64,
    /// Total inputs rejected before scoring
    pub inputs_rejected: AtomicU64,
    /// Rejections by error kind
    rejections_by_kind: RwLock<HashMap<String, u64>>,
    /// Results by display bucket
    results_by_bucket: RwLock<HashMap<String, u64>>,
    /// Evaluation times (in microseconds)
    evaluation_times: RwLock<Vec<u64>>,
    /// High-risk probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ScorerMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            evaluations_completed: AtomicU64::new(0),
            inputs_rejected: AtomicU64::new(0),
            rejections_by_kind: RwLock::new(HashMap::new()),
            results_by_bucket: RwLock::new(HashMap::new()),
            evaluation_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed evaluation
    pub fn record_evaluation(
        &self,
        evaluation_time: Duration,
        high_risk_probability: f64,
        bucket: &str,
    ) {
        self.evaluations_completed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.evaluation_times.write() {
            times.push(evaluation_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let slot = (high_risk_probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[slot] += 1;
        }

        if let Ok(mut by_bucket) = self.results_by_bucket.write() {
            *by_bucket.entry(bucket.to_string()).or_insert(0) += 1;
        }
    }

    /// Record a rejected input
    pub fn record_rejection(&self, kind: &str) {
        self.inputs_rejected.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut by_kind) = self.rejections_by_kind.write() {
            *by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Get evaluation time statistics
    pub fn get_evaluation_stats(&self) -> EvaluationStats {
        let times = self.evaluation_times.read().unwrap();
        if times.is_empty() {
            return EvaluationStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        EvaluationStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (evaluations per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.evaluations_completed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get high-risk probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        *self.probability_buckets.read().unwrap()
    }

    /// Get results by display bucket
    pub fn get_results_by_bucket(&self) -> HashMap<String, u64> {
        self.results_by_bucket.read().unwrap().clone()
    }

    /// Get rejections by error kind
    pub fn get_rejections_by_kind(&self) -> HashMap<String, u64> {
        self.rejections_by_kind.read().unwrap().clone()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let completed = self.evaluations_completed.load(Ordering::Relaxed);
        let rejected = self.inputs_rejected.load(Ordering::Relaxed);
        let stats = self.get_evaluation_stats();
        let throughput = self.get_throughput();
        let by_bucket = self.get_results_by_bucket();
        let by_kind = self.get_rejections_by_kind();
        let distribution = self.get_probability_distribution();

        info!("==================== RISK SCORER METRICS ====================");
        info!(
            "Evaluations: {} completed, {} rejected, {:.1}/s throughput",
            completed, rejected, throughput
        );
        info!(
            "Evaluation time (us): mean={} p50={} p95={} p99={} max={}",
            stats.mean_us, stats.p50_us, stats.p95_us, stats.p99_us, stats.max_us
        );

        info!("Results by bucket:");
        for (bucket, count) in &by_bucket {
            let pct = if completed > 0 {
                (*count as f64 / completed as f64) * 100.0
            } else {
                0.0
            };
            info!("  {:8}: {:>6} ({:>5.1}%)", bucket, count, pct);
        }

        if !by_kind.is_empty() {
            info!("Rejections by kind:");
            for (kind, count) in &by_kind {
                info!("  {:16}: {:>6}", kind, count);
            }
        }

        info!("High-risk probability distribution:");
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "#".repeat(bar_len.min(20));
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("==============================================================");
    }
}

impl Default for ScorerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluation time statistics
#[derive(Debug, Default)]
pub struct EvaluationStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ScorerMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ScorerMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
