//! Test Applicant Producer
//!
//! Generates and publishes randomized loan applications to NATS for
//! exercising the risk scorer.

use credit_risk_scorer::types::applicant::{
    ApplicantRecord, CheckingAccount, Housing, Purpose, SavingAccount, Sex,
};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Applicant generator for testing
struct ApplicantGenerator {
    rng: rand::rngs::ThreadRng,
    application_counter: u64,
}

impl ApplicantGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            application_counter: 0,
        }
    }

    /// Generate a typical low-risk-looking applicant
    fn generate_typical(&mut self) -> ApplicantRecord {
        self.application_counter += 1;

        ApplicantRecord {
            application_id: format!("app_{:012}", self.application_counter),
            age: self.rng.gen_range(25..60),
            sex: self.random_choice(&Sex::ALL),
            job: self.rng.gen_range(1..=3),
            housing: Housing::Own,
            saving_account: self
                .random_choice(&[SavingAccount::Moderate, SavingAccount::Rich, SavingAccount::QuiteRich]),
            checking_account: self.random_choice(&[CheckingAccount::Moderate, CheckingAccount::Rich]),
            credit_amount: self.rng.gen_range(500..5000),
            duration_months: self.rng.gen_range(6..24),
            purpose: self.random_choice(&[Purpose::Car, Purpose::RadioTv, Purpose::FurnitureEquipment]),
        }
    }

    /// Generate a risky-looking applicant
    fn generate_risky(&mut self) -> ApplicantRecord {
        self.application_counter += 1;

        ApplicantRecord {
            application_id: format!("app_{:012}", self.application_counter),
            age: self.rng.gen_range(18..25), // Young applicant
            sex: self.random_choice(&Sex::ALL),
            job: self.rng.gen_range(0..=1), // Unskilled
            housing: self.random_choice(&[Housing::Rent, Housing::Free]),
            saving_account: self.random_choice(&[SavingAccount::None, SavingAccount::Little]),
            checking_account: self
                .random_choice(&[CheckingAccount::Unknown, CheckingAccount::Little]),
            credit_amount: self.rng.gen_range(8000..20000), // Large loan
            duration_months: self.rng.gen_range(36..72),    // Long duration
            purpose: self.random_choice(&[Purpose::Business, Purpose::VacationOthers]),
        }
    }

    fn random_choice<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("applicant_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Applicant Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("risk.applications");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let risky_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.3);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        risky_rate = risky_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, risky_rate, delay_ms).await;
        }
    };

    // Generate and publish applications
    let mut generator = ApplicantGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} applications...", count);

    let mut typical_count = 0;
    let mut risky_count = 0;

    for i in 0..count {
        let record = if rng.gen_bool(risky_rate) {
            risky_count += 1;
            generator.generate_risky()
        } else {
            typical_count += 1;
            generator.generate_typical()
        };

        let payload = serde_json::to_vec(&record)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} applications ({} typical, {} risky)",
                i + 1,
                count,
                typical_count,
                risky_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} applications ({} typical, {} risky)",
        count, typical_count, risky_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, risky_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = ApplicantGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let record = if rng.gen_bool(risky_rate) {
            generator.generate_risky()
        } else {
            generator.generate_typical()
        };

        let json = serde_json::to_string_pretty(&record)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample application {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
