//! NATS message consumer for incoming applications

use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for receiving loan applications from NATS.
///
/// Subscribes through a queue group so that multiple scorer instances
/// split the application stream instead of each evaluating every record.
pub struct ApplicationConsumer {
    client: Client,
    subject: String,
    queue_group: String,
}

impl ApplicationConsumer {
    /// Create a new application consumer
    pub fn new(client: Client, subject: &str, queue_group: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            queue_group: queue_group.to_string(),
        }
    }

    /// Subscribe to the application subject as a queue-group member
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = self
            .client
            .queue_subscribe(self.subject.clone(), self.queue_group.clone())
            .await?;
        info!(
            subject = %self.subject,
            queue_group = %self.queue_group,
            "Subscribed to application subject"
        );
        Ok(subscriber)
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Get the queue group name
    pub fn queue_group(&self) -> &str {
        &self.queue_group
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
