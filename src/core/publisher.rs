use crate::core::{Connector, Destination, OutboundMessage};
use crate::utils::error::{RelayError, Result};
use std::time::Duration;

/// Delivers one payload to a fixed destination and waits for the broker's ack.
///
/// Exactly one publish attempt is made per call. The client connection and
/// topic handle opened for the attempt are released before `publish` returns,
/// whether it succeeded, was rejected, or ran past the deadline.
pub struct Publisher<C: Connector> {
    connector: C,
    destination: Destination,
    timeout: Duration,
}

impl<C: Connector> Publisher<C> {
    pub fn new(connector: C, destination: Destination, timeout: Duration) -> Self {
        Self {
            connector,
            destination,
            timeout,
        }
    }

    pub async fn publish(&self, payload: &[u8]) -> Result<String> {
        let Destination {
            project_id,
            topic_id,
        } = &self.destination;

        tracing::debug!("Connecting to messaging service for project {}", project_id);
        let client = self.connector.connect(project_id).await?;
        let topic = client.topic(topic_id);

        let message = OutboundMessage::json(payload);
        tracing::info!(
            "Publishing {} bytes to projects/{}/topics/{}",
            message.data.len(),
            project_id,
            topic_id
        );

        let outcome = match tokio::time::timeout(self.timeout, topic.publish(message)).await {
            Ok(result) => result,
            Err(_) => Err(RelayError::PublishTimeout {
                topic: topic_id.clone(),
                timeout: self.timeout,
            }),
        };

        topic.stop().await;
        if let Err(e) = client.close().await {
            tracing::warn!("Failed to close messaging client cleanly: {}", e);
        }

        match &outcome {
            Ok(message_id) => tracing::info!("Broker acknowledged message {}", message_id),
            Err(e) => tracing::error!("Publish to {} failed: {}", topic_id, e),
        }

        outcome
    }
}
