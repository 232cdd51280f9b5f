use crate::domain::model::{Destination, EncodedDocuments, NameRecord, OutboundMessage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn project_id(&self) -> &str;
    fn topic_id(&self) -> &str;
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;
    fn publish_timeout(&self) -> Duration;

    fn destination(&self) -> Destination {
        Destination::new(self.project_id(), self.topic_id())
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn build(&self) -> Result<NameRecord>;
    fn encode(&self, record: NameRecord) -> Result<EncodedDocuments>;
    async fn publish(&self, documents: &EncodedDocuments) -> Result<String>;
}

/// Opens broker clients scoped to a project.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, project_id: &str) -> Result<Box<dyn BrokerClient>>;
}

#[async_trait]
pub trait BrokerClient: Send + Sync {
    fn topic(&self, topic_id: &str) -> Box<dyn TopicHandle>;
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait TopicHandle: Send + Sync {
    /// Resolves once the broker acknowledges the message, yielding its ID.
    async fn publish(&self, message: OutboundMessage) -> Result<String>;
    async fn stop(&self);
}
