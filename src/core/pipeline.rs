use crate::core::encoder;
use crate::core::publisher::Publisher;
use crate::core::{ConfigProvider, Connector, EncodedDocuments, NameRecord, Pipeline};
use crate::utils::error::Result;

/// Builds the record from configuration, encodes it, and publishes the envelope.
pub struct EnvelopePipeline<C: ConfigProvider, K: Connector> {
    config: C,
    publisher: Publisher<K>,
}

impl<C: ConfigProvider, K: Connector> EnvelopePipeline<C, K> {
    pub fn new(config: C, connector: K) -> Self {
        let publisher = Publisher::new(connector, config.destination(), config.publish_timeout());
        Self { config, publisher }
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider, K: Connector> Pipeline for EnvelopePipeline<C, K> {
    fn build(&self) -> Result<NameRecord> {
        let record = NameRecord::new(self.config.first_name(), self.config.last_name());
        tracing::debug!("Built record: {:?}", record);
        Ok(record)
    }

    fn encode(&self, record: NameRecord) -> Result<EncodedDocuments> {
        encoder::encode(&record)
    }

    async fn publish(&self, documents: &EncodedDocuments) -> Result<String> {
        self.publisher.publish(documents.json.as_bytes()).await
    }
}
