use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use xml_relay::core::{
    encoder, BrokerClient, Connector, EnvelopeRecord, NameRecord, OutboundMessage, TopicHandle,
};
use xml_relay::{EnvelopePipeline, RelayConfig, RelayEngine, RelayError};

/// Simulated broker recording every call made against it.
#[derive(Default)]
struct SimulatedBroker {
    reject: bool,
    connects: AtomicUsize,
    published: Mutex<Vec<OutboundMessage>>,
    topic_stopped: AtomicBool,
    client_closed: AtomicBool,
}

#[derive(Clone)]
struct SimulatedConnector(Arc<SimulatedBroker>);

struct SimulatedClient(Arc<SimulatedBroker>);

struct SimulatedTopic(Arc<SimulatedBroker>);

#[async_trait]
impl Connector for SimulatedConnector {
    async fn connect(&self, _project_id: &str) -> xml_relay::Result<Box<dyn BrokerClient>> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SimulatedClient(self.0.clone())))
    }
}

#[async_trait]
impl BrokerClient for SimulatedClient {
    fn topic(&self, _topic_id: &str) -> Box<dyn TopicHandle> {
        Box::new(SimulatedTopic(self.0.clone()))
    }

    async fn close(&self) -> xml_relay::Result<()> {
        self.0.client_closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl TopicHandle for SimulatedTopic {
    async fn publish(&self, message: OutboundMessage) -> xml_relay::Result<String> {
        self.0.published.lock().unwrap().push(message);
        if self.0.reject {
            return Err(RelayError::PublishError {
                topic: "bq-conn-topic".to_string(),
                message: "broker rejected message".to_string(),
            });
        }
        Ok("sim-000123".to_string())
    }

    async fn stop(&self) {
        self.0.topic_stopped.store(true, Ordering::SeqCst);
    }
}

fn engine(
    broker: &Arc<SimulatedBroker>,
    config: RelayConfig,
) -> RelayEngine<EnvelopePipeline<RelayConfig, SimulatedConnector>> {
    RelayEngine::new(EnvelopePipeline::new(
        config,
        SimulatedConnector(broker.clone()),
    ))
}

#[tokio::test]
async fn test_printed_id_matches_broker_id() -> Result<()> {
    let broker = Arc::new(SimulatedBroker::default());
    let engine = engine(&broker, RelayConfig::default());

    let mut output = Vec::new();
    let outcome = engine.run_with_output(&mut output).await?;
    let printed = String::from_utf8(output)?;

    assert_eq!(outcome.message_id.as_deref(), Some("sim-000123"));
    assert!(printed.contains("Published message with id sim-000123"));

    let published = broker.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let envelope: EnvelopeRecord = serde_json::from_slice(&published[0].data)?;
    assert_eq!(envelope.first_name, "John");
    assert_eq!(envelope.last_name, "Doe");
    assert_eq!(envelope.raw_xml, outcome.documents.xml);

    assert!(broker.topic_stopped.load(Ordering::SeqCst));
    assert!(broker.client_closed.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn test_output_order_and_documents() -> Result<()> {
    let broker = Arc::new(SimulatedBroker::default());
    let engine = engine(&broker, RelayConfig::default());

    let mut output = Vec::new();
    engine.run_with_output(&mut output).await?;
    let printed = String::from_utf8(output)?;

    let expected = encoder::encode(&NameRecord::new("John", "Doe"))?;
    let xml_at = printed.find("XML to be published:\n").unwrap();
    let json_at = printed.find("JSON to be published:\n").unwrap();
    let id_at = printed.find("Published message with id").unwrap();

    assert!(xml_at < json_at && json_at < id_at);
    assert!(printed.contains(&format!("XML to be published:\n{}\n", expected.xml)));
    assert!(printed.contains(&format!("JSON to be published:\n{}\n", expected.json)));
    Ok(())
}

#[tokio::test]
async fn test_rejection_reports_failure_and_releases_resources() -> Result<()> {
    let broker = Arc::new(SimulatedBroker {
        reject: true,
        ..Default::default()
    });
    let engine = engine(&broker, RelayConfig::default());

    let mut output = Vec::new();
    let err = engine.run_with_output(&mut output).await.unwrap_err();
    let printed = String::from_utf8(output)?;

    assert!(matches!(err, RelayError::PublishError { .. }));
    assert_eq!(err.stage(), "publish");
    assert!(!printed.contains("Published message with id"));
    assert!(!printed.contains("sim-000123"));
    assert!(broker.topic_stopped.load(Ordering::SeqCst));
    assert!(broker.client_closed.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn test_dry_run_never_contacts_broker() -> Result<()> {
    let broker = Arc::new(SimulatedBroker::default());
    let config = RelayConfig {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        ..Default::default()
    };
    let engine = engine(&broker, config).with_dry_run(true);

    let mut output = Vec::new();
    let outcome = engine.run_with_output(&mut output).await?;
    let printed = String::from_utf8(output)?;

    assert!(outcome.message_id.is_none());
    assert!(outcome.documents.xml.contains("<firstName>Grace</firstName>"));
    assert!(printed.contains("JSON to be published:"));
    assert!(!printed.contains("Published message"));
    assert_eq!(broker.connects.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_unrepresentable_name_halts_before_publish() -> Result<()> {
    let broker = Arc::new(SimulatedBroker::default());
    let config = RelayConfig {
        first_name: "Jo\u{7}hn".to_string(),
        ..Default::default()
    };
    let engine = engine(&broker, config);

    let mut output = Vec::new();
    let err = engine.run_with_output(&mut output).await.unwrap_err();

    assert!(matches!(err, RelayError::InvalidXmlCharacter { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(output.is_empty());
    assert_eq!(broker.connects.load(Ordering::SeqCst), 0);
    assert!(broker.published.lock().unwrap().is_empty());
    Ok(())
}
