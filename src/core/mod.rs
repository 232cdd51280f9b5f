pub mod encoder;
pub mod pipeline;
pub mod publisher;
pub mod relay;

pub use crate::domain::model::{
    Destination, EncodedDocuments, EnvelopeRecord, NameRecord, OutboundMessage,
};
pub use crate::domain::ports::{
    BrokerClient, ConfigProvider, Connector, Pipeline, TopicHandle,
};
pub use crate::utils::error::Result;
