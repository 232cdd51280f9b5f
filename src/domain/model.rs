use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CONTENT_TYPE_ATTRIBUTE: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The record published by the relay. Encodes to XML as a `<Person>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "Person", rename_all = "camelCase")]
pub struct NameRecord {
    pub first_name: String,
    pub last_name: String,
}

impl NameRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// JSON envelope carrying the record fields plus its XML rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeRecord {
    pub first_name: String,
    pub last_name: String,
    pub raw_xml: String,
}

impl EnvelopeRecord {
    pub fn from_record(record: &NameRecord, raw_xml: impl Into<String>) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            raw_xml: raw_xml.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocuments {
    pub xml: String,
    pub json: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub data: Vec<u8>,
    pub attributes: HashMap<String, String>,
}

impl OutboundMessage {
    pub fn json(payload: impl Into<Vec<u8>>) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(
            CONTENT_TYPE_ATTRIBUTE.to_string(),
            JSON_CONTENT_TYPE.to_string(),
        );
        Self {
            data: payload.into(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub project_id: String,
    pub topic_id: String,
}

impl Destination {
    pub fn new(project_id: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            topic_id: topic_id.into(),
        }
    }
}
