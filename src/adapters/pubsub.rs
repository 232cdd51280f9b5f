//! Google Cloud Pub/Sub client over the v1 REST API.
//!
//! Authenticates with a bearer access token, or with no credentials when
//! pointed at the Pub/Sub emulator.

use crate::core::{BrokerClient, Connector, OutboundMessage, TopicHandle};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub enum Credentials {
    AccessToken(String),
    /// Emulator endpoints accept unauthenticated requests.
    Emulator,
}

#[derive(Debug, Clone)]
pub struct PubSubConnector {
    endpoint: String,
    credentials: Option<Credentials>,
}

impl PubSubConnector {
    pub fn new(endpoint: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Connector for a `host:port` emulator address, as found in `PUBSUB_EMULATOR_HOST`.
    pub fn emulator(host: &str) -> Self {
        Self::new(format!("http://{}", host), Some(Credentials::Emulator))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connection_error(project_id: &str, message: impl Into<String>) -> RelayError {
        RelayError::ConnectionError {
            project_id: project_id.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Connector for PubSubConnector {
    async fn connect(&self, project_id: &str) -> Result<Box<dyn BrokerClient>> {
        let mut headers = HeaderMap::new();
        match &self.credentials {
            Some(Credentials::AccessToken(token)) => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                        Self::connection_error(project_id, format!("invalid access token: {}", e))
                    })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Some(Credentials::Emulator) => {
                tracing::debug!("Using Pub/Sub emulator at {}", self.endpoint);
            }
            None => {
                return Err(Self::connection_error(
                    project_id,
                    "no access token available; set PUBSUB_ACCESS_TOKEN or PUBSUB_EMULATOR_HOST",
                ));
            }
        }

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Self::connection_error(project_id, e.to_string()))?;

        tracing::debug!("Opened Pub/Sub client for project {}", project_id);
        Ok(Box::new(PubSubClient {
            http,
            endpoint: self.endpoint.clone(),
            project_id: project_id.to_string(),
            closed: Arc::new(AtomicBool::new(false)),
        }))
    }
}

pub struct PubSubClient {
    http: Client,
    endpoint: String,
    project_id: String,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl BrokerClient for PubSubClient {
    fn topic(&self, topic_id: &str) -> Box<dyn TopicHandle> {
        Box::new(PubSubTopic {
            http: self.http.clone(),
            url: format!(
                "{}/v1/projects/{}/topics/{}:publish",
                self.endpoint, self.project_id, topic_id
            ),
            project_id: self.project_id.clone(),
            topic_id: topic_id.to_string(),
            client_closed: self.closed.clone(),
            stopped: AtomicBool::new(false),
        })
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        tracing::debug!("Closed Pub/Sub client for project {}", self.project_id);
        Ok(())
    }
}

pub struct PubSubTopic {
    http: Client,
    url: String,
    project_id: String,
    topic_id: String,
    client_closed: Arc<AtomicBool>,
    stopped: AtomicBool,
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    data: String,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl PubSubTopic {
    fn publish_error(&self, message: impl Into<String>) -> RelayError {
        RelayError::PublishError {
            topic: self.topic_id.clone(),
            message: message.into(),
        }
    }

    fn describe_failure(status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse { error }) => match error.status {
                Some(code) => format!("{} ({}): {}", status, code, error.message),
                None => format!("{}: {}", status, error.message),
            },
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => format!("{}: {}", status, body.trim()),
        }
    }
}

#[async_trait]
impl TopicHandle for PubSubTopic {
    async fn publish(&self, message: OutboundMessage) -> Result<String> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(self.publish_error("topic handle has been stopped"));
        }
        if self.client_closed.load(Ordering::SeqCst) {
            return Err(self.publish_error("client has been closed"));
        }

        let request = PublishRequest {
            messages: vec![WireMessage {
                data: STANDARD.encode(&message.data),
                attributes: message.attributes,
            }],
        };

        tracing::debug!("POST {}", self.url);
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.publish_error(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Pub/Sub response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = Self::describe_failure(status, &body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RelayError::ConnectionError {
                    project_id: self.project_id.clone(),
                    message: detail,
                },
                _ => self.publish_error(detail),
            });
        }

        let body: PublishResponse = response
            .json()
            .await
            .map_err(|e| self.publish_error(format!("malformed publish response: {}", e)))?;

        body.message_ids
            .into_iter()
            .next()
            .ok_or_else(|| self.publish_error("broker returned no message id"))
    }

    async fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        tracing::debug!("Stopped topic handle for {}", self.topic_id);
    }
}
