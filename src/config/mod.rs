pub mod cli;
pub mod toml_config;

use crate::adapters::pubsub::{Credentials, PubSubConnector, DEFAULT_ENDPOINT};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;

pub use cli::CliArgs;
pub use toml_config::TomlConfig;

pub const DEFAULT_PROJECT_ID: &str = "bdb-org-cicd";
pub const DEFAULT_TOPIC_ID: &str = "bq-conn-topic";
pub const DEFAULT_FIRST_NAME: &str = "John";
pub const DEFAULT_LAST_NAME: &str = "Doe";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Fully resolved settings for one relay run.
#[derive(Clone)]
pub struct RelayConfig {
    pub project_id: String,
    pub topic_id: String,
    pub first_name: String,
    pub last_name: String,
    pub endpoint: String,
    pub emulator_host: Option<String>,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    pub dry_run: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            topic_id: DEFAULT_TOPIC_ID.to_string(),
            first_name: DEFAULT_FIRST_NAME.to_string(),
            last_name: DEFAULT_LAST_NAME.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            emulator_host: None,
            access_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            dry_run: false,
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("project_id", &self.project_id)
            .field("topic_id", &self.topic_id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("endpoint", &self.endpoint)
            .field("emulator_host", &self.emulator_host)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl RelayConfig {
    /// Merges command-line arguments over the optional TOML file over defaults.
    pub fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        Ok(Self::merge(args, &file))
    }

    pub fn merge(args: &CliArgs, file: &TomlConfig) -> Self {
        let publisher = file.publisher();
        let record = file.record();
        let defaults = Self::default();

        Self {
            project_id: args
                .project_id
                .clone()
                .or(publisher.project_id)
                .unwrap_or(defaults.project_id),
            topic_id: args
                .topic_id
                .clone()
                .or(publisher.topic_id)
                .unwrap_or(defaults.topic_id),
            first_name: args
                .first_name
                .clone()
                .or(record.first_name)
                .unwrap_or(defaults.first_name),
            last_name: args
                .last_name
                .clone()
                .or(record.last_name)
                .unwrap_or(defaults.last_name),
            endpoint: args
                .endpoint
                .clone()
                .or(publisher.endpoint)
                .unwrap_or(defaults.endpoint),
            emulator_host: args.emulator_host.clone().or(publisher.emulator_host),
            access_token: args.access_token.clone().or(publisher.access_token),
            timeout_seconds: args
                .timeout_seconds
                .or(publisher.timeout_seconds)
                .unwrap_or(defaults.timeout_seconds),
            dry_run: args.dry_run,
        }
    }

    /// Builds the broker connector; an emulator host takes precedence over the endpoint.
    pub fn connector(&self) -> PubSubConnector {
        match &self.emulator_host {
            Some(host) => PubSubConnector::emulator(host),
            None => PubSubConnector::new(
                self.endpoint.clone(),
                self.access_token.clone().map(Credentials::AccessToken),
            ),
        }
    }
}

impl ConfigProvider for RelayConfig {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn topic_id(&self) -> &str {
        &self.topic_id
    }

    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_project_id("project_id", &self.project_id)?;
        validation::validate_topic_id("topic_id", &self.topic_id)?;
        validation::validate_range(
            "timeout_seconds",
            self.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        match &self.emulator_host {
            Some(host) => {
                validation::validate_non_empty_string("emulator_host", host)?;
                validation::validate_url("emulator_host", &format!("http://{}", host))?;
            }
            None => validation::validate_url("endpoint", &self.endpoint)?,
        }

        Ok(())
    }
}
