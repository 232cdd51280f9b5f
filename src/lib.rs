pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::PubSubConnector;
pub use crate::config::{CliArgs, RelayConfig};
pub use crate::core::{pipeline::EnvelopePipeline, relay::RelayEngine};
pub use crate::utils::error::{RelayError, Result};
