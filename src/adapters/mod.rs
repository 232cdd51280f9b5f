// Adapters layer: concrete implementations of the broker ports.

pub mod pubsub;

pub use pubsub::{Credentials, PubSubConnector};
