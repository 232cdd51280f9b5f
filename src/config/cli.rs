use clap::Parser;

/// Command-line arguments. Unset options fall back to the TOML file, then to defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "xml-relay")]
#[command(about = "Encode a name record as XML, wrap it in JSON, and publish it to Pub/Sub")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub project_id: Option<String>,

    #[arg(long)]
    pub topic_id: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Pub/Sub REST endpoint
    #[arg(long, env = "PUBSUB_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Emulator address (host:port); disables authentication
    #[arg(long, env = "PUBSUB_EMULATOR_HOST")]
    pub emulator_host: Option<String>,

    /// OAuth2 access token used as bearer credentials
    #[arg(long, env = "PUBSUB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Seconds to wait for the publish acknowledgment
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Encode and print the documents without publishing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}
