use anyhow::Context;
use clap::Parser;
use xml_relay::utils::{logger, validation::Validate};
use xml_relay::{CliArgs, EnvelopePipeline, RelayConfig, RelayEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting xml-relay");

    let config = RelayConfig::resolve(&args).context("failed to load configuration")?;
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!(
        "Destination: projects/{}/topics/{}",
        config.project_id,
        config.topic_id
    );

    let connector = config.connector();
    let engine = RelayEngine::new(EnvelopePipeline::new(config.clone(), connector))
        .with_dry_run(config.dry_run);

    match engine.run().await {
        Ok(outcome) => {
            match outcome.message_id {
                Some(id) => tracing::info!("Relay completed, message id {}", id),
                None => tracing::info!("Dry run completed, nothing published"),
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Relay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
