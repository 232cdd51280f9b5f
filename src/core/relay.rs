use crate::core::{EncodedDocuments, Pipeline};
use crate::utils::error::Result;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub documents: EncodedDocuments,
    /// `None` for a dry run.
    pub message_id: Option<String>,
}

pub struct RelayEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> RelayEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<RelayOutcome> {
        let mut stdout = std::io::stdout();
        self.run_with_output(&mut stdout).await
    }

    /// Runs build, encode, and publish once, writing the documents and the
    /// acknowledged message ID to `out`.
    pub async fn run_with_output<W: Write + Send>(&self, out: &mut W) -> Result<RelayOutcome> {
        tracing::info!("Building record");
        let record = self.pipeline.build()?;

        tracing::info!("Encoding record");
        let documents = self.pipeline.encode(record)?;
        writeln!(out, "XML to be published:\n{}", documents.xml)?;
        writeln!(out, "JSON to be published:\n{}", documents.json)?;
        out.flush()?;

        if self.dry_run {
            tracing::info!("Dry run - skipping publish");
            return Ok(RelayOutcome {
                documents,
                message_id: None,
            });
        }

        tracing::info!("Publishing envelope");
        let message_id = self.pipeline.publish(&documents).await?;
        writeln!(out, "Published message with id {}", message_id)?;

        Ok(RelayOutcome {
            documents,
            message_id: Some(message_id),
        })
    }
}
