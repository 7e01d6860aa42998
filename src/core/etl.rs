use crate::core::{Pipeline, TransformResult};
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use chrono::Utc;

pub struct HarvestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> HarvestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("Starting harvest");

        // Extract
        tracing::info!("Acquiring results page...");
        let snapshot = self.pipeline.extract().await?;

        // Transform
        tracing::info!("Parsing {}...", snapshot.markup_path);
        let transformed = self.pipeline.transform(&snapshot).await?;
        tracing::info!("Parsed {} entries", transformed.entries.len());

        // Load
        tracing::info!("Writing paper files...");
        let loaded = self.pipeline.load(&transformed).await?;
        tracing::info!(
            "Saved {} papers to {}",
            loaded.files_written,
            loaded.output_dir
        );

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            markup_path: snapshot.markup_path,
            scroll: snapshot.scroll,
            entries: transformed.entries.len(),
            output_dir: loaded.output_dir,
            files_written: loaded.files_written,
            overwritten: loaded.overwritten,
        })
    }

    /// Runs acquisition and parsing only; nothing is written to the output
    /// directory.
    pub async fn plan(&self) -> Result<TransformResult> {
        let snapshot = self.pipeline.extract().await?;
        let transformed = self.pipeline.transform(&snapshot).await?;
        tracing::info!(
            "Dry run: {} entries would produce {} files",
            transformed.entries.len(),
            transformed.files.len()
        );
        Ok(transformed)
    }
}
