use crate::core::{EngineOutput, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReconcileEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReconcileEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EngineOutput> {
        let started = Instant::now();
        tracing::info!("🚀 Starting reconciliation...");

        // Extract
        tracing::info!("📥 Collecting filenames...");
        let sources = self.pipeline.extract().await?;
        tracing::info!(
            "Collected {} spreadsheet rows and {} blob objects",
            sources.sheet_names.len(),
            sources.blob_names.len()
        );

        // Transform
        tracing::info!("🔄 Reconciling...");
        let report = self.pipeline.transform(sources).await?;
        tracing::info!(
            "Matched {} / only in spreadsheet {} / only in store {}",
            report.result.matched_count,
            report.result.only_in_a.len(),
            report.result.only_in_b.len()
        );

        // Load
        tracing::info!("💾 Reporting...");
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!("Report written to: {} ({:?})", output_path, started.elapsed());

        Ok(EngineOutput {
            output_path,
            report,
        })
    }
}
