use crate::adapters::listing::{basename, join_prefix, list_all};
use crate::adapters::spreadsheet::{delimiter_for_path, read_filename_column};
use crate::core::reconcile::reconcile;
use crate::core::report::{render_summary, REPORT_FILE};
use crate::core::{BlobStore, ConfigProvider, Pipeline, ReconciliationReport, Sources, Storage};
use crate::utils::error::Result;
use chrono::Utc;

/// Spreadsheet export vs. blob store verification.
pub struct VerifyPipeline<S: Storage, B: BlobStore, C: ConfigProvider> {
    storage: S,
    store: B,
    config: C,
}

impl<S: Storage, B: BlobStore, C: ConfigProvider> VerifyPipeline<S, B, C> {
    pub fn new(storage: S, store: B, config: C) -> Self {
        Self {
            storage,
            store,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, B: BlobStore, C: ConfigProvider> Pipeline for VerifyPipeline<S, B, C> {
    async fn extract(&self) -> Result<Sources> {
        let sheet_path = self.config.sheet_path();
        tracing::debug!("Reading spreadsheet from: {}", sheet_path);
        let data = self.storage.read_file(sheet_path).await?;

        let delimiter = self
            .config
            .sheet_delimiter()
            .unwrap_or_else(|| delimiter_for_path(sheet_path));
        let column =
            read_filename_column(&data, delimiter, self.config.filename_columns(), sheet_path)?;

        let blobs = list_all(&self.store, self.config.blob_prefix()).await?;
        let blob_names = blobs
            .iter()
            .map(|blob| basename(&blob.pathname).to_string())
            .collect();

        Ok(Sources {
            filename_column: column.header,
            sheet_names: column.values,
            blob_names,
        })
    }

    async fn transform(&self, sources: Sources) -> Result<ReconciliationReport> {
        let result = reconcile(&sources.sheet_names, &sources.blob_names);

        tracing::debug!(
            "Reconciled {} sheet names against {} blob names",
            result.total_a,
            result.total_b
        );

        Ok(ReconciliationReport {
            generated_at: Utc::now(),
            sheet_path: self.config.sheet_path().to_string(),
            filename_column: sources.filename_column,
            blob_prefix: self.config.blob_prefix().to_string(),
            result,
        })
    }

    async fn load(&self, report: &ReconciliationReport) -> Result<String> {
        println!("{}", render_summary(report));

        if !self.config.write_report() {
            return Ok("stdout".to_string());
        }

        let output_path = join_prefix(self.config.output_path(), REPORT_FILE);
        let json_data = serde_json::to_string_pretty(report)?;

        tracing::debug!("Writing report ({} bytes) to storage", json_data.len());
        self.storage
            .write_file(&output_path, json_data.as_bytes())
            .await?;

        Ok(output_path)
    }
}
