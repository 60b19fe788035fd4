use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of comparing spreadsheet filenames (source A) with blob store
/// basenames (source B) after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Keys present in both sources, carrying source A's original string.
    pub matched: Vec<String>,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
    /// Non-empty entries in A before deduplication.
    pub total_a: usize,
    pub unique_a: usize,
    pub total_b: usize,
    pub unique_b: usize,
    pub matched_count: usize,
}

/// Filenames gathered by the extract phase.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub filename_column: String,
    pub sheet_names: Vec<String>,
    pub blob_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub generated_at: DateTime<Utc>,
    pub sheet_path: String,
    pub filename_column: String,
    pub blob_prefix: String,
    pub result: ReconciliationResult,
}

/// Column pulled out of a spreadsheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetColumn {
    pub header: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    pub url: String,
    pub pathname: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// One page of a cursor-paginated store listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub blobs: Vec<BlobObject>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub output_path: String,
    pub report: ReconciliationReport,
}
