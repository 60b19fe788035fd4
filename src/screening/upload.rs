use crate::adapters::listing::join_prefix;
use crate::domain::model::BlobObject;
use crate::domain::ports::BlobStore;
use crate::utils::error::{ReconcileError, Result};
use std::path::Path;

pub fn content_type_for(file_name: &str) -> &'static str {
    let lowered = file_name.to_ascii_lowercase();
    if lowered.ends_with(".pdf") {
        "application/pdf"
    } else if lowered.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}

/// Store a local file as `{prefix}/{file name}`.
pub async fn upload_file<B: BlobStore + ?Sized>(
    store: &B,
    prefix: &str,
    path: &Path,
) -> Result<BlobObject> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ReconcileError::InvalidConfigValueError {
            field: "files".to_string(),
            value: path.display().to_string(),
            reason: "Path has no usable file name".to_string(),
        })?;

    let data = tokio::fs::read(path).await?;
    let pathname = join_prefix(prefix, file_name);

    tracing::info!("⬆️ Uploading {} ({} bytes) to {}", path.display(), data.len(), pathname);
    store.put(&pathname, data, content_type_for(file_name)).await
}
