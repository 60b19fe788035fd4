use crate::domain::model::{BlobObject, ListPage, ReconciliationReport, Sources};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Plain file access used for reading spreadsheets and writing reports.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Opaque key-value object store with cursor-paginated listing.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage>;
    async fn put(&self, pathname: &str, data: Vec<u8>, content_type: &str) -> Result<BlobObject>;
    async fn delete(&self, urls: &[String]) -> Result<()>;
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn sheet_path(&self) -> &str;
    fn filename_columns(&self) -> &[String];
    /// `None` 代表依副檔名判斷
    fn sheet_delimiter(&self) -> Option<u8>;
    fn blob_prefix(&self) -> &str;
    fn output_path(&self) -> &str;
    fn write_report(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Sources>;
    async fn transform(&self, sources: Sources) -> Result<ReconciliationReport>;
    async fn load(&self, report: &ReconciliationReport) -> Result<String>;
}
