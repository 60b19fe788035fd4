use crate::domain::model::{BlobObject, ListPage};
use crate::domain::ports::{BlobStore, Storage};
use crate::utils::error::{ReconcileError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

pub const LOCAL_URL_SCHEME: &str = "local://";
const DEFAULT_PAGE_SIZE: usize = 1000;

/// Directory-backed blob store. Pathnames are `/`-separated paths relative
/// to `root`; the cursor is the offset into the sorted listing.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    page_size: usize,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn resolve(&self, pathname: &str) -> Result<PathBuf> {
        let relative = Path::new(pathname);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if pathname.is_empty() || escapes {
            return Err(ReconcileError::StoreError {
                message: format!("invalid pathname '{}'", pathname),
            });
        }
        Ok(self.root.join(relative))
    }

    fn pathname_from_url<'a>(&self, url: &'a str) -> Result<&'a str> {
        url.strip_prefix(LOCAL_URL_SCHEME)
            .ok_or_else(|| ReconcileError::StoreError {
                message: format!("not a local blob url: '{}'", url),
            })
    }

    fn describe(&self, pathname: String, path: &Path) -> Result<BlobObject> {
        let metadata = std::fs::metadata(path)?;
        let uploaded_at = metadata.modified().ok().map(DateTime::<Utc>::from);
        Ok(BlobObject {
            url: format!("{}{}", LOCAL_URL_SCHEME, pathname),
            pathname,
            size: metadata.len(),
            uploaded_at,
        })
    }

    fn all_pathnames(&self) -> Vec<(String, PathBuf)> {
        if !self.root.exists() {
            return Vec::new();
        }

        let mut entries: Vec<(String, PathBuf)> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let pathname = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                Some((pathname, entry.path().to_path_buf()))
            })
            .collect();

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        let offset = match cursor {
            Some(raw) => raw.parse::<usize>().map_err(|_| ReconcileError::StoreError {
                message: format!("invalid cursor '{}'", raw),
            })?,
            None => 0,
        };

        let matching: Vec<(String, PathBuf)> = self
            .all_pathnames()
            .into_iter()
            .filter(|(pathname, _)| pathname.starts_with(prefix))
            .collect();

        let end = offset.saturating_add(self.page_size).min(matching.len());
        let mut blobs = Vec::new();
        for (pathname, path) in matching.iter().take(end).skip(offset) {
            blobs.push(self.describe(pathname.clone(), path)?);
        }

        let has_more = end < matching.len();
        Ok(ListPage {
            blobs,
            cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn put(&self, pathname: &str, data: Vec<u8>, content_type: &str) -> Result<BlobObject> {
        let path = self.resolve(pathname)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data).await?;

        tracing::debug!(
            "Stored {} ({} bytes, {}) at {}",
            pathname,
            data.len(),
            content_type,
            path.display()
        );
        self.describe(pathname.to_string(), &path)
    }

    async fn delete(&self, urls: &[String]) -> Result<()> {
        for url in urls {
            let path = self.resolve(self.pathname_from_url(url)?)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!("Deleted {}", url),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!("⚠️ {} was already gone", url);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(self.pathname_from_url(url)?)?;
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_storage_round_trip_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("reports/latest.json", b"{}")
            .await
            .unwrap();

        assert_eq!(storage.read_file("reports/latest.json").await.unwrap(), b"{}");
        assert!(storage.read_file("missing.csv").await.is_err());
    }

    #[tokio::test]
    async fn test_put_then_list_under_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());

        store
            .put("pdfs/b.pdf", b"%PDF-b".to_vec(), "application/pdf")
            .await
            .unwrap();
        let stored = store
            .put("pdfs/a.pdf", b"%PDF-a".to_vec(), "application/pdf")
            .await
            .unwrap();
        store
            .put("config/screening-config.json", b"{}".to_vec(), "application/json")
            .await
            .unwrap();

        assert_eq!(stored.url, "local://pdfs/a.pdf");
        assert_eq!(stored.size, 6);

        let page = store.list("pdfs/", None).await.unwrap();
        let names: Vec<&str> = page.blobs.iter().map(|b| b.pathname.as_str()).collect();
        assert_eq!(names, vec!["pdfs/a.pdf", "pdfs/b.pdf"]);
        assert!(!page.has_more);
        assert_eq!(page.cursor, None);
    }

    #[tokio::test]
    async fn test_listing_paginates_by_offset() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path()).with_page_size(2);
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            store
                .put(name, b"x".to_vec(), "application/pdf")
                .await
                .unwrap();
        }

        let first = store.list("", None).await.unwrap();
        assert_eq!(first.blobs.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.cursor.as_deref(), Some("2"));

        let second = store.list("", first.cursor.as_deref()).await.unwrap();
        assert_eq!(second.blobs.len(), 1);
        assert_eq!(second.blobs[0].pathname, "c.pdf");
        assert!(!second.has_more);
    }

    #[tokio::test]
    async fn test_cursor_past_the_end_returns_empty_page() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path()).with_page_size(2);
        store
            .put("a.pdf", b"x".to_vec(), "application/pdf")
            .await
            .unwrap();

        let page = store.list("", Some(&usize::MAX.to_string())).await.unwrap();
        assert!(page.blobs.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.cursor, None);

        let page = store.list("", Some("5")).await.unwrap();
        assert!(page.blobs.is_empty());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_get_and_delete_by_url() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());
        let blob = store
            .put("pdfs/a.pdf", b"content".to_vec(), "application/pdf")
            .await
            .unwrap();

        assert_eq!(store.get(&blob.url).await.unwrap(), b"content");

        store.delete(&[blob.url.clone()]).await.unwrap();
        assert!(store.list("pdfs/", None).await.unwrap().blobs.is_empty());

        // 重複刪除不算錯誤
        store.delete(&[blob.url]).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_pathnames() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path());

        assert!(store
            .put("../outside.pdf", Vec::new(), "application/pdf")
            .await
            .is_err());
        assert!(store.get("https://elsewhere/a.pdf").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_root_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(temp_dir.path().join("never-created"));

        let page = store.list("", None).await.unwrap();
        assert!(page.blobs.is_empty());
        assert!(!page.has_more);
    }
}
