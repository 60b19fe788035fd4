use crate::domain::model::BlobObject;
use crate::domain::ports::BlobStore;
use crate::utils::error::{ReconcileError, Result};
use std::collections::HashSet;

/// Page through `prefix` until the store reports no more results.
pub async fn list_all<B: BlobStore + ?Sized>(store: &B, prefix: &str) -> Result<Vec<BlobObject>> {
    let mut blobs = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen_cursors = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = store.list(prefix, cursor.as_deref()).await?;
        pages += 1;
        tracing::debug!(
            "📄 Listing page {} under '{}': {} objects (has_more: {})",
            pages,
            prefix,
            page.blobs.len(),
            page.has_more
        );
        blobs.extend(page.blobs);

        if !page.has_more {
            break;
        }

        match page.cursor {
            Some(next) if seen_cursors.insert(next.clone()) => cursor = Some(next),
            Some(next) => {
                return Err(ReconcileError::StoreError {
                    message: format!("listing returned repeated cursor '{}'", next),
                });
            }
            None => {
                return Err(ReconcileError::StoreError {
                    message: "listing reported more results without a cursor".to_string(),
                });
            }
        }
    }

    tracing::info!(
        "📦 Listed {} objects under '{}' in {} page(s)",
        blobs.len(),
        prefix,
        pages
    );
    Ok(blobs)
}

/// Final `/`-separated segment of a pathname.
pub fn basename(pathname: &str) -> &str {
    pathname.rsplit('/').next().unwrap_or(pathname)
}

pub fn join_prefix(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ListPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 以固定頁面回應的假 store
    struct PagedStore {
        pages: Vec<ListPage>,
        requested: Mutex<Vec<Option<String>>>,
    }

    fn blob(pathname: &str) -> BlobObject {
        BlobObject {
            url: format!("https://blob.test/{}", pathname),
            pathname: pathname.to_string(),
            size: 1,
            uploaded_at: None,
        }
    }

    fn page(names: &[&str], cursor: Option<&str>, has_more: bool) -> ListPage {
        ListPage {
            blobs: names.iter().map(|n| blob(n)).collect(),
            cursor: cursor.map(String::from),
            has_more,
        }
    }

    #[async_trait]
    impl BlobStore for PagedStore {
        async fn list(&self, _prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
            let mut requested = self.requested.lock().unwrap();
            let index = requested.len();
            requested.push(cursor.map(String::from));
            Ok(self.pages[index].clone())
        }

        async fn put(&self, _pathname: &str, _data: Vec<u8>, _ct: &str) -> Result<BlobObject> {
            unimplemented!()
        }

        async fn delete(&self, _urls: &[String]) -> Result<()> {
            unimplemented!()
        }

        async fn get(&self, _url: &str) -> Result<Vec<u8>> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_list_all_follows_cursor() {
        let store = PagedStore {
            pages: vec![
                page(&["pdfs/a.pdf", "pdfs/b.pdf"], Some("c1"), true),
                page(&["pdfs/c.pdf"], Some("c2"), true),
                page(&[], None, false),
            ],
            requested: Mutex::new(Vec::new()),
        };

        let blobs = list_all(&store, "pdfs/").await.unwrap();

        let names: Vec<&str> = blobs.iter().map(|b| b.pathname.as_str()).collect();
        assert_eq!(names, vec!["pdfs/a.pdf", "pdfs/b.pdf", "pdfs/c.pdf"]);
        assert_eq!(
            *store.requested.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_all_rejects_repeated_cursor() {
        let store = PagedStore {
            pages: vec![
                page(&["a.pdf"], Some("same"), true),
                page(&["b.pdf"], Some("same"), true),
            ],
            requested: Mutex::new(Vec::new()),
        };

        let err = list_all(&store, "").await.unwrap_err();
        assert!(matches!(err, ReconcileError::StoreError { .. }));
    }

    #[tokio::test]
    async fn test_list_all_rejects_missing_cursor() {
        let store = PagedStore {
            pages: vec![page(&["a.pdf"], None, true)],
            requested: Mutex::new(Vec::new()),
        };

        assert!(list_all(&store, "").await.is_err());
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("pdfs/2024/Smith.pdf"), "Smith.pdf");
        assert_eq!(basename("Smith.pdf"), "Smith.pdf");
        assert_eq!(basename("pdfs/"), "");
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("pdfs/", "a.pdf"), "pdfs/a.pdf");
        assert_eq!(join_prefix("pdfs", "a.pdf"), "pdfs/a.pdf");
        assert_eq!(join_prefix("", "a.pdf"), "a.pdf");
    }
}
