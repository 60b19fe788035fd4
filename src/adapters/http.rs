use crate::domain::model::{BlobObject, ListPage};
use crate::domain::ports::BlobStore;
use crate::utils::error::{ReconcileError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

const DEFAULT_PAGE_SIZE: usize = 1000;

/// Client for a token-authenticated REST blob API.
///
/// - `GET {endpoint}?prefix=&limit=&cursor=` lists objects
/// - `PUT {endpoint}/{pathname}` stores an object
/// - `POST {endpoint}/delete` with `{"urls": [...]}` removes objects
/// - `GET {url}` downloads an object
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
    token: String,
    page_size: usize,
}

impl HttpBlobStore {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// 非 2xx 回應轉成錯誤，401/403 視為權限問題
    async fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Blob API {} failed with {}: {}", action, status, body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ReconcileError::Unauthorized {
                message: format!("blob store rejected the token while trying to {}", action),
            }),
            _ => Err(ReconcileError::StoreError {
                message: format!("{} failed with status {}: {}", action, status, body.trim()),
            }),
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        let limit = self.page_size.to_string();
        let mut request = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .query(&[("prefix", prefix), ("limit", limit.as_str())]);

        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        tracing::debug!("Listing {} (prefix: '{}', cursor: {:?})", self.endpoint, prefix, cursor);
        let response = Self::check_status(request.send().await?, "list blobs").await?;
        Ok(response.json::<ListPage>().await?)
    }

    async fn put(&self, pathname: &str, data: Vec<u8>, content_type: &str) -> Result<BlobObject> {
        let url = format!("{}/{}", self.endpoint, pathname.trim_start_matches('/'));
        let size = data.len();

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let response = Self::check_status(response, "upload blob").await?;

        tracing::debug!("Uploaded {} ({} bytes)", pathname, size);
        Ok(response.json::<BlobObject>().await?)
    }

    async fn delete(&self, urls: &[String]) -> Result<()> {
        if urls.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(format!("{}/delete", self.endpoint))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "urls": urls }))
            .send()
            .await?;
        Self::check_status(response, "delete blobs").await?;

        tracing::debug!("Deleted {} blob(s)", urls.len());
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        // 私有 store 的下載同樣需要 token
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = Self::check_status(response, "download blob").await?;
        Ok(response.bytes().await?.to_vec())
    }
}
