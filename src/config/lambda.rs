use crate::adapters::spreadsheet::default_filename_columns;
use crate::core::{BlobStore, ConfigProvider, Storage};
use crate::domain::model::{BlobObject, ListPage};
use crate::utils::error::{ReconcileError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub sheet_key: String,
    pub report_prefix: String,
    pub filename_columns: Vec<String>,
    pub page_size: usize,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            s3_bucket: env::var("S3_BUCKET").map_err(|_| ReconcileError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "pdfs/".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            sheet_key: env::var("SHEET_KEY").unwrap_or_default(),
            report_prefix: env::var("REPORT_PREFIX").unwrap_or_else(|_| "reports".to_string()),
            filename_columns: env::var("FILENAME_COLUMNS")
                .map(|raw| {
                    raw.split(',')
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| default_filename_columns()),
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(1000),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn sheet_path(&self) -> &str {
        &self.sheet_key
    }

    fn filename_columns(&self) -> &[String] {
        &self.filename_columns
    }

    fn sheet_delimiter(&self) -> Option<u8> {
        None
    }

    fn blob_prefix(&self) -> &str {
        &self.s3_prefix
    }

    fn output_path(&self) -> &str {
        &self.report_prefix
    }

    fn write_report(&self) -> bool {
        true
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;
        validate_path("sheet_key", &self.sheet_key)?;
        validate_non_empty_string("report_prefix", &self.report_prefix)?;
        validate_aws_region("s3_region", &self.s3_region)?;

        // S3 單頁上限 1000
        validate_positive_number("page_size", self.page_size, 1)?;
        validate_range("page_size", self.page_size, 1, 1000)?;

        if self.filename_columns.is_empty() {
            return Err(ReconcileError::MissingConfigError {
                field: "FILENAME_COLUMNS".to_string(),
            });
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| ReconcileError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ReconcileError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

fn s3_error(action: &str, err: impl std::fmt::Display) -> ReconcileError {
    ReconcileError::StoreError {
        message: format!("Failed to {} in S3: {}", action, err),
    }
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| s3_error("read object", e))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| s3_error("collect object body", e))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type("application/json")
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| s3_error("write object", e))?;
        Ok(())
    }
}

/// S3 bucket as a blob store; URLs are `s3://{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    page_size: i32,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String, page_size: usize) -> Self {
        Self {
            client,
            bucket,
            page_size: page_size.clamp(1, 1000) as i32,
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Result<&'a str> {
        url.strip_prefix("s3://")
            .and_then(|rest| rest.strip_prefix(self.bucket.as_str()))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ReconcileError::StoreError {
                message: format!("'{}' is not an object in bucket {}", url, self.bucket),
            })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn list(&self, prefix: &str, cursor: Option<&str>) -> Result<ListPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .max_keys(self.page_size)
            .set_continuation_token(cursor.map(String::from))
            .send()
            .await
            .map_err(|e| s3_error("list objects", e))?;

        let blobs = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                Some(BlobObject {
                    url: self.url_for(key),
                    pathname: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    uploaded_at: object
                        .last_modified()
                        .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), 0)),
                })
            })
            .collect();

        let has_more = output.is_truncated().unwrap_or(false);
        Ok(ListPage {
            blobs,
            cursor: output.next_continuation_token().map(String::from),
            has_more,
        })
    }

    async fn put(&self, pathname: &str, data: Vec<u8>, content_type: &str) -> Result<BlobObject> {
        let size = data.len() as u64;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(pathname)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| s3_error("put object", e))?;

        Ok(BlobObject {
            url: self.url_for(pathname),
            pathname: pathname.to_string(),
            size,
            uploaded_at: Some(Utc::now()),
        })
    }

    async fn delete(&self, urls: &[String]) -> Result<()> {
        for url in urls {
            let key = self.key_from_url(url)?;
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| s3_error("delete object", e))?;
        }
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let key = self.key_from_url(url)?;
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| s3_error("read object", e))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| s3_error("collect object body", e))?;
        Ok(data.into_bytes().to_vec())
    }
}
