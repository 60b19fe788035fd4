use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use screen_reconcile::utils::logger;
use screen_reconcile::utils::validation::Validate;
use screen_reconcile::{LambdaConfig, ReconcileEngine, S3BlobStore, S3Storage, VerifyPipeline};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Request {
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub sheet_key: Option<String>,
}

#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub output_path: String,
    pub matched_count: usize,
    pub only_in_sheet: Vec<String>,
    pub only_in_store: Vec<String>,
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting reconciliation Lambda function");

    // 事件參數優先於環境變數
    let mut lambda_config = LambdaConfig::from_env()?;
    if let Some(bucket) = event.payload.s3_bucket {
        lambda_config.s3_bucket = bucket;
    }
    if let Some(prefix) = event.payload.s3_prefix {
        lambda_config.s3_prefix = prefix;
    }
    if let Some(sheet_key) = event.payload.sheet_key {
        lambda_config.sheet_key = sheet_key;
    }
    lambda_config.validate()?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(config);

    let storage = S3Storage::new(s3_client.clone(), lambda_config.s3_bucket.clone());
    let store = S3BlobStore::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.page_size,
    );
    let pipeline = VerifyPipeline::new(storage, store, lambda_config);

    let output = ReconcileEngine::new(pipeline).run().await?;
    let result = output.report.result;

    tracing::info!("Reconciliation Lambda function completed successfully");
    Ok(Response {
        message: "Reconciliation completed successfully".to_string(),
        output_path: output.output_path,
        matched_count: result.matched_count,
        only_in_sheet: result.only_in_a,
        only_in_store: result.only_in_b,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
