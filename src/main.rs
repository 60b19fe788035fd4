use clap::Parser;
use screen_reconcile::core::BlobStore;
use screen_reconcile::utils::error::ReconcileError;
use screen_reconcile::utils::logger;
use screen_reconcile::{
    CliConfig, HttpBlobStore, LocalBlobStore, LocalStorage, ReconcileEngine, StoreSettings,
    VerifyPipeline, VerifySettings,
};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting verify-blob-vs-excel");
    if config.verbose {
        // token 不寫入日誌
        tracing::debug!(
            "CLI config: sheet={:?} prefix={:?} store_url={:?} store_dir={:?} config={:?}",
            config.sheet,
            config.prefix,
            config.store_url,
            config.store_dir,
            config.config
        );
    }

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    tracing::info!("✅ Configuration loaded and validated successfully");

    let outcome = match settings.store.clone() {
        StoreSettings::Http {
            endpoint,
            token,
            timeout_seconds,
        } => {
            let mut store = HttpBlobStore::new(endpoint, token).with_page_size(settings.page_size);
            if let Some(seconds) = timeout_seconds {
                store = match store.with_timeout(Duration::from_secs(seconds)) {
                    Ok(store) => store,
                    Err(e) => exit_with(&e),
                };
            }
            run(store, settings).await
        }
        StoreSettings::Local { root } => {
            let store = LocalBlobStore::new(root).with_page_size(settings.page_size);
            run(store, settings).await
        }
    };

    match outcome {
        Ok((output_path, mismatches)) => {
            tracing::info!("📁 Report: {}", output_path);
            if mismatches > 0 {
                tracing::warn!("⚠️ {} filename(s) did not reconcile", mismatches);
            }
        }
        Err(e) => exit_with(&e),
    }
}

async fn run<B: BlobStore>(
    store: B,
    settings: VerifySettings,
) -> screen_reconcile::Result<(String, usize)> {
    // 試算表路徑相對於目前目錄
    let storage = LocalStorage::new(".".to_string());
    let pipeline = VerifyPipeline::new(storage, store, settings);
    let engine = ReconcileEngine::new(pipeline);

    let output = engine.run().await?;
    let result = &output.report.result;
    Ok((
        output.output_path,
        result.only_in_a.len() + result.only_in_b.len(),
    ))
}

fn exit_with(e: &ReconcileError) -> ! {
    tracing::error!(
        "❌ Verification failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
