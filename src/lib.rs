pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod screening;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3BlobStore, S3Storage};

pub use adapters::{HttpBlobStore, LocalBlobStore, LocalStorage};
pub use config::{StoreSettings, VerifySettings};
pub use crate::core::{
    engine::ReconcileEngine, normalize::normalize, pipeline::VerifyPipeline, reconcile::reconcile,
};
pub use domain::model::{ReconciliationReport, ReconciliationResult};
pub use utils::error::{ReconcileError, Result};
