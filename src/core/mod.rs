pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod report;

pub use crate::domain::model::{
    EngineOutput, ReconciliationReport, ReconciliationResult, Sources,
};
pub use crate::domain::ports::{BlobStore, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
