// Screening application services: rubric persistence, access key gate, uploads.

pub mod access;
pub mod rubric;
pub mod upload;

pub use access::AccessGate;
pub use rubric::{ScreeningConfig, ScreeningConfigStore, SCREENING_CONFIG_PATH};
pub use upload::upload_file;
