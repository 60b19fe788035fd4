// Adapters layer: concrete implementations for external systems (spreadsheets, blob stores, files).

pub mod http;
pub mod listing;
pub mod spreadsheet;
pub mod storage;

pub use http::HttpBlobStore;
pub use listing::{basename, join_prefix, list_all};
pub use storage::{LocalBlobStore, LocalStorage};
