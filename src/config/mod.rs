#[cfg(feature = "lambda")]
pub mod lambda;
pub mod settings;
pub mod toml_config;

pub use settings::{SettingsOverrides, StoreSettings, VerifySettings};
pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "verify-blob-vs-excel")]
#[command(about = "Check that every PDF listed in a Scopus/WoS export exists in the blob store")]
pub struct CliConfig {
    /// Spreadsheet export (CSV/TSV) with a filename column
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Header(s) of the filename column, overriding the built-in aliases
    #[arg(long = "column", value_delimiter = ',')]
    pub filename_columns: Vec<String>,

    /// Only compare blobs under this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,

    #[arg(long, env = "BLOB_STORE_URL")]
    pub store_url: Option<String>,

    #[arg(long, env = "BLOB_READ_WRITE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Use a local directory as the blob store instead of the HTTP API
    #[arg(long)]
    pub store_dir: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write reconciliation_report.json to the output path
    #[arg(long)]
    pub json: bool,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            sheet_path: self.sheet.clone(),
            filename_columns: self.filename_columns.clone(),
            prefix: self.prefix.clone(),
            store_url: self.store_url.clone(),
            token: self.token.clone(),
            store_dir: self.store_dir.clone(),
            output_path: self.output_path.clone(),
            page_size: self.page_size,
            write_report: self.json,
        }
    }

    /// 合併 TOML 檔案與命令列參數
    pub fn resolve(&self) -> Result<VerifySettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        VerifySettings::resolve(file, self.overrides())
    }
}
