use crate::adapters::spreadsheet::default_filename_columns;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::{ReconcileError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};

pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Http {
        endpoint: String,
        token: String,
        timeout_seconds: Option<u64>,
    },
    Local {
        root: String,
    },
}

/// Values given on the command line; anything set here wins over the file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub sheet_path: Option<String>,
    pub filename_columns: Vec<String>,
    pub prefix: Option<String>,
    pub store_url: Option<String>,
    pub token: Option<String>,
    pub store_dir: Option<String>,
    pub output_path: Option<String>,
    pub page_size: Option<usize>,
    pub write_report: bool,
}

/// Fully resolved inputs for one verification run.
#[derive(Debug, Clone)]
pub struct VerifySettings {
    pub sheet_path: String,
    pub filename_columns: Vec<String>,
    pub delimiter: Option<u8>,
    pub blob_prefix: String,
    pub store: StoreSettings,
    pub page_size: usize,
    pub output_path: String,
    pub write_report: bool,
}

fn missing(field: &str) -> ReconcileError {
    ReconcileError::MissingConfigError {
        field: field.to_string(),
    }
}

/// 空字串或未展開的 `${VAR}` 視為未設定
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && !v.contains("${"))
}

impl VerifySettings {
    pub fn resolve(file: TomlConfig, overrides: SettingsOverrides) -> Result<Self> {
        let delimiter = file.delimiter()?;
        let TomlConfig {
            spreadsheet,
            store,
            report,
        } = file;

        let sheet_path =
            present(overrides.sheet_path.or(spreadsheet.path)).ok_or_else(|| missing("sheet"))?;

        let filename_columns = if !overrides.filename_columns.is_empty() {
            overrides.filename_columns
        } else {
            spreadsheet
                .filename_columns
                .filter(|columns| !columns.is_empty())
                .unwrap_or_else(default_filename_columns)
        };

        let use_local = match (overrides.store_dir.is_some(), store.kind.as_deref()) {
            (true, _) => true,
            (false, None) | (false, Some("http")) => false,
            (false, Some("local")) => true,
            (false, Some(other)) => {
                return Err(ReconcileError::InvalidConfigValueError {
                    field: "store.kind".to_string(),
                    value: other.to_string(),
                    reason: "Supported kinds: http, local".to_string(),
                });
            }
        };

        let store_settings = if use_local {
            StoreSettings::Local {
                root: present(overrides.store_dir.or(store.root))
                    .ok_or_else(|| missing("store_dir"))?,
            }
        } else {
            StoreSettings::Http {
                endpoint: present(overrides.store_url.or(store.endpoint))
                    .ok_or_else(|| missing("store_url"))?,
                token: present(overrides.token.or(store.token)).ok_or_else(|| missing("token"))?,
                timeout_seconds: store.timeout_seconds,
            }
        };

        let settings = Self {
            sheet_path,
            filename_columns,
            delimiter,
            blob_prefix: overrides.prefix.or(store.prefix).unwrap_or_default(),
            store: store_settings,
            page_size: overrides
                .page_size
                .or(store.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            output_path: overrides
                .output_path
                .or(report.output_path)
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string()),
            write_report: overrides.write_report || report.write_json.unwrap_or(false),
        };

        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for VerifySettings {
    fn validate(&self) -> Result<()> {
        validate_path("sheet", &self.sheet_path)?;

        if self.filename_columns.is_empty() {
            return Err(missing("filename_columns"));
        }
        for column in &self.filename_columns {
            validate_non_empty_string("filename_columns", column)?;
        }

        validate_positive_number("page_size", self.page_size, 1)?;
        validate_path("output_path", &self.output_path)?;

        match &self.store {
            StoreSettings::Http { endpoint, .. } => validate_url("store_url", endpoint)?,
            StoreSettings::Local { root } => validate_path("store_dir", root)?,
        }

        Ok(())
    }
}

impl ConfigProvider for VerifySettings {
    fn sheet_path(&self) -> &str {
        &self.sheet_path
    }

    fn filename_columns(&self) -> &[String] {
        &self.filename_columns
    }

    fn sheet_delimiter(&self) -> Option<u8> {
        self.delimiter
    }

    fn blob_prefix(&self) -> &str {
        &self.blob_prefix
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn write_report(&self) -> bool {
        self.write_report
    }
}
