use crate::utils::error::{ReconcileError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    pub path: Option<String>,
    pub delimiter: Option<String>,
    pub filename_columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "http" 或 "local"
    pub kind: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub prefix: Option<String>,
    pub root: Option<String>,
    pub page_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: Option<String>,
    pub write_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReconcileError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReconcileError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BLOB_READ_WRITE_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReconcileError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 單一 ASCII 字元的分隔符號
    pub fn delimiter(&self) -> Result<Option<u8>> {
        match self.spreadsheet.delimiter.as_deref() {
            None => Ok(None),
            Some("\\t") | Some("tab") => Ok(Some(b'\t')),
            Some(raw) if raw.len() == 1 && raw.is_ascii() => Ok(Some(raw.as_bytes()[0])),
            Some(raw) => Err(ReconcileError::InvalidConfigValueError {
                field: "spreadsheet.delimiter".to_string(),
                value: raw.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[spreadsheet]
path = "exports/scopus.csv"
delimiter = ";"
filename_columns = ["PDF Filename"]

[store]
kind = "http"
endpoint = "https://blob.example.com/api"
token = "secret"
prefix = "pdfs/"
page_size = 250

[report]
output_path = "./reports"
write_json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.spreadsheet.path.as_deref(), Some("exports/scopus.csv"));
        assert_eq!(config.delimiter().unwrap(), Some(b';'));
        assert_eq!(
            config.spreadsheet.filename_columns,
            Some(vec!["PDF Filename".to_string()])
        );
        assert_eq!(config.store.kind.as_deref(), Some("http"));
        assert_eq!(config.store.page_size, Some(250));
        assert_eq!(config.report.write_json, Some(true));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[store]\nprefix = \"pdfs/\"\n").unwrap();

        assert!(config.spreadsheet.path.is_none());
        assert_eq!(config.store.prefix.as_deref(), Some("pdfs/"));
        assert_eq!(config.delimiter().unwrap(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCREEN_RECONCILE_TEST_TOKEN", "tok_123");

        let toml_content = r#"
[store]
token = "${SCREEN_RECONCILE_TEST_TOKEN}"
endpoint = "${SCREEN_RECONCILE_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.store.token.as_deref(), Some("tok_123"));
        assert_eq!(
            config.store.endpoint.as_deref(),
            Some("${SCREEN_RECONCILE_UNSET_VAR}")
        );

        std::env::remove_var("SCREEN_RECONCILE_TEST_TOKEN");
    }

    #[test]
    fn test_invalid_delimiter() {
        let config = TomlConfig::from_toml_str("[spreadsheet]\ndelimiter = \"::\"\n").unwrap();
        assert!(config.delimiter().is_err());

        let tab = TomlConfig::from_toml_str("[spreadsheet]\ndelimiter = \"tab\"\n").unwrap();
        assert_eq!(tab.delimiter().unwrap(), Some(b'\t'));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[store\nkind = ").unwrap_err();
        assert!(matches!(err, ReconcileError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[spreadsheet]\npath = \"wos.tsv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.spreadsheet.path.as_deref(), Some("wos.tsv"));
    }
}
