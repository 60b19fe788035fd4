use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("No filename column found in {path} (looked for: {})", .aliases.join(", "))]
    ColumnNotFound { path: String, aliases: Vec<String> },

    #[error("Blob store error: {message}")]
    StoreError { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Storage,
    Authorization,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReconcileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::ColumnNotFound { .. } => ErrorCategory::Input,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::StoreError { .. } => ErrorCategory::Storage,
            Self::Unauthorized { .. } => ErrorCategory::Authorization,
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或遠端儲存的暫時性錯誤，可重試
            Self::HttpError(_) | Self::StoreError { .. } => ErrorSeverity::Medium,
            Self::SerializationError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not read or write a file: {}", e),
            Self::CsvError(e) => format!("The spreadsheet could not be parsed: {}", e),
            Self::HttpError(e) => format!("Could not reach the blob store: {}", e),
            Self::SerializationError(e) => format!("Unexpected data format: {}", e),
            Self::MissingConfigError { field } => {
                format!("Required setting '{}' was not provided", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::ColumnNotFound { path, aliases } => format!(
                "No filename column in '{}'. Expected one of: {}",
                path,
                aliases.join(", ")
            ),
            Self::StoreError { message } => format!("Blob store request failed: {}", message),
            Self::Unauthorized { message } => format!("Access denied: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command-line flags, environment variables and TOML config file"
            }
            ErrorCategory::Input => {
                "Make sure the spreadsheet is a CSV/TSV export with a filename column, or pass --column"
            }
            ErrorCategory::Network => "Check network connectivity and the blob store URL, then retry",
            ErrorCategory::Storage => "Verify the path or prefix exists and is accessible, then retry",
            ErrorCategory::Authorization => "Check the access key or blob store token",
            ErrorCategory::Internal => "Please report this issue with the --verbose log output",
        }
    }

    /// CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_lists_aliases() {
        let err = ReconcileError::ColumnNotFound {
            path: "export.csv".to_string(),
            aliases: vec!["filename".to_string(), "pdf filename".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "No filename column found in export.csv (looked for: filename, pdf filename)"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_store_errors_are_retryable() {
        let err = ReconcileError::StoreError {
            message: "503 Service Unavailable".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }
}
