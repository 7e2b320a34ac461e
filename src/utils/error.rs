use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Jira returned {status} for {url}: {reason}")]
    JiraStatusError {
        status: u16,
        url: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Configuration,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::HttpError(_) => ErrorCategory::Network,
            ReportError::JiraStatusError { .. } => ErrorCategory::Remote,
            ReportError::YamlError(_)
            | ReportError::TomlError(_)
            | ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReportError::SerializationError(_) | ReportError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 5xx and transport problems are usually transient
            ReportError::HttpError(_) => ErrorSeverity::Medium,
            ReportError::JiraStatusError { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            ReportError::JiraStatusError { .. } => ErrorSeverity::High,
            ReportError::SerializationError(_) | ReportError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            ReportError::YamlError(_)
            | ReportError::TomlError(_)
            | ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorSeverity::High,
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ReportError::HttpError(_) => {
                "Check network connectivity and that server.url points at a reachable Jira instance".to_string()
            }
            ReportError::JiraStatusError { status: 401, .. } => {
                "Check server.username and server.password (use an API token for Jira Cloud)".to_string()
            }
            ReportError::JiraStatusError { status: 403, .. } => {
                "The configured user lacks permission to browse this board or sprint".to_string()
            }
            ReportError::JiraStatusError { status: 404, .. } => {
                "Verify the sprint id or issue key exists on this Jira server".to_string()
            }
            ReportError::JiraStatusError { .. } => {
                "Retry later; Jira may be overloaded or rate limiting requests".to_string()
            }
            ReportError::YamlError(_) | ReportError::TomlError(_) => {
                "Fix the syntax of the configuration file".to_string()
            }
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line overrides".to_string()
            }
            ReportError::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or pass it on the command line", field)
            }
            ReportError::SerializationError(_) | ReportError::ProcessingError { .. } => {
                "Jira returned data in an unexpected shape; rerun with --verbose to inspect it".to_string()
            }
            ReportError::ZipError(_) | ReportError::CsvError(_) | ReportError::IoError(_) => {
                "Check that the output folder exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach Jira: {}", self),
            ErrorCategory::Remote => format!("Jira rejected the request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Unexpected data from Jira: {}", self),
            ErrorCategory::Output => format!("Failed to write reports: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jira_status_severity() {
        let unauthorized = ReportError::JiraStatusError {
            status: 401,
            url: "https://jira.example.com/rest/agile/1.0/sprint/1".to_string(),
            reason: "Unauthorized".to_string(),
        };
        assert_eq!(unauthorized.category(), ErrorCategory::Remote);
        assert_eq!(unauthorized.severity(), ErrorSeverity::High);
        assert_eq!(unauthorized.exit_code(), 1);
        assert!(unauthorized.recovery_suggestion().contains("server.username"));

        let unavailable = ReportError::JiraStatusError {
            status: 503,
            url: "https://jira.example.com".to_string(),
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(unavailable.severity(), ErrorSeverity::Medium);
        assert_eq!(unavailable.exit_code(), 2);
    }

    #[test]
    fn test_output_errors_are_critical() {
        let err = ReportError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Failed to write reports"));
    }

    #[test]
    fn test_missing_config_suggestion_names_field() {
        let err = ReportError::MissingConfigError {
            field: "sprint_id".to_string(),
        };
        assert!(err.recovery_suggestion().contains("sprint_id"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
