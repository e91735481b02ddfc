use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

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
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ApiError(_) | DashboardError::UnexpectedStatus { .. } => {
                ErrorCategory::Network
            }
            DashboardError::CsvError(_)
            | DashboardError::SerializationError(_)
            | DashboardError::InvalidDate { .. }
            | DashboardError::ProcessingError { .. } => ErrorCategory::Data,
            DashboardError::ConfigError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashboardError::ZipError(_) | DashboardError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::ApiError(_) => {
                "Check that the API base URL is reachable and try again"
            }
            DashboardError::UnexpectedStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check the Authorization header in the configuration"
            }
            DashboardError::UnexpectedStatus { .. } => {
                "Verify the endpoint paths in the configuration"
            }
            DashboardError::InvalidDate { .. } => {
                "Dates must be ISO-8601, e.g. 2024-05-01 or 2024-05-01T10:00:00Z"
            }
            DashboardError::CsvError(_) | DashboardError::SerializationError(_) => {
                "Verify the API returns the expected JSON shape"
            }
            DashboardError::ConfigError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. } => {
                "Fix the configuration value and run again"
            }
            DashboardError::ProcessingError { .. } => "Inspect the logs with --verbose",
            DashboardError::ZipError(_) | DashboardError::IoError(_) => {
                "Check that the output path exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch data from the API: {}", self),
            ErrorCategory::Data => format!("Received data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_network_category() {
        let err = DashboardError::UnexpectedStatus {
            endpoint: "http://localhost/api/admin/donors".to_string(),
            status: 500,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("500"));
    }

    #[test]
    fn test_auth_status_suggests_header_fix() {
        let err = DashboardError::UnexpectedStatus {
            endpoint: "x".to_string(),
            status: 401,
        };
        assert!(err.recovery_suggestion().contains("Authorization"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = DashboardError::MissingConfigError {
            field: "api_base".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
