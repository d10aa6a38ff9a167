use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Database,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that ended with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::DatabaseError(_) => ErrorCategory::Database,
            EtlError::ImageError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::SelectorError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Database | ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and that the page URL is reachable".to_string()
            }
            EtlError::HttpStatusError { status, .. } if *status == 403 || *status == 429 => {
                "The site refused the request; try another --user-agent or run again later"
                    .to_string()
            }
            EtlError::HttpStatusError { .. } => {
                "Verify the page URL; only HTTP 200 responses are accepted".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            EtlError::DatabaseError(_) => {
                "Check DATABASE_URL and that the target table exists with a UNIQUE name column"
                    .to_string()
            }
            EtlError::ImageError(_) => "The image could not be decoded or encoded".to_string(),
            EtlError::SerializationError(_) => "Report this as a bug".to_string(),
            EtlError::SelectorError { .. } => {
                "Fix the CSS selector syntax in the configuration".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Set '{}' on the command line, in the config file or environment", field)
            }
            EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Review the configuration values and try again".to_string()
            }
            EtlError::ProcessingError { .. } => {
                "Inspect the page markup; the selectors may be out of date".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => {
                format!("Failed to retrieve the billionaires page: {}", self)
            }
            EtlError::DatabaseError(e) => format!("Database Error: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_network_medium() {
        let err = EtlError::HttpStatusError {
            url: "https://example.com".to_string(),
            status: 503,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.severity().exit_code(), 2);
        assert!(err.user_friendly_message().contains("503"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = EtlError::MissingConfigError {
            field: "database_url".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("database_url"));
    }

    #[test]
    fn test_forbidden_status_suggests_user_agent() {
        let err = EtlError::HttpStatusError {
            url: "https://example.com".to_string(),
            status: 403,
        };
        assert!(err.recovery_suggestion().contains("user-agent"));
    }
}
