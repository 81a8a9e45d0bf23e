use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Store request failed with status {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Input,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlannerError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::ApiError(_) => ErrorCategory::Network,
            PlannerError::StoreError { .. } => ErrorCategory::Storage,
            PlannerError::IoError(_) | PlannerError::CsvError(_) => ErrorCategory::Storage,
            PlannerError::SerializationError(_) => ErrorCategory::Data,
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::MissingConfigError { .. }
            | PlannerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PlannerError::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或服務端暫時性錯誤，可重試
            PlannerError::ApiError(_) => ErrorSeverity::Medium,
            PlannerError::StoreError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            PlannerError::StoreError { .. } => ErrorSeverity::High,
            PlannerError::ValidationError { .. } => ErrorSeverity::High,
            PlannerError::SerializationError(_) | PlannerError::CsvError(_) => ErrorSeverity::High,
            PlannerError::IoError(_) => ErrorSeverity::Critical,
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::MissingConfigError { .. }
            | PlannerError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlannerError::ApiError(e) if e.is_timeout() => {
                "The remote service did not answer in time".to_string()
            }
            PlannerError::ApiError(_) => "Could not reach the remote service".to_string(),
            PlannerError::StoreError { status, .. } => {
                format!("The plan store rejected the request (HTTP {})", status)
            }
            PlannerError::ValidationError { message } => message.clone(),
            PlannerError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            PlannerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            PlannerError::ConfigError { message }
            | PlannerError::ConfigValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and the service endpoint, then try again",
            ErrorCategory::Storage => match self {
                PlannerError::StoreError { status: 401 | 403, .. } => {
                    "Check the store API key and the table access policies"
                }
                PlannerError::StoreError { .. } => {
                    "Check that the plan and log tables exist with the expected columns"
                }
                _ => "Check that the target path exists and is writable",
            },
            ErrorCategory::Configuration => {
                "Check the configuration file or the PLANNER_* environment variables"
            }
            ErrorCategory::Input => "Correct the input values and run the command again",
            ErrorCategory::Data => "The remote service returned unexpected data; check its API version",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
