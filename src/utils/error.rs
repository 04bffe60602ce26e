use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GaraError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Form field '{field}' is missing")]
    MissingFieldError { field: String },

    #[error("Form field '{field}' has value '{value}', expected {expected}")]
    CoercionError {
        field: String,
        value: String,
        expected: String,
    },

    #[error("API returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Api,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GaraError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GaraError::Http(_) => ErrorCategory::Network,
            GaraError::ConfigError { .. }
            | GaraError::InvalidConfigValueError { .. }
            | GaraError::MissingConfigError { .. }
            | GaraError::ConfigValidationError { .. }
            | GaraError::UrlParse(_) => ErrorCategory::Configuration,
            GaraError::MissingFieldError { .. } | GaraError::CoercionError { .. } => {
                ErrorCategory::Input
            }
            GaraError::Api { .. } => ErrorCategory::Api,
            GaraError::Io(_) | GaraError::Serialization(_) | GaraError::ProcessingError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GaraError::Api { status, .. } if status.is_client_error() => ErrorSeverity::Low,
            GaraError::Http(_) | GaraError::Api { .. } => ErrorSeverity::Medium,
            GaraError::MissingFieldError { .. } | GaraError::CoercionError { .. } => {
                ErrorSeverity::High
            }
            GaraError::ConfigError { .. }
            | GaraError::InvalidConfigValueError { .. }
            | GaraError::MissingConfigError { .. }
            | GaraError::ConfigValidationError { .. }
            | GaraError::UrlParse(_) => ErrorSeverity::High,
            GaraError::Io(_) | GaraError::Serialization(_) | GaraError::ProcessingError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GaraError::Http(e) if e.is_timeout() => "The server did not answer in time".to_string(),
            GaraError::Http(e) if e.is_connect() => "Could not connect to the server".to_string(),
            GaraError::Api { message, .. } => message.clone(),
            GaraError::MissingFieldError { field } => format!("Please fill in '{field}'"),
            GaraError::CoercionError { field, .. } => format!("'{field}' must be a number"),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the base URL and that the server is reachable",
            ErrorCategory::Configuration => "Review the config file and command line flags",
            ErrorCategory::Input => "Correct the form fields and submit again",
            ErrorCategory::Api => "Check the message above; you may need to log in again",
            ErrorCategory::Internal => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, GaraError>;
