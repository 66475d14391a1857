use crate::core::handler::CONNECTIVITY_FAILURE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Server rejected request ({status}): {message}")]
    ServerRejection { status: u16, message: String },

    #[error("Form field '{field}' is missing")]
    MissingField { field: String },

    #[error("Form field '{field}' is not a number: {raw:?}")]
    InvalidNumber { field: String, raw: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a failure of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl CalcError {
    pub fn transport(message: impl Into<String>) -> Self {
        CalcError::Transport {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CalcError::MissingField { .. } | CalcError::InvalidNumber { .. } => {
                ErrorSeverity::High
            }
            CalcError::ServerRejection { .. } => ErrorSeverity::Medium,
            CalcError::Transport { .. } | CalcError::HttpError(_) => ErrorSeverity::Critical,
            CalcError::ConfigError { .. } | CalcError::InvalidConfigValue { .. } => {
                ErrorSeverity::High
            }
            CalcError::IoError(_) | CalcError::SerializationError(_) => ErrorSeverity::High,
        }
    }

    /// Text shown to the person at the keyboard, without internal detail.
    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::Transport { .. } | CalcError::HttpError(_) => {
                CONNECTIVITY_FAILURE.to_string()
            }
            CalcError::ServerRejection { message, .. } => format!("Error: {}", message),
            CalcError::MissingField { field } => format!("Error: field '{}' is missing", field),
            CalcError::InvalidNumber { field, raw } => {
                format!("Error: '{}' is not a valid number for '{}'", raw, field)
            }
            CalcError::ConfigError { message } => format!("Configuration error: {}", message),
            CalcError::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration error in '{}': {}", field, reason)
            }
            CalcError::IoError(e) => format!("File error: {}", e),
            CalcError::SerializationError(e) => format!("Invalid JSON: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::Transport { .. } | CalcError::HttpError(_) => {
                "Check the network connection and the engine base_url"
            }
            CalcError::ServerRejection { status: 401, .. } => "Check the admin password",
            CalcError::ServerRejection { .. } => "Review the submitted values and try again",
            CalcError::MissingField { .. } | CalcError::InvalidNumber { .. } => {
                "Enter plain numbers such as 4200 or 87.5"
            }
            CalcError::ConfigError { .. } | CalcError::InvalidConfigValue { .. } => {
                "Fix the configuration file or command-line overrides"
            }
            CalcError::IoError(_) => "Check that the file exists and is readable",
            CalcError::SerializationError(_) => "Check the JSON document syntax",
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
