use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Remote error: {message}")]
    RemoteError { message: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid credential/setting. The caller has to fix it.
    Configuration,
    /// Upstream or relay failure, or a response of unexpected shape.
    Remote,
    /// Source data deviates from the expected convention.
    Parse,
    /// Writing results locally failed.
    Output,
}

impl ImportError {
    pub fn remote(message: impl Into<String>) -> Self {
        ImportError::RemoteError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ImportError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::ConfigError { .. }
            | ImportError::MissingConfigError { .. }
            | ImportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ImportError::ApiError(_)
            | ImportError::SerializationError(_)
            | ImportError::RemoteError { .. } => ErrorCategory::Remote,
            ImportError::ParseError { .. } => ErrorCategory::Parse,
            ImportError::IoError(_) | ImportError::CsvError(_) => ErrorCategory::Output,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Remote
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
