use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Wire decode error: {0}")]
    DecodeError(#[from] prost::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Driver error: {message}")]
    DriverError { message: String },

    #[error("Worker error: {message}")]
    WorkerError { message: String },

    #[error("Failed to spawn subprocess: {message}")]
    SpawnError { message: String },

    #[error("Fetch round failed: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Config,
    Driver,
    Worker,
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WatchError::HttpError(_) => ErrorCategory::Network,
            WatchError::IoError(_) => ErrorCategory::Io,
            WatchError::TomlError(_)
            | WatchError::ConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::MissingConfigError { .. } => ErrorCategory::Config,
            WatchError::DriverError { .. } => ErrorCategory::Driver,
            WatchError::DecodeError(_) | WatchError::WorkerError { .. } => ErrorCategory::Worker,
            WatchError::SpawnError { .. } | WatchError::ProcessingError { .. } => {
                ErrorCategory::Process
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Transient: the next refresh round may succeed
            WatchError::HttpError(_)
            | WatchError::WorkerError { .. }
            | WatchError::DecodeError(_) => ErrorSeverity::Medium,
            WatchError::DriverError { .. } | WatchError::ProcessingError { .. } => {
                ErrorSeverity::High
            }
            WatchError::TomlError(_)
            | WatchError::ConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::MissingConfigError { .. } => ErrorSeverity::High,
            WatchError::IoError(_) | WatchError::SpawnError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and that the target site is reachable".to_string()
            }
            ErrorCategory::Io => {
                "Check that the data directory exists and is writable".to_string()
            }
            ErrorCategory::Config => {
                "Review the configuration file or command-line arguments".to_string()
            }
            ErrorCategory::Driver => {
                "Verify the selected driver's requirements (scrape command, worker address)"
                    .to_string()
            }
            ErrorCategory::Worker => {
                "Check that the fetch worker is running and listening on the configured address"
                    .to_string()
            }
            ErrorCategory::Process => {
                "Check the worker command path and permissions, then retry".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WatchError::HttpError(e) => format!("Could not fetch the page: {}", e),
            WatchError::IoError(e) => format!("File operation failed: {}", e),
            WatchError::TomlError(e) => format!("Could not parse the config file: {}", e),
            WatchError::DecodeError(e) => format!("Worker sent an unreadable response: {}", e),
            WatchError::ConfigError { message } => format!("Configuration problem: {}", message),
            WatchError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not valid for {}: {}", value, field, reason),
            WatchError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            WatchError::DriverError { message } => format!("Fetch driver failed: {}", message),
            WatchError::WorkerError { message } => format!("Fetch worker failed: {}", message),
            WatchError::SpawnError { message } => {
                format!("Could not start a subprocess: {}", message)
            }
            WatchError::ProcessingError { message } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        let e = WatchError::WorkerError {
            message: "connection refused".to_string(),
        };
        assert_eq!(e.severity(), ErrorSeverity::Medium);
        assert_eq!(e.category(), ErrorCategory::Worker);

        let e = WatchError::MissingConfigError {
            field: "scrape_cmd".to_string(),
        };
        assert_eq!(e.severity(), ErrorSeverity::High);
        assert_eq!(e.category(), ErrorCategory::Config);
    }
}
