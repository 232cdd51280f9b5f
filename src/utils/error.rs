use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("XML encoding failed: {0}")]
    XmlEncoding(#[from] quick_xml::se::SeError),

    #[error("JSON encoding failed: {0}")]
    JsonEncoding(#[from] serde_json::Error),

    #[error("Field '{field}' contains U+{codepoint:04X}, which XML 1.0 cannot represent")]
    InvalidXmlCharacter { field: String, codepoint: u32 },

    #[error("Cannot connect to messaging service for project '{project_id}': {message}")]
    ConnectionError { project_id: String, message: String },

    #[error("Publish to topic '{topic}' failed: {message}")]
    PublishError { topic: String, message: String },

    #[error("Publish to topic '{topic}' was not acknowledged within {timeout:?}")]
    PublishTimeout { topic: String, timeout: Duration },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Encoding,
    Connection,
    Publish,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The run can be repeated as-is once the broker recovers.
    Medium,
    High,
    Critical,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::XmlEncoding(_)
            | RelayError::JsonEncoding(_)
            | RelayError::InvalidXmlCharacter { .. } => ErrorCategory::Encoding,
            RelayError::ConnectionError { .. } => ErrorCategory::Connection,
            RelayError::PublishError { .. } | RelayError::PublishTimeout { .. } => {
                ErrorCategory::Publish
            }
            RelayError::IoError(_) => ErrorCategory::Io,
            RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Publish => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Encoding | ErrorCategory::Io => {
                ErrorSeverity::High
            }
            ErrorCategory::Connection => ErrorSeverity::Critical,
        }
    }

    /// Name of the pipeline stage the error belongs to.
    pub fn stage(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Encoding => "encoding",
            ErrorCategory::Connection => "connection",
            ErrorCategory::Publish => "publish",
            ErrorCategory::Io => "output",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("{} stage failed: {}", self.stage(), self)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::XmlEncoding(_)
            | RelayError::JsonEncoding(_)
            | RelayError::InvalidXmlCharacter { .. } => {
                "Check the record fields for characters that cannot be represented"
            }
            RelayError::ConnectionError { .. } => {
                "Check network access and credentials (PUBSUB_ACCESS_TOKEN or PUBSUB_EMULATOR_HOST)"
            }
            RelayError::PublishError { .. } => {
                "Verify that the topic exists and the caller may publish to it"
            }
            RelayError::PublishTimeout { .. } => {
                "Increase --timeout-seconds or check broker availability"
            }
            RelayError::IoError(_) => "Check that standard output is writable",
            RelayError::ConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
