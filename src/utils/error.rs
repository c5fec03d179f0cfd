use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("PDF extraction failed: {message}")]
    PdfError { message: String },

    #[error("Converter request failed: {0}")]
    ConverterError(#[from] reqwest::Error),

    #[error("HTML parsing error: {message}")]
    HtmlParseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Document processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Parsing,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::ConverterError(_) => ErrorCategory::Network,
            IngestError::PdfError { .. } | IngestError::HtmlParseError { .. } => {
                ErrorCategory::Parsing
            }
            IngestError::IoError(_) => ErrorCategory::Io,
            IngestError::ConfigError { .. }
            | IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => ErrorCategory::Configuration,
            IngestError::SerializationError(_)
            | IngestError::ProcessingError { .. }
            | IngestError::ValidationError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 配置錯誤必須在啟動階段就擋下來
            IngestError::ConfigError { .. }
            | IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => ErrorSeverity::Critical,
            IngestError::ConverterError(_) => ErrorSeverity::Medium,
            IngestError::IoError(_)
            | IngestError::PdfError { .. }
            | IngestError::HtmlParseError { .. }
            | IngestError::SerializationError(_)
            | IngestError::ProcessingError { .. } => ErrorSeverity::High,
            IngestError::ValidationError { .. } => ErrorSeverity::Low,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            IngestError::PdfError { .. } => {
                "Check that the uploaded file is a valid, non-encrypted PDF".to_string()
            }
            IngestError::ConverterError(_) => {
                "Check that the converter endpoint is reachable and the network is up".to_string()
            }
            IngestError::HtmlParseError { .. } => {
                "Check that the converter produced well-formed HTML".to_string()
            }
            IngestError::IoError(_) => {
                "Check file permissions and free disk space for the output directories".to_string()
            }
            IngestError::SerializationError(_) => {
                "Inspect the pipeline output for non-serializable values".to_string()
            }
            IngestError::ConfigError { .. }
            | IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => {
                "Fix the configuration file or CLI arguments and restart".to_string()
            }
            IngestError::ProcessingError { .. } => {
                "Re-run with --verbose to see which pipeline stage failed".to_string()
            }
            IngestError::ValidationError { .. } => {
                "Check the request payload against the API documentation".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Parsing => format!("Document could not be parsed: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = IngestError::MissingConfigError {
            field: "converter.endpoint".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_pdf_error_is_parsing() {
        let err = IngestError::PdfError {
            message: "empty page tree".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Parsing);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_validation_error_is_low_severity() {
        let err = IngestError::ValidationError {
            message: "only PDF files are accepted".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
