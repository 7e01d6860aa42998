use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Browser protocol error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("Browser error: {message}")]
    BrowserError { message: String },

    #[error("Invalid selector `{selector}`: {message}")]
    SelectorError { selector: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Browser,
    Filesystem,
    Parsing,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn browser(message: impl Into<String>) -> Self {
        Self::BrowserError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CdpError(_) | Self::BrowserError { .. } => ErrorCategory::Browser,
            Self::IoError(_) => ErrorCategory::Filesystem,
            Self::SerializationError(_)
            | Self::SelectorError { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Parsing,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 瀏覽器/網路問題通常重試即可
            ErrorCategory::Browser => ErrorSeverity::Medium,
            ErrorCategory::Parsing | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Filesystem => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::CdpError(e) => format!("The browser session failed: {}", e),
            Self::BrowserError { message } => format!("The browser session failed: {}", message),
            Self::IoError(e) => format!("Could not read or write a file: {}", e),
            Self::SerializationError(e) => format!("Could not encode the run report: {}", e),
            Self::SelectorError { selector, .. } => {
                format!("The selector `{}` is not valid CSS", selector)
            }
            Self::ProcessingError { message } => format!("Could not process the page: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value for '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Browser => {
                "Check that Chromium is installed (or pass --chromium-path) and that the search URL is reachable"
            }
            ErrorCategory::Filesystem => {
                "Check permissions on the markup file and output directory; titles with characters your filesystem rejects cannot be saved"
            }
            ErrorCategory::Parsing => {
                "Inspect the saved markup file; the site layout or the configured selectors may have changed"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
