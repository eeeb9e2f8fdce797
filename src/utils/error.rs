use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Deal catalog not found: {path}")]
    CatalogNotFound { path: String },

    #[error("Deal catalog is malformed: {message}")]
    CatalogFormat { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Maps provider returned {status}: {message}")]
    ProviderError { status: String, message: String },

    #[error("Could not find location '{location}'")]
    LocationNotFound { location: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Network,
    Provider,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FinderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FinderError::ApiError(_) => ErrorCategory::Network,
            FinderError::ProviderError { .. } | FinderError::LocationNotFound { .. } => {
                ErrorCategory::Provider
            }
            FinderError::CsvError(_)
            | FinderError::SerializationError(_)
            | FinderError::CatalogFormat { .. } => ErrorCategory::Data,
            FinderError::IoError(_) | FinderError::CatalogNotFound { .. } => ErrorCategory::Io,
            FinderError::UrlError(_)
            | FinderError::MissingConfigError { .. }
            | FinderError::InvalidConfigValueError { .. }
            | FinderError::ConfigValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Provider => match self {
                FinderError::LocationNotFound { .. } => ErrorSeverity::Low,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::Data | ErrorCategory::Config => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FinderError::ApiError(_) => {
                "Check your network connection and try again".to_string()
            }
            FinderError::ProviderError { status, .. } if status == "REQUEST_DENIED" => {
                "Check that the API key is valid and the Geocoding and Places APIs are enabled"
                    .to_string()
            }
            FinderError::ProviderError { status, .. } if status == "OVER_QUERY_LIMIT" => {
                "Wait a moment or lower --max-workers before retrying".to_string()
            }
            FinderError::ProviderError { .. } => {
                "Retry later; the maps provider rejected the request".to_string()
            }
            FinderError::LocationNotFound { .. } => {
                "Try a more specific address or pass coordinates as 'lat,lng'".to_string()
            }
            FinderError::CatalogNotFound { path } => {
                format!("Create {} with 'store' and 'deal' columns or pass --catalog", path)
            }
            FinderError::CatalogFormat { .. } | FinderError::CsvError(_) => {
                "Make sure the catalog is a CSV file with 'store' and 'deal' headers".to_string()
            }
            FinderError::MissingConfigError { field } if field == "api_key" => {
                "Set GOOGLE_MAPS_API_KEY or pass --api-key your_key_here".to_string()
            }
            FinderError::MissingConfigError { field } => {
                format!("Provide a value for {}", field)
            }
            FinderError::InvalidConfigValueError { field, .. }
            | FinderError::ConfigValidationError { field, .. } => {
                format!("Fix the value of {} and run again", field)
            }
            FinderError::UrlError(_) => "Use an absolute http(s) base URL".to_string(),
            FinderError::IoError(_) => "Check file paths and permissions".to_string(),
            FinderError::SerializationError(_) => {
                "The provider response could not be decoded; retry later".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::MissingConfigError { field } if field == "api_key" => {
                "Error: Google Maps API key is required!".to_string()
            }
            FinderError::CatalogNotFound { path } => {
                format!("Error: {} file not found!", path)
            }
            FinderError::LocationNotFound { location } => {
                format!("Error: Could not find location '{}'", location)
            }
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
