//! Error types and handling for `AeroCast`

use thiserror::Error;

/// Main error type for the `AeroCast` library
#[derive(Error, Debug)]
pub enum AeroCastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport failures (connect, timeout, TLS)
    #[error("Network error from {provider}: {message}")]
    Network { provider: String, message: String },

    /// Upstream answered with a non-2xx status
    #[error("{provider} responded with HTTP {status}")]
    Status { provider: String, status: u16 },

    /// Upstream payload did not have the expected shape
    #[error("Malformed payload from {provider}: {message}")]
    MalformedPayload { provider: String, message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The required base forecast could not be produced
    #[error("Failed to fetch base weather data: {source}")]
    BaseUnavailable {
        #[source]
        source: Box<AeroCastError>,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AeroCastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn network<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Network {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn status<P: Into<String>>(provider: P, status: u16) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
        }
    }

    pub fn malformed<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::MalformedPayload {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wrap the cause of a failed base-provider fetch
    #[must_use]
    pub fn base_unavailable(cause: AeroCastError) -> Self {
        Self::BaseUnavailable {
            source: Box::new(cause),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AeroCastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            AeroCastError::Network { .. } | AeroCastError::Status { .. } => {
                "Unable to connect to weather services. Please check your internet connection."
                    .to_string()
            }
            AeroCastError::MalformedPayload { provider, .. } => {
                format!("{provider} returned data we could not read.")
            }
            AeroCastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AeroCastError::BaseUnavailable { .. } => {
                "Weather data is currently unavailable. Please try again.".to_string()
            }
            AeroCastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
