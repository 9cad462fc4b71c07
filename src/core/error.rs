//! Error types for routewise
//!
//! Every failure is reported to the user as a single line and ends only the
//! current interaction. Nothing here is retried.

use std::fmt;

/// Main error type for routewise operations
#[derive(Debug)]
pub enum Error {
    /// A directions result could not be interpreted (missing legs, bad waypoint order)
    MalformedResponse(String),

    /// An external API call failed (network, auth, quota, non-OK status)
    ProviderError(String),

    /// Required form fields or the stop list are missing or invalid
    ValidationError(String),

    /// API keys or the secrets file could not be loaded
    ConfigError(String),

    /// File I/O error
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedResponse(msg) => {
                write!(f, "Malformed directions response: {msg}")
            }
            Error::ProviderError(msg) => {
                write!(f, "Provider error: {msg}")
            }
            Error::ValidationError(msg) => {
                write!(f, "{msg}")
            }
            Error::ConfigError(msg) => {
                write!(f, "Configuration error: {msg}")
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::ProviderError(err.to_string())
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::ValidationError(format!("Could not read stops file: {err}"))
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::ValidationError(format!("Could not read stops file: {err}"))
    }
}

/// Convenience result type for routewise operations
pub type Result<T> = std::result::Result<T, Error>;
