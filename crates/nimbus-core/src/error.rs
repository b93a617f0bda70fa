//! Application-level error types for Nimbus.
//!
//! Request failures against the weather provider are modelled in
//! `nimbus-weather`; the types here cover start-up and wiring.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get an operator-facing summary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Localization error: {0}")]
    Locale(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a short message suitable for a start-up log line.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Locale(_) => "Translation catalogs could not be loaded.",
            AppError::HttpClient(_) => "The upstream HTTP client could not be created.",
            AppError::Io(_) => "A socket or file operation failed.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
