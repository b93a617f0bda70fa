//! Upstream failure taxonomy and its mapping to HTTP-style responses.

use serde::Serialize;
use thiserror::Error;

use crate::locale::Translator;

pub const MSG_CONNECTIVITY: &str =
    "Could not connect to the weather service. Please try again later.";
pub const MSG_TRANSPORT: &str = "Failed to retrieve data from the API. Please try again later.";
pub const MSG_TIMEOUT: &str = "The request timed out. Please try again later.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again later.";
pub const MSG_UPSTREAM_STATUS: &str = "The weather service returned an error.";

/// Every way a single upstream call can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No connection could be established.
    #[error("Connection failed: {0}")]
    Connectivity(String),

    /// The provider answered with a non-success status.
    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Malformed request or response not covered by another category.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call did not complete within the client deadline.
    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected error: {0}")]
    Unclassified(String),
}

impl FetchError {
    /// Status code returned to the caller for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Connectivity(_) => 503,
            Self::UpstreamStatus { status } => *status,
            Self::Transport(_) => 500,
            Self::Timeout => 504,
            Self::Unclassified(_) => 500,
        }
    }

    /// Untranslated caller-facing message; doubles as the translation msgid.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Connectivity(_) => MSG_CONNECTIVITY,
            Self::UpstreamStatus { .. } => MSG_UPSTREAM_STATUS,
            Self::Transport(_) => MSG_TRANSPORT,
            Self::Timeout => MSG_TIMEOUT,
            Self::Unclassified(_) => MSG_UNEXPECTED,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connectivity(e.to_string())
        } else if let Some(status) = e.status() {
            Self::UpstreamStatus {
                status: status.as_u16(),
            }
        } else if e.is_request() || e.is_body() || e.is_decode() || e.is_redirect() {
            Self::Transport(e.to_string())
        } else {
            Self::Unclassified(e.to_string())
        }
    }
}

/// Terminal failure for one request: a status and a human-readable `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
}

impl FailureResponse {
    /// Map a fetch failure to its response, translating the message.
    pub fn from_error(error: &FetchError, translator: &Translator<'_>) -> Self {
        let error_text = match error {
            FetchError::UpstreamStatus { status } => {
                format!("{} ({})", translator.gettext(error.message()), status)
            }
            _ => translator.gettext(error.message()).to_string(),
        };

        Self {
            status: error.status_code(),
            error: error_text,
        }
    }
}
