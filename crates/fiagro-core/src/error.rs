//! Error taxonomy for upstream fetches and client input.
//!
//! Partial extraction failures are deliberately absent: a field that cannot
//! be scraped becomes [`crate::PLACEHOLDER`], never an error.

/// Machine-readable error codes.
pub mod error_codes {
    pub const INVALID_INPUT: &str = "E_INVALID_INPUT";
    pub const UPSTREAM_UNAVAILABLE: &str = "E_UPSTREAM_UNAVAILABLE";
    pub const UPSTREAM_MALFORMED: &str = "E_UPSTREAM_MALFORMED";
    pub const NOT_FOUND: &str = "E_NOT_FOUND";
}

/// All errors surfaced by the core library.
#[derive(thiserror::Error, Debug)]
pub enum FiagroError {
    /// Missing or unusable caller input. Never comes from an upstream.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network failure, timeout, or non-success status.
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The upstream answered, but not with what we expect.
    #[error("Upstream malformed: {0}")]
    UpstreamMalformed(String),

    /// The fund's detail page does not exist upstream.
    #[error("Fund not found: {0}")]
    FundNotFound(String),
}

impl FiagroError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        FiagroError::UpstreamUnavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn code(&self) -> &'static str {
        use error_codes::*;
        match self {
            FiagroError::InvalidInput(_) => INVALID_INPUT,
            FiagroError::UpstreamUnavailable { .. } => UPSTREAM_UNAVAILABLE,
            FiagroError::UpstreamMalformed(_) => UPSTREAM_MALFORMED,
            FiagroError::FundNotFound(_) => NOT_FOUND,
        }
    }

    /// Whether the failure was caused by the caller rather than an upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FiagroError::InvalidInput(_) | FiagroError::FundNotFound(_)
        )
    }
}

impl From<reqwest::Error> for FiagroError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            format!("request timed out: {e}")
        } else {
            e.to_string()
        };
        FiagroError::UpstreamUnavailable {
            message,
            source: Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FiagroError>;
