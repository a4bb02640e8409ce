use axum::http::StatusCode;
use thiserror::Error;

use crate::pipeline::StageName;

/// Failure reported by one of the external collaborators
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Connection refused, reset, or the body could not be read
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success HTTP status
    #[error("service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service answered but the payload could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The service refused the input (malformed audio, content policy)
    #[error("rejected: {0}")]
    Rejected(String),
}

pub type TranscriptionError = ServiceError;
pub type ResponseError = ServiceError;
pub type SynthesisError = ServiceError;

impl ServiceError {
    /// Permanent failures are never retried
    pub fn is_permanent(&self) -> bool {
        match self {
            ServiceError::Network(_) => false,
            ServiceError::Status { status, .. } => {
                !matches!(status, 408 | 429 | 500..=599)
            }
            ServiceError::InvalidResponse(_) => true,
            ServiceError::Rejected(_) => true,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ServiceError::InvalidResponse(err.to_string());
        }
        match err.status() {
            Some(status) => ServiceError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ServiceError::Network(err.to_string()),
        }
    }
}

/// Stable reason codes exposed to clients
pub mod reason {
    pub const EMPTY: &str = "empty";
    pub const TOO_LARGE: &str = "too_large";
    pub const UNREADABLE: &str = "unreadable";
    pub const TIMEOUT: &str = "timeout";
    pub const UNAVAILABLE: &str = "unavailable";
    pub const REJECTED: &str = "rejected";
    pub const NO_SPEECH: &str = "no_speech";
    pub const EMPTY_REPLY: &str = "empty_reply";
    pub const INTERNAL: &str = "internal";
}

/// Error taxonomy of the HTTP surface.
///
/// Only the request handler turns one of these into a status code. The
/// `Display` text stays in logs; clients only ever see `reason()`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid audio input: {reason}")]
    Validation { reason: &'static str },

    #[error("{stage} stage failed transiently: {reason}")]
    Transient {
        stage: StageName,
        reason: &'static str,
    },

    #[error("{stage} stage failed permanently: {reason}")]
    Permanent {
        stage: StageName,
        reason: &'static str,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Transient { reason, .. } if *reason == reason::TIMEOUT => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ApiError::Transient { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Permanent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::Validation { reason }
            | ApiError::Transient { reason, .. }
            | ApiError::Permanent { reason, .. } => *reason,
            ApiError::Internal(_) => reason::INTERNAL,
        }
    }

    pub fn stage(&self) -> Option<StageName> {
        match self {
            ApiError::Transient { stage, .. } | ApiError::Permanent { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Human readable message for clients, derived from the reason code only
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation { reason } => match *reason {
                reason::EMPTY => "No audio data received".to_string(),
                reason::TOO_LARGE => "Audio payload exceeds the maximum size".to_string(),
                _ => "Audio payload could not be read".to_string(),
            },
            ApiError::Transient { stage, reason } => match *reason {
                reason::TIMEOUT => format!("The {} stage timed out", stage),
                _ => format!("The {} service is unavailable", stage),
            },
            ApiError::Permanent { stage, reason } => match *reason {
                reason::NO_SPEECH => "No speech was recognized in the audio".to_string(),
                reason::EMPTY_REPLY => "The assistant produced no reply".to_string(),
                _ => format!("The {} service rejected the request", stage),
            },
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
