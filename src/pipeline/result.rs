use std::fmt;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{reason, ApiError};

/// Stages of the speech pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Ingress,
    Transcribe,
    Respond,
    Synthesize,
}

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Ingress => "ingress",
            StageName::Transcribe => "transcribe",
            StageName::Respond => "respond",
            StageName::Synthesize => "synthesize",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult {
    Success {
        reply_audio: Bytes,
        transcript: String,
        reply_text: String,
    },
    PartialFailure {
        stage: StageName,
        reason: &'static str,
    },
    Rejected {
        reason: &'static str,
    },
}

impl PipelineResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success { .. })
    }

    /// Classify a failed outcome into the HTTP error taxonomy.
    /// Returns `None` for `Success`.
    pub fn to_api_error(&self) -> Option<ApiError> {
        match self {
            PipelineResult::Success { .. } => None,
            PipelineResult::Rejected { reason } => Some(ApiError::Validation { reason: *reason }),
            PipelineResult::PartialFailure { stage, reason } => {
                let (stage, reason) = (*stage, *reason);
                if reason == reason::TIMEOUT || reason == reason::UNAVAILABLE {
                    Some(ApiError::Transient { stage, reason })
                } else {
                    Some(ApiError::Permanent { stage, reason })
                }
            }
        }
    }
}
