use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;

/// Request body sent to the text-to-speech service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TTSRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// Text-to-speech collaborator
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Render `text` to audio bytes
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError>;
}
