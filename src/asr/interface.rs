use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranscriptionError;
use crate::ingress::AudioPayload;

/// Response body of the speech-to-text service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// Speech-to-text collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Recognize the speech contained in `audio`
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError>;
}
