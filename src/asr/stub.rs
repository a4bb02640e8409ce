use async_trait::async_trait;
use tracing::debug;

use super::interface::Transcriber;
use crate::error::TranscriptionError;
use crate::ingress::AudioPayload;

/// Transcriber that always recognizes the same phrase
pub struct StubTranscriber {
    phrase: String,
}

impl StubTranscriber {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }
}

impl Default for StubTranscriber {
    fn default() -> Self {
        Self::new("hello")
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError> {
        debug!("Stub transcriber ignoring {} bytes", audio.len());
        Ok(self.phrase.clone())
    }
}
