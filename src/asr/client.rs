use async_trait::async_trait;
use tracing::debug;

use super::interface::{Transcriber, TranscriptionResponse};
use crate::error::TranscriptionError;
use crate::ingress::AudioPayload;
use crate::service_client::ServiceClient;

/// Sends the raw audio body to an HTTP speech-to-text service
pub struct HttpTranscriber {
    service: ServiceClient,
    language: Option<String>,
}

impl HttpTranscriber {
    pub fn new(service: ServiceClient, language: Option<String>) -> Self {
        Self { service, language }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError> {
        debug!("Transcribing {} bytes via {}", audio.len(), self.service.base_url());

        let query: Vec<(&str, &str)> = self
            .language
            .as_deref()
            .map(|lang| ("language", lang))
            .into_iter()
            .collect();
        let response = self
            .service
            .post_bytes("", &query, audio.bytes().clone(), audio.content_type())
            .await?;
        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.trim().to_string())
    }
}
