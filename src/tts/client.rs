use async_trait::async_trait;
use axum::body::Bytes;
use tracing::debug;

use super::interface::{Synthesizer, TTSRequest};
use crate::error::{ServiceError, SynthesisError};
use crate::service_client::ServiceClient;

/// TTS client that posts text and receives audio in the response body
pub struct HttpSynthesizer {
    service: ServiceClient,
    default_voice: Option<String>,
}

impl HttpSynthesizer {
    pub fn new(service: ServiceClient, default_voice: Option<String>) -> Self {
        Self {
            service,
            default_voice,
        }
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SynthesisError> {
        let request = TTSRequest {
            text: text.to_string(),
            voice: self.default_voice.clone(),
        };
        debug!("Sending TTS request: {} chars, voice={:?}", text.len(), request.voice);

        let response = self.service.post_json("", &request).await?;
        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(ServiceError::InvalidResponse("empty audio body".to_string()));
        }

        debug!("TTS synthesis returned {} bytes", audio.len());
        Ok(audio)
    }
}
