use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use super::client::HttpSynthesizer;
use super::interface::Synthesizer;
use super::stub::SilentSynthesizer;
use crate::config_manager::tts::SynthesizerConfig;
use crate::service_client::ServiceClient;

/// Factory for the text-to-speech collaborator
pub struct TTSFactory;

impl TTSFactory {
    pub fn create_synthesizer(config: &SynthesizerConfig, client: Client) -> Arc<dyn Synthesizer> {
        match &config.url {
            Some(url) => {
                info!("Using HTTP synthesizer at {}", url);
                let service = ServiceClient::new(client, url.clone(), config.api_key.clone());
                Arc::new(HttpSynthesizer::new(service, config.voice.clone()))
            }
            None => {
                warn!("synthesizer.url not configured, using silent stub synthesizer");
                Arc::new(SilentSynthesizer)
            }
        }
    }
}
