use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use super::client::HttpTranscriber;
use super::interface::Transcriber;
use super::stub::StubTranscriber;
use crate::config_manager::asr::TranscriberConfig;
use crate::service_client::ServiceClient;

/// Builds the speech-to-text collaborator from configuration
pub struct ASRFactory;

impl ASRFactory {
    pub fn create_transcriber(config: &TranscriberConfig, client: Client) -> Arc<dyn Transcriber> {
        match &config.url {
            Some(url) => {
                info!("Using HTTP transcriber at {}", url);
                let service = ServiceClient::new(client, url.clone(), config.api_key.clone());
                Arc::new(HttpTranscriber::new(service, config.language.clone()))
            }
            None => {
                warn!("transcriber.url not configured, using stub transcriber");
                Arc::new(StubTranscriber::default())
            }
        }
    }
}
