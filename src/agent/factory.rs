use std::sync::Arc;

use reqwest::Client;
use tracing::warn;

use super::interface::Responder;
use super::openai_compatible::OpenAICompatibleResponder;
use super::stub::EchoResponder;
use crate::config_manager::agent::ResponderConfig;
use crate::service_client::ServiceClient;

/// Builds the language-model collaborator from configuration
pub struct ResponderFactory;

impl ResponderFactory {
    pub fn create_responder(config: &ResponderConfig, client: Client) -> Arc<dyn Responder> {
        match &config.base_url {
            Some(base_url) => {
                let service =
                    ServiceClient::new(client, base_url.clone(), config.api_key.clone());
                Arc::new(OpenAICompatibleResponder::new(
                    service,
                    config.model.clone(),
                    config.temperature,
                    config.system_prompt.clone(),
                ))
            }
            None => {
                warn!("responder.base_url not configured, using echo responder");
                Arc::new(EchoResponder)
            }
        }
    }
}
