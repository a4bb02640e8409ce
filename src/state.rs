use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;

use crate::agent::ResponderFactory;
use crate::asr::ASRFactory;
use crate::config_manager::Config;
use crate::ingress::Ingress;
use crate::pipeline::Orchestrator;
use crate::tts::TTSFactory;

/// Shared, read-only state cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ingress: Ingress,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Build collaborators from configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("negobot-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let orchestrator = Orchestrator::new(
            ASRFactory::create_transcriber(&config.transcriber, client.clone()),
            ResponderFactory::create_responder(&config.responder, client.clone()),
            TTSFactory::create_synthesizer(&config.synthesizer, client),
            config.pipeline.clone(),
        );

        Ok(Self::with_orchestrator(config, orchestrator))
    }

    pub fn with_orchestrator(config: Config, orchestrator: Orchestrator) -> Self {
        Self {
            ingress: Ingress::new(&config.ingress),
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
