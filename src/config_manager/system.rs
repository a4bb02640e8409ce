use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::StageName;

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Limits applied to inbound audio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressConfig {
    #[serde(rename = "max_audio_bytes")]
    pub max_audio_bytes: usize,
}

fn default_max_audio_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            max_audio_bytes: default_max_audio_bytes(),
        }
    }
}

/// Per-stage timeouts and retry pacing, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub transcribe_timeout_ms: u64,
    pub respond_timeout_ms: u64,
    pub synthesize_timeout_ms: u64,
    pub retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transcribe_timeout_ms: 10_000,
            respond_timeout_ms: 15_000,
            synthesize_timeout_ms: 10_000,
            retry_backoff_ms: 0,
        }
    }
}

impl PipelineConfig {
    /// Timeout for a single attempt of `stage`. Ingress is bounded by the body read, not here.
    pub fn timeout_for(&self, stage: StageName) -> Duration {
        let ms = match stage {
            StageName::Ingress => return Duration::MAX,
            StageName::Transcribe => self.transcribe_timeout_ms,
            StageName::Respond => self.respond_timeout_ms,
            StageName::Synthesize => self.synthesize_timeout_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
