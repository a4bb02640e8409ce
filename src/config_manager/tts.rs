use serde::{Deserialize, Serialize};

/// Text-to-speech service. Without a `url` the stub synthesizer is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    pub url: Option<String>,

    #[serde(rename = "api_key")]
    pub api_key: Option<String>,

    pub voice: Option<String>,

    /// Content type of the audio the service returns
    #[serde(rename = "content_type")]
    pub content_type: String,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            voice: None,
            content_type: "audio/wav".to_string(),
        }
    }
}
