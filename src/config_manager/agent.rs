use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completion endpoint used to produce replies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    #[serde(rename = "base_url")]
    pub base_url: Option<String>,

    #[serde(rename = "api_key")]
    pub api_key: Option<String>,

    pub model: String,

    pub temperature: f32,

    #[serde(rename = "system_prompt")]
    pub system_prompt: Option<String>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_system_prompt() -> Option<String> {
    Some(
        "You are NegoBot, a voice assistant. Answer in one or two short sentences \
         that sound natural when spoken aloud."
            .to_string(),
    )
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}
