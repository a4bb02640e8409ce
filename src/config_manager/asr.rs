use serde::{Deserialize, Serialize};

/// Speech-to-text service. Without a `url` the stub transcriber is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    pub url: Option<String>,

    #[serde(rename = "api_key")]
    pub api_key: Option<String>,

    pub language: Option<String>,
}
