use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::agent::ResponderConfig;
use super::asr::TranscriberConfig;
use super::system::{IngressConfig, PipelineConfig, ServerConfig};
use super::tts::SynthesizerConfig;
use super::utils::{
    default_config_candidates, find_config_file, read_config_text, resolved_secret,
    substitute_env_vars,
};

/// Prefix of environment overrides, e.g. `NEGOBOT__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "NEGOBOT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ingress: IngressConfig,
    pub pipeline: PipelineConfig,
    pub transcriber: TranscriberConfig,
    pub responder: ResponderConfig,
    pub synthesizer: SynthesizerConfig,
}

impl Config {
    /// Load from the first config file found (if any), then apply environment overrides.
    /// Returns the path that was loaded alongside the config.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = find_config_file(&default_config_candidates());
        let config = match &path {
            Some(p) => Self::load_file(p, None)?,
            None => {
                debug!("No config file found, using defaults and environment");
                Self::from_sources(None, None)?
            }
        };
        Ok((config, path))
    }

    /// Load a specific file. `env` replaces the process environment when given.
    pub fn load_file(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let raw = read_config_text(path)?;
        let content = match &env {
            Some(vars) => substitute_env_vars(&raw, |name| vars.get(name).cloned()),
            None => substitute_env_vars(&raw, |name| std::env::var(name).ok()),
        };
        let format = file_format(path);
        info!("Loading configuration from {}", path.display());
        Self::from_sources(Some((&content, format)), env)
    }

    /// Build from optional file content plus environment overrides
    pub fn from_sources(
        file: Option<(&str, config::FileFormat)>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some((content, format)) = file {
            builder = builder.add_source(config::File::from_str(content, format));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.transcriber.api_key = resolved_secret(config.transcriber.api_key.take());
        config.responder.api_key = resolved_secret(config.responder.api_key.take());
        config.synthesizer.api_key = resolved_secret(config.synthesizer.api_key.take());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingress.max_audio_bytes == 0 {
            return Err(ConfigError::Invalid(
                "ingress.max_audio_bytes must be greater than zero".to_string(),
            ));
        }
        let timeouts = [
            ("pipeline.transcribe_timeout_ms", self.pipeline.transcribe_timeout_ms),
            ("pipeline.respond_timeout_ms", self.pipeline.respond_timeout_ms),
            ("pipeline.synthesize_timeout_ms", self.pipeline.synthesize_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be greater than zero", name)));
            }
        }
        Ok(())
    }
}

fn file_format(path: &Path) -> config::FileFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("json") => config::FileFormat::Json,
        _ => config::FileFormat::Yaml,
    }
}
