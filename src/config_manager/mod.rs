pub mod main;
pub mod system;
pub mod asr;
pub mod agent;
pub mod tts;
pub mod utils;

pub use main::{Config, ConfigError};
pub use system::{IngressConfig, PipelineConfig, ServerConfig};
pub use asr::TranscriberConfig;
pub use agent::ResponderConfig;
pub use tts::SynthesizerConfig;
