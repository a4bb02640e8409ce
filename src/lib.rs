pub mod agent;
pub mod asr;
pub mod config_manager;
pub mod error;
pub mod handlers;
pub mod ingress;
pub mod pipeline;
pub mod routes;
pub mod service_client;
pub mod state;
pub mod tts;

pub use config_manager::Config;
pub use error::{ApiError, ServiceError};
pub use ingress::{AudioPayload, Ingress};
pub use pipeline::{Orchestrator, PipelineResult, RequestContext, StageName};
pub use state::AppState;
