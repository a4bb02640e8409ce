pub mod context;
pub mod orchestrator;
pub mod result;
pub mod state;

pub use context::RequestContext;
pub use orchestrator::{Orchestrator, MAX_RETRIES};
pub use result::{PipelineResult, StageName};
pub use state::PipelineState;
