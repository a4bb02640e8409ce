use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use super::context::RequestContext;
use super::result::{PipelineResult, StageName};
use super::state::PipelineState;
use crate::agent::Responder;
use crate::asr::Transcriber;
use crate::config_manager::system::PipelineConfig;
use crate::error::{reason, ServiceError};
use crate::ingress::AudioPayload;
use crate::tts::Synthesizer;

/// Retries allowed per stage after a transient failure
pub const MAX_RETRIES: u32 = 1;

/// Sequences transcribe, respond and synthesize for one payload
pub struct Orchestrator {
    transcriber: Arc<dyn Transcriber>,
    responder: Arc<dyn Responder>,
    synthesizer: Arc<dyn Synthesizer>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        responder: Arc<dyn Responder>,
        synthesizer: Arc<dyn Synthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            transcriber,
            responder,
            synthesizer,
            config,
        }
    }

    /// Run the pipeline to a terminal state. Dropping the returned future
    /// cancels whichever collaborator call is in flight.
    pub async fn run(&self, ctx: &RequestContext, payload: AudioPayload) -> PipelineResult {
        let span = ctx.span().clone();
        let result = self.execute(ctx, payload).instrument(span).await;
        ctx.finish();
        result
    }

    async fn execute(&self, ctx: &RequestContext, payload: AudioPayload) -> PipelineResult {
        let mut state = PipelineState::Received;

        state = transition(state, PipelineState::Transcribing);
        let transcriber = &self.transcriber;
        let audio = &payload;
        let transcript = match self
            .run_stage(StageName::Transcribe, move || transcriber.transcribe(audio))
            .await
        {
            Ok(text) => text,
            Err(reason) => return fail(state, reason),
        };
        if transcript.trim().is_empty() {
            return fail(state, reason::NO_SPEECH);
        }
        debug!("Transcribed: {:?}", transcript);
        // Audio is no longer needed once recognized
        drop(payload);

        state = transition(state, PipelineState::Responding);
        let responder = &self.responder;
        let heard = transcript.as_str();
        let reply_text = match self
            .run_stage(StageName::Respond, move || responder.respond(heard))
            .await
        {
            Ok(text) => text,
            Err(reason) => return fail(state, reason),
        };
        if reply_text.trim().is_empty() {
            return fail(state, reason::EMPTY_REPLY);
        }
        debug!("Reply: {:?}", reply_text);

        state = transition(state, PipelineState::Synthesizing);
        let synthesizer = &self.synthesizer;
        let reply = reply_text.as_str();
        let reply_audio = match self
            .run_stage(StageName::Synthesize, move || synthesizer.synthesize(reply))
            .await
        {
            Ok(audio) => audio,
            Err(reason) => return fail(state, reason),
        };

        transition(state, PipelineState::Done);
        info!(
            "Pipeline finished in {} ms, {} bytes of reply audio",
            ctx.elapsed().as_millis(),
            reply_audio.len()
        );
        PipelineResult::Success {
            reply_audio,
            transcript,
            reply_text,
        }
    }

    /// Run one stage under its timeout, retrying at most `MAX_RETRIES` times
    /// on transient failure. Returns the reason code of the last failure.
    async fn run_stage<T, F, Fut>(&self, stage: StageName, mut call: F) -> Result<T, &'static str>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let limit = self.config.timeout_for(stage);
        let mut retries = 0;

        loop {
            let failure = match tokio::time::timeout(limit, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) if err.is_permanent() => {
                    warn!("{} stage failed permanently: {}", stage, err);
                    return Err(reason::REJECTED);
                }
                Ok(Err(err)) => {
                    warn!("{} stage failed: {}", stage, err);
                    reason::UNAVAILABLE
                }
                Err(_) => {
                    warn!("{} stage timed out after {:?}", stage, limit);
                    reason::TIMEOUT
                }
            };

            if retries >= MAX_RETRIES {
                return Err(failure);
            }
            retries += 1;

            let backoff = self.config.retry_backoff();
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }
            info!("Retrying {} stage ({}/{})", stage, retries, MAX_RETRIES);
        }
    }
}

fn transition(from: PipelineState, to: PipelineState) -> PipelineState {
    debug_assert_eq!(from.advance(), Some(to), "illegal transition {:?} -> {:?}", from, to);
    debug!("{:?} -> {:?}", from, to);
    to
}

fn fail(state: PipelineState, reason: &'static str) -> PipelineResult {
    let next = state.fail().unwrap_or(PipelineState::Failed(StageName::Ingress));
    debug_assert!(next.is_terminal(), "{:?} is not terminal", next);
    debug!("{:?} -> {:?}", state, next);

    let stage = match next {
        PipelineState::Failed(stage) => stage,
        _ => StageName::Ingress,
    };
    warn!("Pipeline halted at {} stage: {}", stage, reason);
    PipelineResult::PartialFailure { stage, reason }
}
