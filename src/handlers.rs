use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline::{PipelineResult, PipelineState, RequestContext, StageName};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "negobot-api";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to NegoBot API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME
    }))
}

/// Body of every `/api/v1/stt` JSON response
#[derive(Debug, Serialize)]
pub struct SttResponse {
    pub status: &'static str,
    pub request_id: Uuid,
    pub audio_received: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    /// Base64 encoded reply audio
    pub response_audio: Option<String>,
}

impl SttResponse {
    fn failure(request_id: Uuid, audio_received: usize, err: &ApiError) -> Self {
        Self {
            status: "error",
            request_id,
            audio_received,
            message: err.public_message(),
            transcript: None,
            reply_text: None,
            stage: err.stage(),
            reason: Some(err.reason()),
            response_audio: None,
        }
    }
}

/// Receive audio from the device and answer with synthesized speech
pub async fn speech_to_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let ctx = RequestContext::new();
    let declared_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let received = state
        .ingress
        .receive(body, declared_len, content_type)
        .instrument(ctx.span().clone())
        .await;

    let (audio_received, result) = match received {
        Ok(payload) => {
            ctx.record_bytes(payload.len());
            let size = payload.len();
            (size, state.orchestrator.run(&ctx, payload).await)
        }
        Err(err) => {
            let refused = PipelineState::Received.fail().unwrap_or(PipelineState::Rejected);
            ctx.span().in_scope(|| {
                debug!("{:?} -> {:?}", PipelineState::Received, refused);
                warn!("Rejected audio: {}", err);
            });
            ctx.finish();
            (0, PipelineResult::Rejected { reason: err.reason() })
        }
    };

    let response = render(&state, &ctx, &headers, audio_received, result);
    with_request_id(response, ctx.request_id())
}

fn render(
    state: &AppState,
    ctx: &RequestContext,
    headers: &HeaderMap,
    audio_received: usize,
    result: PipelineResult,
) -> Response {
    let request_id = ctx.request_id();
    match result {
        PipelineResult::Success {
            reply_audio,
            transcript,
            reply_text,
        } => {
            if wants_raw_audio(headers) {
                return match raw_audio(&state.config.synthesizer.content_type, reply_audio) {
                    Ok(response) => response,
                    Err(err) => {
                        ctx.span().in_scope(|| error!("Failed to build audio response: {}", err));
                        failure_response(request_id, audio_received, err)
                    }
                };
            }

            let body = SttResponse {
                status: "success",
                request_id,
                audio_received,
                message: "Audio processed successfully".to_string(),
                transcript: Some(transcript),
                reply_text: Some(reply_text),
                stage: None,
                reason: None,
                response_audio: Some(general_purpose::STANDARD.encode(&reply_audio)),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        failed => match failed.to_api_error() {
            Some(err) => failure_response(request_id, audio_received, err),
            None => failure_response(
                request_id,
                audio_received,
                ApiError::Internal("unclassified pipeline result".to_string()),
            ),
        },
    }
}

fn failure_response(request_id: Uuid, audio_received: usize, err: ApiError) -> Response {
    let body = SttResponse::failure(request_id, audio_received, &err);
    (err.status_code(), Json(body)).into_response()
}

fn raw_audio(content_type: &str, audio: axum::body::Bytes) -> Result<Response, ApiError> {
    let content_type = HeaderValue::from_str(content_type)
        .map_err(|e| ApiError::Internal(format!("invalid synthesizer content type: {}", e)))?;
    Ok(([(header::CONTENT_TYPE, content_type)], audio).into_response())
}

/// The device may ask for the reply audio as the raw response body
fn wants_raw_audio(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| {
            accept.split(',').any(|item| {
                let media = item.split(';').next().unwrap_or("").trim();
                media.starts_with("audio/") || media == "application/octet-stream"
            })
        })
        .unwrap_or(false)
}

fn with_request_id(mut response: Response, request_id: Uuid) -> Response {
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
