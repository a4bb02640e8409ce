use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tower::ServiceExt;

use negobot_api::agent::Responder;
use negobot_api::asr::Transcriber;
use negobot_api::error::{ResponseError, SynthesisError, TranscriptionError};
use negobot_api::tts::Synthesizer;
use negobot_api::{routes, AppState, AudioPayload, Config, Orchestrator, ServiceError};

struct FixedTranscriber(&'static str);

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio: &AudioPayload) -> Result<String, TranscriptionError> {
        Ok(self.0.to_string())
    }
}

struct FixedResponder {
    reply: &'static str,
    delay: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl Responder for FixedResponder {
    async fn respond(&self, _text: &str) -> Result<String, ResponseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.to_string())
    }
}

struct FixedSynthesizer(usize);

#[async_trait]
impl Synthesizer for FixedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, SynthesisError> {
        Ok(Bytes::from(vec![0x11; self.0]))
    }
}

struct PolicySynthesizer;

#[async_trait]
impl Synthesizer for PolicySynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, SynthesisError> {
        Err(ServiceError::Rejected("content policy".into()))
    }
}

fn responder(delay: Duration) -> Arc<FixedResponder> {
    Arc::new(FixedResponder {
        reply: "hi there",
        delay,
        calls: AtomicUsize::new(0),
    })
}

fn app_with(config: Config, responder: Arc<FixedResponder>, synthesizer: Arc<dyn Synthesizer>) -> Router {
    let orchestrator = Orchestrator::new(
        Arc::new(FixedTranscriber("hello")),
        responder,
        synthesizer,
        config.pipeline.clone(),
    );
    routes::app(AppState::with_orchestrator(config, orchestrator))
}

fn default_app() -> Router {
    app_with(
        Config::default(),
        responder(Duration::ZERO),
        Arc::new(FixedSynthesizer(8_000)),
    )
}

fn stt_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/stt")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_banner() {
    let response = default_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Welcome to NegoBot API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_endpoint() {
    let response = default_app()
        .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({"status": "healthy", "service": "negobot-api"}));
}

#[tokio::test]
async fn synthetic_pcm_round_trip() {
    let pcm: Vec<u8> = (0..16_000u32).map(|i| (i % 256) as u8).collect();
    let response = default_app().oneshot(stt_request(pcm)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["audio_received"], 16_000);
    assert_eq!(body["transcript"], "hello");
    assert_eq!(body["reply_text"], "hi there");

    let audio = general_purpose::STANDARD
        .decode(body["response_audio"].as_str().unwrap())
        .unwrap();
    assert_eq!(audio, vec![0x11; 8_000]);
}

#[tokio::test]
async fn raw_audio_when_requested() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/stt")
        .header(header::ACCEPT, "audio/wav")
        .header(header::CONTENT_TYPE, "audio/l16; rate=16000")
        .body(Body::from(vec![1u8; 320]))
        .unwrap();
    let response = default_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(bytes.len(), 8_000);
}

#[tokio::test]
async fn empty_body_is_a_bad_request() {
    let responder = responder(Duration::ZERO);
    let app = app_with(
        Config::default(),
        responder.clone(),
        Arc::new(FixedSynthesizer(10)),
    );
    let response = app.oneshot(stt_request(Vec::new())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["reason"], "empty");
    assert_eq!(body["response_audio"], Value::Null);
    assert!(body.get("stage").is_none());
    assert_eq!(responder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected_and_ceiling_accepted() {
    let mut config = Config::default();
    config.ingress.max_audio_bytes = 1024;

    let app = app_with(
        config,
        responder(Duration::ZERO),
        Arc::new(FixedSynthesizer(10)),
    );

    let response = app.clone().oneshot(stt_request(vec![0u8; 1025])).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["reason"], "too_large");

    let response = app.oneshot(stt_request(vec![0u8; 1024])).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn declared_length_over_ceiling_is_rejected() {
    let mut config = Config::default();
    config.ingress.max_audio_bytes = 64;
    let app = app_with(config, responder(Duration::ZERO), Arc::new(FixedSynthesizer(10)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/stt")
        .header(header::CONTENT_LENGTH, "4096")
        .body(Body::from(vec![0u8; 4096]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["reason"], "too_large");
}

#[tokio::test(start_paused = true)]
async fn slow_responder_maps_to_gateway_timeout() {
    let mut config = Config::default();
    config.pipeline.respond_timeout_ms = 500;

    let app = app_with(
        config,
        responder(Duration::from_secs(30)),
        Arc::new(FixedSynthesizer(10)),
    );
    let response = app.oneshot(stt_request(vec![0u8; 100])).await.unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = json_body(response).await;
    assert_eq!(body["stage"], "respond");
    assert_eq!(body["reason"], "timeout");
    assert_eq!(body["audio_received"], 100);
}

#[tokio::test]
async fn blank_reply_is_unprocessable() {
    let responder = Arc::new(FixedResponder {
        reply: "  ",
        delay: Duration::ZERO,
        calls: AtomicUsize::new(0),
    });
    let app = app_with(Config::default(), responder.clone(), Arc::new(FixedSynthesizer(10)));
    let response = app.oneshot(stt_request(vec![0u8; 100])).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["stage"], "respond");
    assert_eq!(body["reason"], "empty_reply");
    assert_eq!(body["response_audio"], Value::Null);
    assert_eq!(responder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn permanent_synthesis_failure_is_unprocessable() {
    let app = app_with(
        Config::default(),
        responder(Duration::ZERO),
        Arc::new(PolicySynthesizer),
    );
    let response = app.oneshot(stt_request(vec![0u8; 100])).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["stage"], "synthesize");
    assert_eq!(body["reason"], "rejected");
    assert!(!body["message"].as_str().unwrap().contains("content policy"));
}

#[tokio::test]
async fn unconfigured_service_runs_on_stubs() {
    let app = routes::app(AppState::new(Config::default()).unwrap());
    let response = app.oneshot(stt_request(vec![0u8; 640])).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcript"], "hello");
    assert_eq!(body["reply_text"], "You said: hello");

    let audio = general_purpose::STANDARD
        .decode(body["response_audio"].as_str().unwrap())
        .unwrap();
    assert_eq!(&audio[..4], b"RIFF");
}
