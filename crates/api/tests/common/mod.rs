#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use callpilot_api::config::ServerConfig;
use callpilot_api::router::build_app_router;
use callpilot_api::state::AppState;
use callpilot_core::call::{CallStatus, OutboundCall, ProviderCallOutcome, ScriptInput};
use callpilot_core::error::CoreError;
use callpilot_core::history::CallHistory;
use callpilot_core::providers::{CallInitiator, ScriptGenerator};
use callpilot_store::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        history_dir: std::env::temp_dir(),
    }
}

// ---------------------------------------------------------------------------
// Fake providers
// ---------------------------------------------------------------------------

/// Script generator returning a fixed result.
pub struct FakeGenerator {
    pub result: Result<String, String>,
}

#[async_trait]
impl ScriptGenerator for FakeGenerator {
    async fn generate_script(&self, _input: &ScriptInput) -> Result<String, CoreError> {
        self.result.clone().map_err(CoreError::Provider)
    }
}

/// Call initiator that records how often it was invoked.
pub struct FakeInitiator {
    pub result: Result<ProviderCallOutcome, String>,
    pub calls: AtomicUsize,
}

impl FakeInitiator {
    pub fn queued(sid: &str) -> Arc<Self> {
        Self::reporting(CallStatus::Queued, sid)
    }

    /// Provider accepted the request but reported `status` for the call.
    pub fn reporting(status: CallStatus, sid: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(ProviderCallOutcome {
                status: Some(status),
                sid: Some(sid.to_string()),
                message: None,
            }),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallInitiator for FakeInitiator {
    async fn initiate_call(&self, _call: &OutboundCall) -> Result<ProviderCallOutcome, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(CoreError::Provider)
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router over an in-memory history.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(
    script_generator: Option<Arc<dyn ScriptGenerator>>,
    call_initiator: Option<Arc<dyn CallInitiator>>,
) -> Router {
    let history = CallHistory::open(Arc::new(MemoryStore::new()));
    let state = AppState::new(test_config(), history, script_generator, call_initiator);
    build_app_router(state)
}

/// App with no providers configured.
pub fn bare_app() -> Router {
    build_test_app(None, None)
}

/// App whose script generator returns `result`.
pub fn app_with_generator(result: Result<&str, &str>) -> Router {
    let generator: Arc<dyn ScriptGenerator> = Arc::new(FakeGenerator {
        result: result.map(str::to_string).map_err(str::to_string),
    });
    build_test_app(Some(generator), None)
}

/// App placing calls through `initiator`.
pub fn app_with_initiator(initiator: &Arc<FakeInitiator>) -> Router {
    let initiator: Arc<dyn CallInitiator> = initiator.clone();
    build_test_app(None, Some(initiator))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

/// POST a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete, valid call submission.
pub fn valid_call_body() -> serde_json::Value {
    serde_json::json!({
        "clientName": "Jordan",
        "businessName": "Summit Dental",
        "phoneNumber": "+15551231234",
        "contactEmail": "jordan@example.com",
        "preferredDate": "2024-12-01",
        "preferredTimeWindow": "between 2-4 PM",
        "appointmentGoal": "Schedule a follow-up cleaning for Maria Lopez",
        "notes": "She prefers Tuesdays.",
        "script": "Hi, this is Jordan calling on behalf of Summit Dental."
    })
}
