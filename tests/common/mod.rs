#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ac_support_chat::{
    build_app,
    config::{ApiKey, RelayConfig},
    routes::RELAY_PATH,
    state::AppState,
};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::IntoResponse,
};
use serde_json::Value;

/// Formatted log output collected from a thread-local subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CaptureWriter {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    /// Routes this thread's tracing output into the buffer until the guard drops.
    /// `#[tokio::test]` runs on a current-thread runtime, so spawned servers log here too.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let buf = logs.buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || CaptureWriter(buf.clone()))
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

pub const TEST_API_KEY: &str = "test-key-do-not-leak";

struct Recorder {
    hits: AtomicUsize,
    uris: Mutex<Vec<String>>,
    bodies: Mutex<Vec<Value>>,
    status: StatusCode,
    reply: String,
}

/// Fake generative-language API: records every call and answers with a fixed
/// status and body.
pub struct MockUpstream {
    pub api_base: String,
    recorder: Arc<Recorder>,
}

impl MockUpstream {
    pub async fn spawn(status: StatusCode, reply: impl Into<String>) -> Self {
        let recorder = Arc::new(Recorder {
            hits: AtomicUsize::new(0),
            uris: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
            status,
            reply: reply.into(),
        });

        let app = Router::new()
            .fallback(record)
            .with_state(recorder.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_base: format!("http://{addr}/v1beta"),
            recorder,
        }
    }

    pub async fn replying_text(text: &str) -> Self {
        Self::spawn(StatusCode::OK, candidate_body(text)).await
    }

    pub fn hits(&self) -> usize {
        self.recorder.hits.load(Ordering::SeqCst)
    }

    pub fn last_uri(&self) -> Option<String> {
        self.recorder.uris.lock().unwrap().last().cloned()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.recorder.bodies.lock().unwrap().last().cloned()
    }
}

async fn record(State(recorder): State<Arc<Recorder>>, uri: Uri, body: Bytes) -> impl IntoResponse {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    recorder.uris.lock().unwrap().push(uri.to_string());
    if let Ok(value) = serde_json::from_slice(&body) {
        recorder.bodies.lock().unwrap().push(value);
    }

    (
        recorder.status,
        [(CONTENT_TYPE, "application/json")],
        recorder.reply.clone(),
    )
}

pub fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": text }], "role": "model" }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

/// Address nothing is listening on.
pub async fn unreachable_api_base() -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v1beta")
}

pub fn relay_app(api_base: &str) -> Router {
    let config = RelayConfig::new(ApiKey::new(TEST_API_KEY)).with_api_base(api_base);
    build_app(Arc::new(AppState::new(&config)))
}

/// Serves the relay on an ephemeral port and returns its endpoint URL.
pub async fn spawn_relay(api_base: &str) -> String {
    let app = relay_app(api_base);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}{RELAY_PATH}")
}
