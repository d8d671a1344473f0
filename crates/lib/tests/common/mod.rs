//! Shared test receiver and capturing sink.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::post;
use axum::Router;
use hookline::webhook::{DeliverySink, Report};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request seen by the receiver.
#[derive(Debug, Clone)]
pub struct Hit {
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct ReceiverState {
    status: StatusCode,
    delay: Duration,
    hits: Arc<Mutex<Vec<Hit>>>,
}

/// Local HTTP receiver answering `POST /hook` with a fixed status.
/// `POST /moved` answers 307 pointing at `/hook`.
pub struct Receiver {
    pub base: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Receiver {
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with_delay(status, Duration::ZERO).await
    }

    pub async fn start_with_delay(status: StatusCode, delay: Duration) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = ReceiverState {
            status,
            delay,
            hits: Arc::clone(&hits),
        };
        let app = Router::new()
            .route("/hook", post(handle_hook))
            .route("/moved", post(|| async { Redirect::temporary("/hook") }))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind receiver");
        let addr = listener.local_addr().expect("local_addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            base: format!("http://{}", addr),
            hits,
        }
    }

    pub fn url(&self) -> String {
        format!("{}/hook", self.base)
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().expect("hits lock").clone()
    }
}

async fn handle_hook(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    state.hits.lock().expect("hits lock").push(Hit {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, "ignored")
}

/// Collects every reported line.
#[derive(Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }
}

impl DeliverySink for CaptureSink {
    fn record(&self, report: &Report) {
        self.lines.lock().expect("lines lock").push(report.to_string());
    }
}
