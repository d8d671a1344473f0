//! One-shot webhook dispatch: serialize, POST, report one line.
//!
//! Failures never reach the caller; they are reported to the sink and dropped.
//! No retries, no persistence.

use crate::config::{resolve_webhook_url, WebhookConfig};
use crate::webhook::event::WebhookEvent;
use crate::webhook::sink::{DeliverySink, Report};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Marshal(#[source] serde_json::Error),
    #[error("{0}")]
    Send(#[source] reqwest::Error),
    #[error("building webhook http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Response classification: only 200 counts as delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Rejected(StatusCode),
}

/// Where requests go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Endpoint {
    /// Re-read `WEBHOOK_URL` on every dispatch.
    #[default]
    Env,
    Fixed(String),
}

impl Endpoint {
    pub fn resolve(&self) -> String {
        match self {
            Endpoint::Env => resolve_webhook_url(),
            Endpoint::Fixed(url) => url.clone(),
        }
    }
}

/// Stateless webhook dispatcher. Cheap to share behind an `Arc`; calls are independent.
pub struct Dispatcher {
    client: reqwest::Client,
    endpoint: Endpoint,
    sink: Arc<dyn DeliverySink>,
}

impl Dispatcher {
    pub fn new(config: &WebhookConfig) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(DispatchError::Client)?;
        Ok(Self {
            client,
            endpoint: Endpoint::default(),
            sink: config.sink.build(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DeliverySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Deliver `event` and report exactly one outcome line. Never fails.
    pub async fn dispatch(&self, event: &WebhookEvent) {
        let result = self.deliver(event).await;
        self.sink.record(&report_for(event, &result));
    }

    /// Run [`Dispatcher::dispatch`] on a background task.
    pub fn spawn_dispatch(self: Arc<Self>, event: WebhookEvent) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.dispatch(&event).await;
        })
    }

    /// Single POST attempt. The response body is drained and dropped once the status is known.
    pub async fn deliver(&self, event: &WebhookEvent) -> Result<Delivery, DispatchError> {
        let body = event.to_body().map_err(DispatchError::Marshal)?;
        let url = self.endpoint.resolve();
        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(DispatchError::Send)?;
        let status = res.status();
        // status is already decided; a failed drain only means the connection is not reused
        let _ = res.bytes().await;
        if status == StatusCode::OK {
            Ok(Delivery::Sent)
        } else {
            Ok(Delivery::Rejected(status))
        }
    }
}

fn report_for(event: &WebhookEvent, result: &Result<Delivery, DispatchError>) -> Report {
    match result {
        Ok(Delivery::Sent) => Report::Sent {
            sender: event.sender.clone(),
        },
        Ok(Delivery::Rejected(status)) => Report::Rejected(status.as_u16()),
        Err(DispatchError::Marshal(e)) => Report::MarshalError(error_chain(e)),
        Err(DispatchError::Send(e)) => Report::SendError(error_chain(e)),
        // built once in `new`; `deliver` never yields it
        Err(e @ DispatchError::Client(_)) => Report::SendError(error_chain(e)),
    }
}

/// `outer: cause: root cause`, skipping causes already spelled out by their parent.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}
