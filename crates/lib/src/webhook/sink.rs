//! Where dispatch outcomes are reported: one line per dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome of a single dispatch, rendered as the status line operators grep for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Payload could not be serialized; nothing was sent.
    MarshalError(String),
    /// Request never produced an HTTP response (connect, DNS, timeout, bad URL).
    SendError(String),
    /// Receiver answered 200.
    Sent { sender: String },
    /// Receiver answered with any other status.
    Rejected(u16),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::MarshalError(detail) => {
                write!(f, "Error marshaling webhook payload: {}", detail)
            }
            Report::SendError(detail) => write!(f, "Error sending webhook: {}", detail),
            Report::Sent { sender } => write!(f, "✓ Webhook sent for message from {}", sender),
            Report::Rejected(code) => write!(f, "⚠ Webhook failed with status {}", code),
        }
    }
}

/// Receives exactly one report per dispatch.
pub trait DeliverySink: Send + Sync {
    fn record(&self, report: &Report);
}

/// Reports through the `log` facade; level follows the outcome. The logger decides the
/// final line format, so use [`StdoutSink`] when the bare line must start the output line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DeliverySink for LogSink {
    fn record(&self, report: &Report) {
        match report {
            Report::Sent { .. } => log::info!("{}", report),
            Report::Rejected(_) => log::warn!("{}", report),
            Report::MarshalError(_) | Report::SendError(_) => log::error!("{}", report),
        }
    }
}

/// Writes the bare line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl DeliverySink for StdoutSink {
    fn record(&self, report: &Report) {
        println!("{}", report);
    }
}

/// Sink selection in config: "log" (default) or "stdout".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Log,
    Stdout,
}

impl SinkKind {
    pub fn build(self) -> Arc<dyn DeliverySink> {
        match self {
            SinkKind::Log => Arc::new(LogSink),
            SinkKind::Stdout => Arc::new(StdoutSink),
        }
    }
}
