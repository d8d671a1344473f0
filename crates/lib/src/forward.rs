//! Bridge-side forwarding: decide which chat events reach the webhook and hand them
//! to the dispatcher in the background.

use crate::config;
use crate::webhook::{Dispatcher, WebhookEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

/// Which events are forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardPolicy {
    /// Forward messages sent by this account (`FORWARD_SELF=true`).
    pub forward_self: bool,
}

impl ForwardPolicy {
    pub fn from_env() -> Self {
        Self {
            forward_self: config::resolve_forward_self(),
        }
    }

    /// Only text-bearing messages are forwarded; own messages only when enabled.
    pub fn should_forward(&self, event: &WebhookEvent) -> bool {
        if event.content.is_empty() {
            return false;
        }
        !event.is_from_me || self.forward_self
    }
}

/// Applies a [`ForwardPolicy`] before dispatching.
pub struct Forwarder {
    dispatcher: Arc<Dispatcher>,
    policy: ForwardPolicy,
}

impl Forwarder {
    pub fn new(dispatcher: Arc<Dispatcher>, policy: ForwardPolicy) -> Self {
        Self { dispatcher, policy }
    }

    pub fn policy(&self) -> ForwardPolicy {
        self.policy
    }

    /// Spawn a dispatch for `event` if the policy allows it. Returns the task handle, or
    /// `None` when the event was skipped.
    pub fn forward(&self, event: WebhookEvent) -> Option<JoinHandle<()>> {
        if !self.policy.should_forward(&event) {
            log::debug!(
                "forward: skipping message from {} in {} (from_me={}, empty={})",
                event.sender,
                event.chat_jid,
                event.is_from_me,
                event.content.is_empty()
            );
            return None;
        }
        Some(Arc::clone(&self.dispatcher).spawn_dispatch(event))
    }

    /// Forward newline-delimited JSON events from `reader` until EOF, then wait for every
    /// spawned dispatch. Blank lines are ignored; malformed lines are logged and skipped.
    /// Returns how many events were dispatched.
    pub async fn forward_lines<R>(&self, reader: R) -> anyhow::Result<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut in_flight = Vec::new();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event: WebhookEvent = match serde_json::from_str(line) {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("skipping malformed event: {}", e);
                    continue;
                }
            };
            if let Some(handle) = self.forward(event) {
                in_flight.push(handle);
            }
        }

        let dispatched = in_flight.len();
        for handle in in_flight {
            if let Err(e) = handle.await {
                log::warn!("webhook task failed: {}", e);
            }
        }
        Ok(dispatched)
    }
}
