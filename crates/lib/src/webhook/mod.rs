//! Outbound webhook: event payload, dispatcher, and outcome sinks.
//!
//! The dispatcher POSTs one JSON event to the receiver and reports the result as a
//! single status line. It never returns an error to the caller.

mod dispatcher;
mod event;
mod sink;

pub use dispatcher::{Delivery, DispatchError, Dispatcher, Endpoint};
pub use event::WebhookEvent;
pub use sink::{DeliverySink, LogSink, Report, SinkKind, StdoutSink};
