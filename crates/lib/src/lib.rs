//! Hookline core library: forwards chat events from a bridge to an HTTP webhook receiver.

pub mod config;
pub mod forward;
pub mod init;
pub mod webhook;
