//! Message dispatch abstraction for email and SMS.
//!
//! Transport mechanics (SMTP, SMS gateway) live outside this crate;
//! the auth flows only need a `send(to, subject, body)` capability.
//! Dispatch is fire-and-forget relative to the enclosing request — a
//! delivery failure is logged, never surfaced.

use sentra_core::error::{CoreError, CoreResult};
use tracing::info;

pub trait MessageSender: Send + Sync {
    /// Deliver a message or return an error to be logged by the caller.
    fn send(&self, to: &str, subject: &str, body: &str) -> CoreResult<()>;
}

/// Local dev sender that logs the payload instead of sending.
#[derive(Debug, Clone, Default)]
pub struct LogMessageSender;

impl MessageSender for LogMessageSender {
    fn send(&self, to: &str, subject: &str, body: &str) -> CoreResult<()> {
        info!(to = %to, subject = %subject, body = %body, "message dispatch stub");
        Ok(())
    }
}

/// Test double that always fails, for exercising the swallow-and-log
/// contract.
#[derive(Debug, Clone, Default)]
pub struct FailingMessageSender;

impl MessageSender for FailingMessageSender {
    fn send(&self, to: &str, _subject: &str, _body: &str) -> CoreResult<()> {
        Err(CoreError::Dispatch(format!("unreachable destination: {to}")))
    }
}
