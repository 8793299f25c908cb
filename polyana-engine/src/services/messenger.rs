//! Staff messenger
//!
//! The engine never talks to a concrete chat platform directly;
//! notifications go through [`Messenger`]. The bundled [`LogMessenger`]
//! writes them to the log, enough for a single-host deployment.

use async_trait::async_trait;

/// Outbound staff notification channel
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, channel: &str, text: &str) -> anyhow::Result<()>;
}

/// Messenger that writes notifications to the log
#[derive(Debug, Default)]
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    async fn send(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        tracing::info!(channel = %channel, "Staff notification: {text}");
        Ok(())
    }
}
