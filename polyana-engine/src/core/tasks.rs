//! Background task supervision
//!
//! Registration, panic isolation and graceful shutdown for the
//! scheduler cadences. A panicking cadence dies alone with an error
//! log; the other cadences keep running.
//!
//! # Task kinds
//!
//! - [`TaskKind::Warmup`] - runs once at startup (reconciliation, catch-up)
//! - [`TaskKind::Periodic`] - recurring cadence loop

use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Task kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Runs once at startup and is expected to finish
    Warmup,
    /// Cadence loop that only returns on shutdown
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Warmup => write!(f, "Warmup"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

/// A registered background task
struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Background task supervisor
///
/// # Example
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// tasks.spawn("hold_sweep", TaskKind::Periodic, async move {
///     // cadence loop
/// });
/// // on ctrl-c
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    /// Cancellation token every loop selects on
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token tasks watch for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a background task
    ///
    /// The future runs under `catch_unwind`: a panic is logged with its
    /// message and never tears down the process or sibling tasks.
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(future).catch_unwind().await {
                tracing::error!(
                    task = %name,
                    kind = %kind,
                    panic = %panic_message(&panic),
                    "Background task panicked! This is a bug that should be reported."
                );
            } else if kind == TaskKind::Periodic {
                // Periodic loops only return when cancelled
                tracing::debug!(task = %name, "Background task completed");
            }
        });
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// One-line summary of registered tasks
    pub fn log_summary(&self) {
        let periodic = self
            .tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Periodic)
            .count();
        tracing::info!(
            "Background tasks registered: {} total (Periodic: {}, Warmup: {})",
            self.tasks.len(),
            periodic,
            self.tasks.len() - periodic
        );
    }

    /// Graceful shutdown: signal every task, then wait for each
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, "Task stopped"),
                Err(e) if e.is_cancelled() => {
                    tracing::debug!(task = %task.name, "Task cancelled");
                }
                Err(e) => {
                    tracing::error!(task = %task.name, error = ?e, "Task join failed");
                }
            }
        }
        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort text of a panic payload
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let mut tasks = BackgroundTasks::new();
        let survived = Arc::new(AtomicBool::new(false));

        tasks.spawn("panicker", TaskKind::Warmup, async {
            panic!("boom");
        });
        let flag = survived.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("survivor", TaskKind::Periodic, async move {
            token.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(tasks.len(), 2);
        tasks.shutdown().await;
        assert!(survived.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_loops() {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("idler", TaskKind::Periodic, async move {
            token.cancelled().await;
        });
        assert!(!tasks.is_empty());
        // Must return rather than hang
        tasks.shutdown().await;
    }
}
