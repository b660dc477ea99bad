//! Cancellable transfer tasks
//!
//! Each transfer runs as its own tokio task with its own
//! [`CancellationToken`]. The network exchange is the only point where a
//! transfer suspends; [`suspend`] races it against cancellation and the
//! configured deadline so each outcome surfaces as its own error kind.

use crate::error::{Operation, Result, TransferError};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Run `exchange` until it completes, is cancelled, or runs past `timeout`
///
/// Cancellation is checked first, so a token cancelled before or while the
/// exchange is pending always yields [`TransferError::Cancelled`]. Dropping
/// the losing future aborts the in-flight request.
///
/// # Errors
///
/// [`TransferError::Cancelled`] or [`TransferError::Timeout`]; errors from
/// `exchange` itself are passed through.
pub async fn suspend<T, F>(
    operation: Operation,
    cancel: &CancellationToken,
    timeout: Duration,
    exchange: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!(operation = %operation, "exchange cancelled");
            Err(TransferError::Cancelled { operation })
        }
        outcome = tokio::time::timeout(timeout, exchange) => match outcome {
            Ok(result) => result,
            Err(_) => {
                debug!(operation = %operation, timeout_secs = timeout.as_secs_f64(), "exchange timed out");
                Err(TransferError::Timeout { operation, timeout })
            }
        },
    }
}

/// A transfer running in the background
///
/// Dropping the handle does not stop the transfer; call [`TransferTask::cancel`].
#[derive(Debug)]
pub struct TransferTask<T> {
    operation: Operation,
    cancel: CancellationToken,
    handle: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> TransferTask<T> {
    /// Spawn `work` on the current runtime
    ///
    /// `work` receives a clone of `cancel` and is expected to pass it to
    /// [`suspend`] around its network exchange.
    pub fn spawn<F, Fut>(operation: Operation, cancel: CancellationToken, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let handle = tokio::spawn(work(cancel.clone()));
        Self {
            operation,
            cancel,
            handle,
        }
    }

    /// Which operation this task performs
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Request cancellation; takes effect at the network exchange
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running task, e.g. for wiring to Ctrl-C
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the task has finished (successfully or not)
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task's outcome
    ///
    /// # Errors
    ///
    /// The task's own error, or [`TransferError::Internal`] if it panicked.
    pub async fn join(self) -> Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(TransferError::Cancelled {
                operation: self.operation,
            }),
            Err(e) => Err(TransferError::Internal(format!(
                "{} task failed: {e}",
                self.operation
            ))),
        }
    }
}
