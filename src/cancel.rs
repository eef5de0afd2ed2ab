//! External cancellation for a running swap stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared flag that stops a stream, including a read that is waiting for
/// the next chunk.
///
/// Clones share the same flag, so one clone can be handed to a Ctrl+C
/// handler or another task while the stream holds the other. A handle
/// cannot be reset; use a new one per swap job.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not missed
        notified.as_mut().enable();

        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Set up a Ctrl+C handler that cancels this handle.
    ///
    /// The first interrupt cancels; a second one exits the process with
    /// status 130. Errors (a handler is already installed) are ignored.
    pub fn cancel_on_interrupt(&self) {
        let handle = self.clone();
        let _ = ctrlc::set_handler(move || {
            if handle.is_cancelled() {
                std::process::exit(130);
            }
            handle.cancel();
        });
    }
}
