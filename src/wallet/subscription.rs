//! Cancellable account-change subscription.

use tokio::task::JoinHandle;

/// Handle to a running account-change listener.
///
/// Disposing (or dropping) the handle aborts the listener task, which drops
/// the provider stream and unsubscribes.
pub struct Subscription {
    id: u64,
    task_handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, task_handle: JoinHandle<()>) -> Self {
        Self {
            id,
            task_handle: Some(task_handle),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the listener is still running.
    pub fn is_active(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stop listening.
    pub fn dispose(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            tracing::debug!(subscription = self.id, "Disposing account-change subscription");
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.abort();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
