use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Optional cap on concurrently handled connections.
///
/// Unbounded by default. When bounded, the accept loop waits for a free slot
/// before handing the next socket to a connection task.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLimiter {
    permits: Option<Arc<Semaphore>>,
}

impl ConnectionLimiter {
    pub fn unbounded() -> Self {
        Self { permits: None }
    }

    pub fn bounded(max_connections: usize) -> Self {
        Self {
            permits: Some(Arc::new(Semaphore::new(max_connections.max(1)))),
        }
    }

    pub fn from_option(max_connections: Option<usize>) -> Self {
        max_connections.map_or_else(Self::unbounded, Self::bounded)
    }

    /// Free slots, or `None` when unbounded.
    pub fn available(&self) -> Option<usize> {
        self.permits.as_ref().map(|s| s.available_permits())
    }

    /// Wait for a slot. The returned permit is held for the connection's
    /// lifetime; `None` means no limit applies.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.permits {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}
