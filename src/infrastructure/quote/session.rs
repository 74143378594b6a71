use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use uuid::Uuid;

/// Counts open quote sessions and remembers the high-water mark.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    inner: Arc<TrackerState>,
}

#[derive(Debug, Default)]
struct TrackerState {
    open: AtomicUsize,
    peak: AtomicUsize,
    opened_total: AtomicUsize,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session. It is released when the returned guard drops, on
    /// every exit path.
    pub fn open(&self, service: &'static str) -> SessionGuard {
        let open = self.inner.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(open, Ordering::SeqCst);
        self.inner.opened_total.fetch_add(1, Ordering::SeqCst);

        let id = Uuid::new_v4();
        debug!("Session {} [{}] acquired ({} open)", id, service, open);
        SessionGuard {
            id,
            service,
            tracker: self.clone(),
        }
    }

    pub fn open_sessions(&self) -> usize {
        self.inner.open.load(Ordering::SeqCst)
    }

    pub fn peak_sessions(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    pub fn total_sessions(&self) -> usize {
        self.inner.opened_total.load(Ordering::SeqCst)
    }
}

/// Scoped ownership of one quote session.
#[derive(Debug)]
pub struct SessionGuard {
    id: Uuid,
    service: &'static str,
    tracker: SessionTracker,
}

impl SessionGuard {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let remaining = self.tracker.inner.open.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(
            "Session {} [{}] released ({} open)",
            self.id, self.service, remaining
        );
    }
}
