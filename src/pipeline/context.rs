use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{field, info_span, warn, Span};
use uuid::Uuid;

/// Per-request context handed explicitly to every component of one pipeline run
#[derive(Debug)]
pub struct RequestContext {
    request_id: Uuid,
    received_at: Instant,
    span: Span,
    finished: AtomicBool,
}

impl RequestContext {
    pub fn new() -> Self {
        let request_id = Uuid::new_v4();
        let span = info_span!("pipeline", %request_id, bytes = field::Empty);
        Self {
            request_id,
            received_at: Instant::now(),
            span,
            finished: AtomicBool::new(false),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn elapsed(&self) -> Duration {
        self.received_at.elapsed()
    }

    pub fn record_bytes(&self, bytes: usize) {
        self.span.record("bytes", bytes);
    }

    /// Mark the run as having reached a terminal state
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        if !self.is_finished() {
            let _entered = self.span.enter();
            warn!(
                "Pipeline cancelled after {} ms, client went away",
                self.elapsed().as_millis()
            );
        }
    }
}
