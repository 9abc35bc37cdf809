//! Logging middleware
//!
//! This module tracks each inbound event from arrival to reply and logs its
//! outcome and latency. It only observes; it never changes how an event is
//! handled.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn, error, Span};
use crate::utils::errors::{ErrorSeverity, VocabError};

/// Events slower than this are reported as slow
const SLOW_EVENT_THRESHOLD: Duration = Duration::from_millis(1000);

/// Tracks one event through the dispatcher
pub struct EventTracker {
    user_id: i64,
    kind: &'static str,
    start_time: Instant,
    span: Span,
}

impl EventTracker {
    pub fn start(user_id: i64, kind: &'static str) -> Self {
        let span = tracing::info_span!("event", user_id = user_id, kind = kind);
        span.in_scope(|| debug!("Event received"));

        Self {
            user_id,
            kind,
            start_time: Instant::now(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a successfully handled event
    pub fn succeeded(&self) {
        let duration_ms = self.elapsed().as_millis() as u64;
        let _entered = self.span.enter();

        info!(
            user_id = self.user_id,
            kind = self.kind,
            duration_ms = duration_ms,
            "Event handled"
        );

        if self.elapsed() > SLOW_EVENT_THRESHOLD {
            warn!(
                user_id = self.user_id,
                kind = self.kind,
                duration_ms = duration_ms,
                "Slow event detected"
            );
        }
    }

    /// Log an event whose flow ended with an error
    pub fn failed(&self, err: &VocabError) {
        let duration_ms = self.elapsed().as_millis() as u64;
        let severity = err.severity();
        let _entered = self.span.enter();

        match severity {
            ErrorSeverity::Info => info!(
                user_id = self.user_id,
                kind = self.kind,
                duration_ms = duration_ms,
                error = %err,
                "Event rejected"
            ),
            ErrorSeverity::Warning => warn!(
                user_id = self.user_id,
                kind = self.kind,
                duration_ms = duration_ms,
                error = %err,
                "Event failed"
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => error!(
                user_id = self.user_id,
                kind = self.kind,
                duration_ms = duration_ms,
                severity = %severity,
                error = %err,
                "Event failed"
            ),
        }
    }
}
