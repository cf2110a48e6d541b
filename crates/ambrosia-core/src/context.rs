//! Per-call query context: correlation, cancellation and deadline
//!
//! Every store call receives a `QueryContext`. The store checks it at each
//! suspension point (connection acquisition, statement start, each row) and
//! aborts with a cancellation error once it is cancelled or past its deadline.

use crate::errors::{AmError, AmbrosiaError, Result};
use ambrosia_core_types::RequestContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag
///
/// Clones observe the same flag; cancelling any clone cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context passed into every catalog and store call
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    request: RequestContext,
    cancel: CancelToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// Fresh request, never cancelled, no deadline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }

    /// Share an existing cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// True once cancelled or past the deadline
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// The cancellation cause, if the context is done
    pub fn cause(&self) -> Option<AmbrosiaError> {
        if self.cancel.is_cancelled() {
            Some(AmbrosiaError::Cancelled)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(AmbrosiaError::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Fail with `Cancelled` / `DeadlineExceeded` if the context is done
    ///
    /// # Errors
    ///
    /// A cancellation-class `AmError` tagged with `op` and this request's id.
    pub fn check(&self, op: &str) -> Result<()> {
        match self.cause() {
            None => Ok(()),
            Some(cause) => Err(self.cancellation_error(cause, op)),
        }
    }

    /// Build the error for a cancellation cause observed during `op`
    pub fn cancellation_error(&self, cause: AmbrosiaError, op: &str) -> AmError {
        AmError::from(cause)
            .with_op(op)
            .with_request(&self.request)
    }

    /// A `'static` probe for use inside store callbacks (e.g. progress handlers)
    pub fn probe(&self) -> impl Fn() -> bool + Send + 'static {
        let cancel = self.cancel.clone();
        let deadline = self.deadline;
        move || cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AmErrorKind;

    #[test]
    fn test_fresh_context_passes_check() {
        let ctx = QueryContext::new();
        assert!(!ctx.is_done());
        assert!(ctx.check("fetch_ingredients").is_ok());
    }

    #[test]
    fn test_cancel_via_shared_token() {
        let token = CancelToken::new();
        let ctx = QueryContext::new().with_cancel_token(token.clone());
        let probe = ctx.probe();

        token.cancel();

        assert!(ctx.is_done());
        assert!(probe());
        let err = ctx.check("fetch_recipe_headers").unwrap_err();
        assert_eq!(err.kind(), AmErrorKind::Cancelled);
        assert_eq!(err.op(), Some("fetch_recipe_headers"));
        assert_eq!(err.request_id(), Some(&ctx.request().request_id));
    }

    #[test]
    fn test_elapsed_deadline() {
        let ctx = QueryContext::new().with_deadline(Instant::now());

        let err = ctx.check("fetch_users").unwrap_err();
        assert_eq!(err.kind(), AmErrorKind::DeadlineExceeded);
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_cancel_wins_over_deadline() {
        let ctx = QueryContext::new().with_deadline(Instant::now());
        ctx.cancel();
        assert_eq!(ctx.cause(), Some(AmbrosiaError::Cancelled));
    }

    #[test]
    fn test_generous_timeout_not_done() {
        let ctx = QueryContext::new().with_timeout(Duration::from_secs(3600));
        assert!(!ctx.is_done());
    }
}
