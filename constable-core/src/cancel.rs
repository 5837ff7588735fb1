//! Cooperative cancellation for long-running analyses.
//!
//! Hosts hand the analyzer a [`CancellationToken`] and may trip it from
//! any thread. Rules check the token before every semantic query, so a
//! cancelled analysis aborts with [`ConstableError::Cancelled`] instead
//! of producing a partial report.

use crate::error::{ConstableError, ConstableResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between a host and its analyses.
///
/// Clones observe the same flag; cancelling any of them cancels all.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the active (not cancelled) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Reads the flag without turning it into an error.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Errors with [`ConstableError::Cancelled`] once the token trips.
    ///
    /// Call sites forward the error with `?` so cancellation propagates
    /// to the host unmasked.
    pub fn ensure_active(&self) -> ConstableResult<()> {
        if self.is_cancelled() {
            Err(ConstableError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_active() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.ensure_active().is_ok());
    }

    #[test]
    fn test_cancel_trips_all_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        let err = token.ensure_active().unwrap_err();
        assert!(err.is_cancellation());
    }
}
