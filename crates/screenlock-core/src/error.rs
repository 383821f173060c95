//! Error types for the lock prompt

use thiserror::Error;

use crate::outcome::AttemptId;

/// Result type alias for lock prompt operations
pub type Result<T> = std::result::Result<T, LockError>;

/// Errors raised by the controller itself.
///
/// Authentication failures are not errors here; they are reported as an
/// [`AuthenticationOutcome`](crate::AuthenticationOutcome) and shown in the view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    /// An attempt is already being evaluated
    #[error("Authentication attempt {0} is still in progress")]
    AttemptInFlight(AttemptId),

    /// Retry requested while no retryable error is shown
    #[error("Retry is not available in the current state")]
    RetryUnavailable,

    /// Completion arrived for an attempt that is no longer current
    #[error("Completion for stale attempt {0}")]
    StaleAttempt(AttemptId),
}
