//! Attempt outcomes and the view state derived from them

use std::fmt;

/// Identifies one authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(pub u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a single authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// The device owner was authenticated and the app has been unlocked
    Success,
    /// Evaluation ran and failed (cancel, mismatch, lockout, ...)
    Failure(String),
    /// No usable authentication method is configured on the device
    PolicyUnavailable(String),
}

impl AuthenticationOutcome {
    /// Check if the attempt unlocked the app
    pub fn is_success(&self) -> bool {
        matches!(self, AuthenticationOutcome::Success)
    }

    /// Message to show for a failed attempt
    pub fn reason(&self) -> Option<&str> {
        match self {
            AuthenticationOutcome::Success => None,
            AuthenticationOutcome::Failure(reason)
            | AuthenticationOutcome::PolicyUnavailable(reason) => Some(reason),
        }
    }
}

/// State rendered by the lock prompt view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptViewState {
    /// Whether an error message is shown
    pub has_error: bool,
    /// Whether the platform can evaluate device owner authentication
    pub can_retry: bool,
    /// Message shown when `has_error` is set
    pub error_text: String,
}

/// Where the prompt is in its per-attempt lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPhase {
    /// No attempt has been started yet
    #[default]
    Idle,
    /// Waiting for the platform to finish evaluating
    Evaluating,
    /// The lock state has been told to unlock
    Unlocked,
    /// The last attempt failed
    ErrorShown { can_retry: bool },
}

/// Actions the prompt offers after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptAction {
    /// Start another attempt
    Retry,
    /// Log out every user held behind the lock
    Logout,
}
