//! Platform authentication seam
//!
//! The host OS owns the actual biometric/passcode check. Implementations of
//! [`DeviceAuthenticator`] wrap whatever the platform provides; the
//! controller only needs a capability probe and a single-shot evaluation.

use std::fmt;

use async_trait::async_trait;

/// Policy the platform is asked to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPolicy {
    /// Biometrics with passcode fallback
    DeviceOwnerAuthentication,
    /// Biometrics only, no passcode fallback
    BiometricsOnly,
}

/// Reason the platform gave for refusing or failing a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformErrorCode {
    /// No biometric identities are enrolled
    NotEnrolled,
    /// No device passcode is set
    PasscodeNotSet,
    /// Biometry is locked after too many failures
    BiometryLockout,
    /// The user dismissed the prompt
    UserCancel,
    /// Credentials were presented and did not match
    AuthenticationFailed,
    /// The system dismissed the prompt (another app, view torn down, ...)
    SystemCancel,
    /// Authentication is not available on this device
    Unavailable,
}

/// Error returned by the platform for a capability check or evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    /// Machine-readable reason
    pub code: PlatformErrorCode,
    /// Human-readable description, when the platform supplies one
    pub description: Option<String>,
}

impl PlatformError {
    /// Error without a description
    pub fn new(code: PlatformErrorCode) -> Self {
        Self {
            code,
            description: None,
        }
    }

    /// Error carrying the platform's description
    pub fn with_description(code: PlatformErrorCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: Some(description.into()),
        }
    }

    /// The platform's description as given, unless it is blank
    pub fn display_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_description() {
            Some(description) => write!(f, "{:?}: {}", self.code, description),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for PlatformError {}

/// Platform authentication capability
#[async_trait]
pub trait DeviceAuthenticator: Send + Sync {
    /// Check whether `policy` can be evaluated right now
    ///
    /// Fails when no usable method is configured (no passcode, nothing
    /// enrolled). Must not prompt the user.
    fn can_evaluate(&self, policy: AuthPolicy) -> Result<(), PlatformError>;

    /// Prompt the user and evaluate `policy`
    ///
    /// Resolves exactly once. `reason` is shown to the user by the platform
    /// prompt.
    async fn evaluate(&self, policy: AuthPolicy, reason: &str) -> Result<(), PlatformError>;
}
