//! Passcode authentication with Argon2 hashes

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use screenlock_core::{AuthPolicy, DeviceAuthenticator, PlatformError, PlatformErrorCode};

/// Minimum passcode length
pub const MIN_PASSCODE_LENGTH: usize = 4;
/// Maximum passcode length
pub const MAX_PASSCODE_LENGTH: usize = 64;

/// Passcode provisioning errors
#[derive(Debug, thiserror::Error)]
pub enum PasscodeError {
    #[error("Passcode must be between {0} and {1} characters")]
    InvalidLength(usize, usize),

    #[error("Failed to hash passcode: {0}")]
    Hash(String),
}

/// Hash a passcode for the `passcode_hash` config entry
pub fn hash_passcode(passcode: &str) -> Result<String, PasscodeError> {
    let len = passcode.chars().count();
    if !(MIN_PASSCODE_LENGTH..=MAX_PASSCODE_LENGTH).contains(&len) {
        return Err(PasscodeError::InvalidLength(
            MIN_PASSCODE_LENGTH,
            MAX_PASSCODE_LENGTH,
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let passcode_bytes = Zeroizing::new(passcode.as_bytes().to_vec());

    Argon2::default()
        .hash_password(&passcode_bytes, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasscodeError::Hash(e.to_string()))
}

/// Request for the UI to collect a passcode
pub struct PasscodeRequest {
    reason: String,
    reply: oneshot::Sender<Option<Zeroizing<String>>>,
}

impl PasscodeRequest {
    /// Prompt text to show above the passcode field
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Hand the entered passcode to the authenticator
    pub fn submit(self, passcode: Zeroizing<String>) {
        // The authenticator may have gone away with the view
        let _ = self.reply.send(Some(passcode));
    }

    /// Report that the user dismissed the prompt
    pub fn cancel(self) {
        let _ = self.reply.send(None);
    }
}

impl std::fmt::Debug for PasscodeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasscodeRequest")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Device owner authentication backed by a provisioned passcode hash
pub struct PasscodeAuthenticator {
    /// Argon2 PHC string, if a passcode has been provisioned
    passcode_hash: Option<String>,
    /// Channel to the UI that draws the passcode prompt
    requests: mpsc::UnboundedSender<PasscodeRequest>,
}

impl PasscodeAuthenticator {
    /// Create an authenticator and the receiver the UI listens on
    pub fn new(
        passcode_hash: Option<String>,
    ) -> (Self, mpsc::UnboundedReceiver<PasscodeRequest>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        let authenticator = Self {
            passcode_hash: passcode_hash.filter(|hash| !hash.trim().is_empty()),
            requests,
        };
        (authenticator, receiver)
    }

    /// Provisioned hash, if it parses
    fn usable_hash(&self) -> Result<&str, PlatformError> {
        let hash = self.passcode_hash.as_deref().ok_or_else(|| {
            PlatformError::with_description(
                PlatformErrorCode::PasscodeNotSet,
                "A device passcode has not been set.",
            )
        })?;

        if let Err(e) = PasswordHash::new(hash) {
            warn!("Configured passcode hash is invalid: {}", e);
            return Err(PlatformError::with_description(
                PlatformErrorCode::PasscodeNotSet,
                "The configured passcode is not valid.",
            ));
        }

        Ok(hash)
    }
}

/// Constant-time check of `passcode` against a PHC hash
fn verify_passcode(passcode_hash: &str, passcode: &str) -> Result<(), PlatformError> {
    let parsed = PasswordHash::new(passcode_hash).map_err(|e| {
        PlatformError::with_description(PlatformErrorCode::PasscodeNotSet, e.to_string())
    })?;

    Argon2::default()
        .verify_password(passcode.as_bytes(), &parsed)
        .map_err(|_| {
            PlatformError::with_description(
                PlatformErrorCode::AuthenticationFailed,
                "Passcode not recognized.",
            )
        })
}

#[async_trait]
impl DeviceAuthenticator for PasscodeAuthenticator {
    fn can_evaluate(&self, policy: AuthPolicy) -> Result<(), PlatformError> {
        match policy {
            AuthPolicy::BiometricsOnly => Err(PlatformError::with_description(
                PlatformErrorCode::NotEnrolled,
                "No biometric identities are enrolled.",
            )),
            AuthPolicy::DeviceOwnerAuthentication => self.usable_hash().map(|_| ()),
        }
    }

    async fn evaluate(&self, policy: AuthPolicy, reason: &str) -> Result<(), PlatformError> {
        self.can_evaluate(policy)?;
        let passcode_hash = self.usable_hash()?.to_string();

        let (reply, answer) = oneshot::channel();
        let request = PasscodeRequest {
            reason: reason.to_string(),
            reply,
        };
        self.requests.send(request).map_err(|_| {
            PlatformError::with_description(
                PlatformErrorCode::SystemCancel,
                "The passcode prompt is not available.",
            )
        })?;

        let passcode = match answer.await {
            Ok(Some(passcode)) => passcode,
            Ok(None) => {
                debug!("Passcode prompt canceled by user");
                return Err(PlatformError::with_description(
                    PlatformErrorCode::UserCancel,
                    "Authentication canceled.",
                ));
            }
            Err(_) => {
                return Err(PlatformError::with_description(
                    PlatformErrorCode::SystemCancel,
                    "Authentication was dismissed.",
                ))
            }
        };

        // Argon2 verification blocks; run it off the UI thread
        tokio::task::spawn_blocking(move || verify_passcode(&passcode_hash, &passcode))
            .await
            .map_err(|e| {
                PlatformError::with_description(PlatformErrorCode::SystemCancel, e.to_string())
            })?
    }
}
