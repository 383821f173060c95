//! Authentication backends for the terminal lock prompt
//!
//! A terminal has no biometric hardware, so device owner authentication is
//! a passcode checked against an Argon2 PHC hash the operator provisions.
//! The prompt itself is drawn by the UI; the authenticator asks for it over
//! a channel and waits for the answer.

mod announcer;
mod lock_manager;
mod passcode;

pub use announcer::TerminalAnnouncer;
pub use lock_manager::{LockStatus, ScreenLockManager};
pub use passcode::{
    hash_passcode, PasscodeAuthenticator, PasscodeError, PasscodeRequest, MAX_PASSCODE_LENGTH,
    MIN_PASSCODE_LENGTH,
};
