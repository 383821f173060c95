//! Screenlock Core - device-authentication retry gate
//!
//! This crate drives the "app is locked" prompt: it asks the platform to
//! authenticate the device owner, reports the outcome as view state, and
//! tells the injected [`LockState`] to unlock or to log the locked users out.
//!
//! Everything that touches the outside world sits behind a trait:
//! - [`DeviceAuthenticator`] - platform capability check and evaluation
//! - [`LockState`] - global lock/unlock status owned by the host app
//! - [`Localizer`] - display text lookup
//! - [`Announcer`] - screen reader announcements

pub mod accessibility;
pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod localization;
pub mod lock_state;
pub mod outcome;
pub mod platform;

pub use accessibility::{Announcer, SilentAnnouncer};
pub use config::{AppIcon, Background, Rgb, ScreenLockViewConfiguration};
pub use controller::{AttemptCompletion, AttemptStart, EvaluationRequest, LockPromptController};
pub use error::{LockError, Result};
pub use layout::{icon_offset, CAN_LOGOUT};
pub use localization::{BundledStrings, Localizer, MessageKey};
pub use lock_state::LockState;
pub use outcome::{AttemptId, AuthenticationOutcome, PromptAction, PromptPhase, PromptViewState};
pub use platform::{AuthPolicy, DeviceAuthenticator, PlatformError, PlatformErrorCode};
