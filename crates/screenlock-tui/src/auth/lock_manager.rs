//! In-process lock state for the terminal prompt

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::info;

use screenlock_core::LockState;

/// Lock status published to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStatus {
    /// The prompt is holding the session
    #[default]
    Locked,
    /// The device owner authenticated
    Unlocked,
    /// The locked users were logged out
    LoggedOut,
}

impl LockStatus {
    /// Whether the prompt has nothing left to do
    pub fn is_final(self) -> bool {
        !matches!(self, LockStatus::Locked)
    }
}

/// Lock manager shared between the prompt and the host
pub struct ScreenLockManager {
    /// Current status, observable through [`ScreenLockManager::subscribe`]
    status: watch::Sender<LockStatus>,
    /// Users held behind the lock
    locked_users: Mutex<Vec<String>>,
}

impl ScreenLockManager {
    /// Create a locked manager holding `users`
    pub fn new(users: Vec<String>) -> Self {
        let (status, _) = watch::channel(LockStatus::Locked);
        Self {
            status,
            locked_users: Mutex::new(users),
        }
    }

    /// Current status
    pub fn status(&self) -> LockStatus {
        *self.status.borrow()
    }

    /// Watch for status changes
    pub fn subscribe(&self) -> watch::Receiver<LockStatus> {
        self.status.subscribe()
    }

    /// Users still held behind the lock
    pub fn locked_users(&self) -> Vec<String> {
        self.locked_users
            .lock()
            .map(|users| users.clone())
            .unwrap_or_default()
    }
}

impl LockState for ScreenLockManager {
    fn unlock(&self) {
        info!("Screen lock released");
        self.status.send_replace(LockStatus::Unlocked);
    }

    fn logout_locked_users(&self) {
        let users = {
            let mut locked = self.locked_users.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *locked)
        };
        info!("Logging out {} locked user(s): {:?}", users.len(), users);
        self.status.send_replace(LockStatus::LoggedOut);
    }
}
