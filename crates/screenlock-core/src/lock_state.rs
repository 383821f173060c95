//! Global lock status owned by the host application

/// App-wide authentication gate
///
/// Injected into the controller instead of being reached as a global, so
/// hosts and tests can supply their own. Both calls are fire-and-forget.
pub trait LockState: Send + Sync {
    /// Release the lock and resume the app
    fn unlock(&self);

    /// Log out every user currently held behind the lock
    fn logout_locked_users(&self);
}
