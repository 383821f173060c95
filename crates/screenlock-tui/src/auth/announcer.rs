//! Screen reader announcements for terminal sessions
//!
//! Terminal screen readers follow the text written to the tty, and the
//! alternate screen is torn down on exit. Announcements are queued and the
//! binary prints them once the terminal has been restored.

use std::sync::Mutex;

use tracing::info;

use screenlock_core::Announcer;

/// Environment variable that marks a screen reader session
pub const SCREEN_READER_ENV: &str = "SCREENLOCK_SCREEN_READER";

/// Queues announcements for a terminal screen reader
#[derive(Debug, Default)]
pub struct TerminalAnnouncer {
    enabled: bool,
    pending: Mutex<Vec<String>>,
}

impl TerminalAnnouncer {
    /// Create an announcer; `configured` forces screen reader mode on
    pub fn new(configured: bool) -> Self {
        let from_env = std::env::var_os(SCREEN_READER_ENV)
            .map(|value| !value.is_empty() && value != "0")
            .unwrap_or(false);
        Self {
            enabled: configured || from_env,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Most recent announcement, if any
    pub fn latest(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|p| p.last().cloned())
    }

    /// Take all queued announcements
    pub fn drain(&self) -> Vec<String> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

impl Announcer for TerminalAnnouncer {
    fn is_screen_reader_running(&self) -> bool {
        self.enabled
    }

    fn announce(&self, text: &str) {
        info!("Announcement: {}", text);
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(text.to_string());
        }
    }
}
