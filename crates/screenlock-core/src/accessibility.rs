//! Screen reader announcements

/// Posts announcements to assistive technology
pub trait Announcer: Send + Sync {
    /// Whether a screen reader is currently running
    fn is_screen_reader_running(&self) -> bool;

    /// Announce `text` as a screen change
    fn announce(&self, text: &str);
}

/// Announcer for hosts without assistive technology support
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn is_screen_reader_running(&self) -> bool {
        false
    }

    fn announce(&self, _text: &str) {}
}
