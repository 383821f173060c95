//! Event handling for the TUI

use tokio::sync::mpsc;

use screenlock_core::AttemptCompletion;

/// Application events delivered to the UI loop
#[derive(Debug, Clone)]
pub enum Event {
    /// A platform evaluation finished
    AttemptComplete(AttemptCompletion),
}

/// Channel that carries background results back to the UI loop
pub struct EventHandler {
    /// Sender for events
    sender: mpsc::UnboundedSender<Event>,
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a clone of the sender for other tasks to send events
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    /// Receive the next event
    pub async fn recv(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
