//! Application state and event handling

pub mod config;
mod events;

pub use config::{ConfigError, TuiConfig};
pub use events::{Event, EventHandler};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::StreamExt;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use screenlock_core::{
    AttemptStart, BundledStrings, LockPromptController, PromptAction, Result as LockResult,
};

use crate::auth::{
    LockStatus, PasscodeAuthenticator, PasscodeRequest, ScreenLockManager, TerminalAnnouncer,
    MAX_PASSCODE_LENGTH,
};
use crate::ui::{self, components::logo, Theme};

/// Application result type
pub type AppResult<T> = anyhow::Result<T>;

/// Interval between animation ticks
const TICK_RATE: Duration = Duration::from_millis(250);

/// Passcode prompt currently on screen
pub struct PasscodeEntry {
    /// Request to answer when the user submits or cancels
    request: PasscodeRequest,
    /// Characters typed so far
    pub input: Zeroizing<String>,
}

impl PasscodeEntry {
    /// Prompt text from the authenticator
    pub fn reason(&self) -> &str {
        self.request.reason()
    }
}

/// Main application struct
pub struct App {
    /// Lock prompt controller
    pub controller: LockPromptController,

    /// Colors derived from the view configuration
    pub theme: Theme,

    /// Icon lines drawn in the middle of the prompt
    pub icon: Vec<String>,

    /// Backdrop lines when the background is an image file
    pub backdrop: Option<Vec<String>>,

    /// Index of the focused action in `controller.offered_actions()`
    pub focus: usize,

    /// Active passcode prompt
    pub passcode: Option<PasscodeEntry>,

    /// Tick counter for animations
    pub tick: u64,

    /// Set when the user abandons the prompt (app stays locked)
    pub should_quit: bool,

    lock_manager: Arc<ScreenLockManager>,
    announcer: Arc<TerminalAnnouncer>,
    events: EventHandler,
    passcode_requests: mpsc::UnboundedReceiver<PasscodeRequest>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &TuiConfig, lock_manager: Arc<ScreenLockManager>) -> Self {
        let (authenticator, passcode_requests) =
            PasscodeAuthenticator::new(config.passcode_hash.clone());
        let announcer = Arc::new(TerminalAnnouncer::new(config.screen_reader));
        let strings = BundledStrings::new(config.app_display_name.clone())
            .with_overrides(config.strings.clone());

        let controller = LockPromptController::new(Arc::new(authenticator), lock_manager.clone())
            .with_localizer(Arc::new(strings))
            .with_announcer(announcer.clone());

        Self {
            controller,
            theme: Theme::from_view(&config.view),
            icon: logo::load_icon(&config.view.app_icon),
            backdrop: ui::load_backdrop(&config.view.background),
            focus: 0,
            passcode: None,
            tick: 0,
            should_quit: false,
            lock_manager,
            announcer,
            events: EventHandler::new(),
            passcode_requests,
        }
    }

    /// Current lock status
    pub fn lock_status(&self) -> LockStatus {
        self.lock_manager.status()
    }

    /// Latest screen reader announcement
    pub fn announcement(&self) -> Option<String> {
        self.announcer.latest()
    }

    /// Take queued screen reader announcements
    pub fn take_announcements(&self) -> Vec<String> {
        self.announcer.drain()
    }

    /// Whether the event loop should stop
    pub fn is_finished(&self) -> bool {
        self.should_quit || self.lock_status().is_final()
    }

    /// Run the application main loop until unlocked, logged out or abandoned
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<LockStatus> {
        let mut keys = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_RATE);

        self.appear();

        while !self.is_finished() {
            terminal.draw(|frame| ui::render(frame, self))?;

            tokio::select! {
                Some(event) = self.events.recv() => self.handle_event(event),
                Some(request) = self.passcode_requests.recv() => self.show_passcode_prompt(request),
                key = keys.next() => match key {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                _ = ticker.tick() => self.tick = self.tick.wrapping_add(1),
            }
        }

        // Let a pending evaluation see the prompt go away
        if let Some(entry) = self.passcode.take() {
            entry.request.cancel();
        }

        Ok(self.lock_status())
    }

    /// Wait for the next background event and apply it
    ///
    /// Waits until an attempt completes or a passcode request arrives. The
    /// `App` holds senders for both channels, so this stays pending when
    /// nothing is in flight; `false` is only returned after both channels
    /// close.
    pub async fn process_next_event(&mut self) -> bool {
        tokio::select! {
            Some(event) = self.events.recv() => {
                self.handle_event(event);
                true
            }
            Some(request) = self.passcode_requests.recv() => {
                self.show_passcode_prompt(request);
                true
            }
            else => false,
        }
    }

    /// The prompt became visible
    pub fn appear(&mut self) {
        let start = self.controller.begin_attempt();
        self.start_attempt(start);
    }

    /// Apply a background event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::AttemptComplete(completion) => {
                if let Err(e) = self.controller.complete_attempt(completion) {
                    warn!("{}", e);
                }
                self.focus = 0;
            }
        }
    }

    /// Handle key press events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.passcode.is_some() {
            self.handle_passcode_key(key.code);
        } else if self.controller.state().has_error {
            self.handle_error_key(key.code);
        }
    }

    fn handle_passcode_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                if let Some(entry) = self.passcode.take() {
                    entry.request.submit(entry.input);
                }
            }
            KeyCode::Esc => {
                if let Some(entry) = self.passcode.take() {
                    entry.request.cancel();
                }
            }
            KeyCode::Backspace => {
                if let Some(entry) = self.passcode.as_mut() {
                    entry.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(entry) = self.passcode.as_mut() {
                    if entry.input.chars().count() < MAX_PASSCODE_LENGTH {
                        entry.input.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_error_key(&mut self, key: KeyCode) {
        let actions = self.controller.offered_actions();
        match key {
            KeyCode::Tab | KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                if !actions.is_empty() {
                    self.focus = (self.focus + 1) % actions.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                if !actions.is_empty() {
                    self.focus = (self.focus + actions.len() - 1) % actions.len();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(action) = actions.get(self.focus).copied() {
                    self.perform(action);
                }
            }
            KeyCode::Char('r') if actions.contains(&PromptAction::Retry) => {
                self.perform(PromptAction::Retry);
            }
            KeyCode::Char('l') => self.perform(PromptAction::Logout),
            _ => {}
        }
    }

    fn perform(&mut self, action: PromptAction) {
        match action {
            PromptAction::Retry => {
                let start = self.controller.begin_retry();
                self.start_attempt(start);
            }
            PromptAction::Logout => self.controller.logout(),
        }
    }

    fn start_attempt(&mut self, start: LockResult<AttemptStart>) {
        self.focus = 0;
        match start {
            Ok(AttemptStart::Evaluate(request)) => {
                let sender = self.events.sender();
                tokio::spawn(async move {
                    let completion = request.evaluate().await;
                    // The UI loop may already be gone
                    let _ = sender.send(Event::AttemptComplete(completion));
                });
            }
            Ok(AttemptStart::Finished(outcome)) => {
                debug!(
                    "Attempt finished without evaluation: {}",
                    outcome.reason().unwrap_or("success")
                );
            }
            Err(e) => debug!("Attempt not started: {}", e),
        }
    }

    fn show_passcode_prompt(&mut self, request: PasscodeRequest) {
        if let Some(previous) = self.passcode.take() {
            previous.request.cancel();
        }
        self.passcode = Some(PasscodeEntry {
            request,
            input: Zeroizing::new(String::new()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_passcode;
    use ratatui::backend::TestBackend;
    use screenlock_core::{MessageKey, PromptPhase};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_passcode(app: &mut App, passcode: &str) {
        for c in passcode.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn app_with_passcode(passcode: Option<&str>) -> (App, Arc<ScreenLockManager>) {
        let config = TuiConfig {
            app_display_name: "Field Notes".to_string(),
            passcode_hash: passcode.map(|p| hash_passcode(p).unwrap()),
            screen_reader: true,
            ..TuiConfig::default()
        };
        let manager = Arc::new(ScreenLockManager::new(vec!["alice".to_string()]));
        (App::new(&config, manager.clone()), manager)
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|frame| ui::render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for row in buffer.content.chunks(width) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_correct_passcode_unlocks() {
        let (mut app, manager) = app_with_passcode(Some("2468"));

        app.appear();
        assert!(app.process_next_event().await);
        assert!(app.passcode.is_some());

        type_passcode(&mut app, "2468");
        assert!(app.process_next_event().await);

        assert_eq!(manager.status(), LockStatus::Unlocked);
        assert_eq!(app.controller.phase(), PromptPhase::Unlocked);
        assert!(app.is_finished());
    }

    #[tokio::test]
    async fn test_wrong_passcode_offers_retry() {
        let (mut app, manager) = app_with_passcode(Some("2468"));

        app.appear();
        app.process_next_event().await;
        type_passcode(&mut app, "1111");
        app.process_next_event().await;

        assert_eq!(manager.status(), LockStatus::Locked);
        assert_eq!(app.controller.state().error_text, "Passcode not recognized.");
        assert_eq!(
            app.controller.offered_actions(),
            vec![PromptAction::Retry, PromptAction::Logout]
        );

        let screen = screen_text(&mut app);
        assert!(screen.contains("Passcode not recognized."));
        assert!(screen.contains("Retry"));
        assert!(screen.contains("Log Out"));

        app.handle_key(key(KeyCode::Char('r')));
        assert!(!app.controller.state().has_error);
        app.process_next_event().await;
        type_passcode(&mut app, "2468");
        app.process_next_event().await;

        assert_eq!(manager.status(), LockStatus::Unlocked);
    }

    #[tokio::test]
    async fn test_escape_cancels_prompt() {
        let (mut app, _) = app_with_passcode(Some("2468"));

        app.appear();
        app.process_next_event().await;
        app.handle_key(key(KeyCode::Esc));
        app.process_next_event().await;

        assert!(app.passcode.is_none());
        assert_eq!(app.controller.state().error_text, "Authentication canceled.");
        assert!(app.controller.state().can_retry);
    }

    #[tokio::test]
    async fn test_next_event_waits_while_idle() {
        let (mut app, _) = app_with_passcode(Some("2468"));

        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            app.process_next_event(),
        )
        .await;
        assert!(waited.is_err());

        app.appear();
        assert!(app.process_next_event().await);
        assert!(app.passcode.is_some());
    }

    #[tokio::test]
    async fn test_missing_passcode_only_offers_logout() {
        let (mut app, manager) = app_with_passcode(None);

        app.appear();

        let state = app.controller.state();
        assert!(state.has_error);
        assert!(!state.can_retry);
        assert!(state.error_text.contains("Field Notes"));

        let screen = screen_text(&mut app);
        assert!(!screen.contains("Retry"));

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.controller.attempt_count(), 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(manager.status(), LockStatus::LoggedOut);
        assert_eq!(
            app.announcement().as_deref(),
            Some(MessageKey::AccessibilityLoggedOutAnnouncement.default_text())
        );
    }

    #[tokio::test]
    async fn test_focus_cycles_through_actions() {
        let (mut app, manager) = app_with_passcode(Some("2468"));

        app.appear();
        app.process_next_event().await;
        app.handle_key(key(KeyCode::Esc));
        app.process_next_event().await;

        assert_eq!(app.focus, 0);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, 1);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, 0);
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(manager.status(), LockStatus::LoggedOut);
    }

    #[test]
    fn test_ctrl_c_abandons_without_unlocking() {
        let (mut app, manager) = app_with_passcode(None);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert!(app.is_finished());
        assert_eq!(manager.status(), LockStatus::Locked);
    }
}
