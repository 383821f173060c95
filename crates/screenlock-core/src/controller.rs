//! Lock prompt controller
//!
//! Drives one authentication attempt at a time and turns its result into
//! [`PromptViewState`]. The evaluation itself is handed out as an
//! [`EvaluationRequest`] so the caller decides where it runs; its
//! [`AttemptCompletion`] must be applied back on the context that owns the
//! controller (the UI loop). That context is the only place state changes.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::accessibility::{Announcer, SilentAnnouncer};
use crate::error::{LockError, Result};
use crate::layout::CAN_LOGOUT;
use crate::localization::{BundledStrings, Localizer, MessageKey};
use crate::lock_state::LockState;
use crate::outcome::{
    AttemptId, AuthenticationOutcome, PromptAction, PromptPhase, PromptViewState,
};
use crate::platform::{AuthPolicy, DeviceAuthenticator, PlatformError};

/// Policy every attempt asks the platform for
const ATTEMPT_POLICY: AuthPolicy = AuthPolicy::DeviceOwnerAuthentication;

/// What happened when an attempt was started
#[derive(Debug)]
pub enum AttemptStart {
    /// The platform can evaluate; run the request and report back
    Evaluate(EvaluationRequest),
    /// The attempt ended without evaluation
    Finished(AuthenticationOutcome),
}

/// A pending platform evaluation
///
/// Resolves exactly once into an [`AttemptCompletion`].
pub struct EvaluationRequest {
    id: AttemptId,
    policy: AuthPolicy,
    reason: String,
    authenticator: Arc<dyn DeviceAuthenticator>,
}

impl EvaluationRequest {
    /// Attempt this request belongs to
    pub fn id(&self) -> AttemptId {
        self.id
    }

    /// Prompt text shown by the platform
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Run the platform evaluation
    pub async fn evaluate(self) -> AttemptCompletion {
        let result = self.authenticator.evaluate(self.policy, &self.reason).await;
        AttemptCompletion {
            id: self.id,
            result,
        }
    }
}

impl fmt::Debug for EvaluationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationRequest")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

/// Result of a finished evaluation, to be applied on the UI context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptCompletion {
    pub id: AttemptId,
    pub result: std::result::Result<(), PlatformError>,
}

/// Controller behind the lock prompt view
pub struct LockPromptController {
    authenticator: Arc<dyn DeviceAuthenticator>,
    lock_state: Arc<dyn LockState>,
    localizer: Arc<dyn Localizer>,
    announcer: Arc<dyn Announcer>,
    state: PromptViewState,
    phase: PromptPhase,
    in_flight: Option<AttemptId>,
    attempts: u64,
}

impl LockPromptController {
    /// Create a controller with built-in strings and no screen reader
    pub fn new(
        authenticator: Arc<dyn DeviceAuthenticator>,
        lock_state: Arc<dyn LockState>,
    ) -> Self {
        Self {
            authenticator,
            lock_state,
            localizer: Arc::new(BundledStrings::default()),
            announcer: Arc::new(SilentAnnouncer),
            state: PromptViewState::default(),
            phase: PromptPhase::Idle,
            in_flight: None,
            attempts: 0,
        }
    }

    /// Use a different text source
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Use a different announcer
    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    /// Current view state
    pub fn state(&self) -> &PromptViewState {
        &self.state
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> PromptPhase {
        self.phase
    }

    /// Number of attempts started so far
    pub fn attempt_count(&self) -> u64 {
        self.attempts
    }

    /// Text source used for labels
    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Actions to offer alongside the current error
    pub fn offered_actions(&self) -> Vec<PromptAction> {
        if !self.state.has_error {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(2);
        if self.state.can_retry {
            actions.push(PromptAction::Retry);
        }
        if CAN_LOGOUT {
            actions.push(PromptAction::Logout);
        }
        actions
    }

    /// Start an attempt (view appeared)
    ///
    /// Clears any shown error, then probes the platform. When device owner
    /// authentication is unavailable the attempt finishes immediately with
    /// [`AuthenticationOutcome::PolicyUnavailable`].
    pub fn begin_attempt(&mut self) -> Result<AttemptStart> {
        if let Some(id) = self.in_flight {
            return Err(LockError::AttemptInFlight(id));
        }

        self.attempts += 1;
        let id = AttemptId(self.attempts);
        self.state.has_error = false;
        self.state.error_text.clear();

        if let Err(err) = self.authenticator.can_evaluate(ATTEMPT_POLICY) {
            debug!("Attempt {} cannot evaluate: {}", id, err);
            let reason = self.localizer.set_up_passcode_message();
            self.show_error(reason.clone(), false);
            return Ok(AttemptStart::Finished(
                AuthenticationOutcome::PolicyUnavailable(reason),
            ));
        }

        debug!("Attempt {} evaluating", id);
        self.state.can_retry = true;
        self.phase = PromptPhase::Evaluating;
        self.in_flight = Some(id);

        Ok(AttemptStart::Evaluate(EvaluationRequest {
            id,
            policy: ATTEMPT_POLICY,
            reason: self.localizer.text(MessageKey::BiometricReason),
            authenticator: Arc::clone(&self.authenticator),
        }))
    }

    /// Start another attempt from a retryable error (retry tapped)
    pub fn begin_retry(&mut self) -> Result<AttemptStart> {
        match self.phase {
            PromptPhase::ErrorShown { can_retry: true } => self.begin_attempt(),
            _ => Err(LockError::RetryUnavailable),
        }
    }

    /// Apply a finished evaluation
    pub fn complete_attempt(
        &mut self,
        completion: AttemptCompletion,
    ) -> Result<AuthenticationOutcome> {
        if self.in_flight != Some(completion.id) {
            warn!("Ignoring completion for stale attempt {}", completion.id);
            return Err(LockError::StaleAttempt(completion.id));
        }
        self.in_flight = None;

        match completion.result {
            Ok(()) => {
                info!("Attempt {} authenticated, unlocking", completion.id);
                self.phase = PromptPhase::Unlocked;
                self.lock_state.unlock();
                Ok(AuthenticationOutcome::Success)
            }
            Err(err) => {
                warn!("Attempt {} failed: {}", completion.id, err);
                let reason = err
                    .display_description()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.localizer.text(MessageKey::FallbackErrorMessage));
                self.show_error(reason.clone(), true);
                Ok(AuthenticationOutcome::Failure(reason))
            }
        }
    }

    /// Run a whole attempt inline
    pub async fn attempt_unlock(&mut self) -> Result<AuthenticationOutcome> {
        let start = self.begin_attempt()?;
        self.drive(start).await
    }

    /// Run a whole retry inline
    pub async fn retry_unlock(&mut self) -> Result<AuthenticationOutcome> {
        let start = self.begin_retry()?;
        self.drive(start).await
    }

    /// Log out the locked users (always available)
    pub fn logout(&mut self) {
        info!("Logging out locked users");
        if let Some(id) = self.in_flight.take() {
            debug!("Discarding attempt {} on logout", id);
            self.phase = PromptPhase::Idle;
        }
        self.lock_state.logout_locked_users();

        if self.announcer.is_screen_reader_running() {
            self.announcer
                .announce(&self.localizer.text(MessageKey::AccessibilityLoggedOutAnnouncement));
        }
    }

    async fn drive(&mut self, start: AttemptStart) -> Result<AuthenticationOutcome> {
        match start {
            AttemptStart::Finished(outcome) => Ok(outcome),
            AttemptStart::Evaluate(request) => {
                let completion = request.evaluate().await;
                self.complete_attempt(completion)
            }
        }
    }

    fn show_error(&mut self, text: String, can_retry: bool) {
        self.state = PromptViewState {
            has_error: true,
            can_retry,
            error_text: text,
        };
        self.phase = PromptPhase::ErrorShown { can_retry };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformErrorCode;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Authenticator returning scripted results
    struct ScriptedAuthenticator {
        capability: Mutex<std::result::Result<(), PlatformError>>,
        results: Mutex<VecDeque<std::result::Result<(), PlatformError>>>,
        evaluations: AtomicUsize,
        last_reason: Mutex<Option<String>>,
    }

    impl ScriptedAuthenticator {
        fn available(results: Vec<std::result::Result<(), PlatformError>>) -> Arc<Self> {
            Arc::new(Self {
                capability: Mutex::new(Ok(())),
                results: Mutex::new(results.into()),
                evaluations: AtomicUsize::new(0),
                last_reason: Mutex::new(None),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                capability: Mutex::new(Err(PlatformError::new(PlatformErrorCode::PasscodeNotSet))),
                results: Mutex::new(VecDeque::new()),
                evaluations: AtomicUsize::new(0),
                last_reason: Mutex::new(None),
            })
        }

        fn set_capability(&self, capability: std::result::Result<(), PlatformError>) {
            *self.capability.lock().unwrap() = capability;
        }

        fn evaluations(&self) -> usize {
            self.evaluations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DeviceAuthenticator for ScriptedAuthenticator {
        fn can_evaluate(&self, _policy: AuthPolicy) -> std::result::Result<(), PlatformError> {
            self.capability.lock().unwrap().clone()
        }

        async fn evaluate(
            &self,
            _policy: AuthPolicy,
            reason: &str,
        ) -> std::result::Result<(), PlatformError> {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            *self.last_reason.lock().unwrap() = Some(reason.to_string());
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PlatformError::new(PlatformErrorCode::SystemCancel)))
        }
    }

    #[derive(Default)]
    struct CountingLockState {
        unlocks: AtomicUsize,
        logouts: AtomicUsize,
    }

    impl LockState for CountingLockState {
        fn unlock(&self) {
            self.unlocks.fetch_add(1, Ordering::SeqCst);
        }

        fn logout_locked_users(&self) {
            self.logouts.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct RecordingAnnouncer {
        running: bool,
        announced: Mutex<Vec<String>>,
    }

    impl Announcer for RecordingAnnouncer {
        fn is_screen_reader_running(&self) -> bool {
            self.running
        }

        fn announce(&self, text: &str) {
            self.announced.lock().unwrap().push(text.to_string());
        }
    }

    fn new_controller(
        authenticator: Arc<ScriptedAuthenticator>,
    ) -> (LockPromptController, Arc<CountingLockState>) {
        let lock_state = Arc::new(CountingLockState::default());
        let controller = LockPromptController::new(authenticator, lock_state.clone())
            .with_localizer(Arc::new(BundledStrings::new("Acme Field")));
        (controller, lock_state)
    }

    fn failure(description: Option<&str>) -> std::result::Result<(), PlatformError> {
        Err(PlatformError {
            code: PlatformErrorCode::AuthenticationFailed,
            description: description.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_unavailable_policy_blocks_retry() {
        let authenticator = ScriptedAuthenticator::unavailable();
        let (mut controller, lock_state) = new_controller(authenticator.clone());

        let outcome = controller.attempt_unlock().await.unwrap();

        assert!(matches!(outcome, AuthenticationOutcome::PolicyUnavailable(_)));
        let state = controller.state();
        assert!(state.has_error);
        assert!(!state.can_retry);
        assert!(state.error_text.contains("Acme Field"));
        assert_eq!(authenticator.evaluations(), 0);
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 0);
        assert_eq!(controller.offered_actions(), vec![PromptAction::Logout]);
        assert_eq!(controller.phase(), PromptPhase::ErrorShown { can_retry: false });
    }

    #[tokio::test]
    async fn test_success_unlocks_once() {
        let authenticator = ScriptedAuthenticator::available(vec![Ok(())]);
        let (mut controller, lock_state) = new_controller(authenticator.clone());

        let outcome = controller.attempt_unlock().await.unwrap();

        assert_eq!(outcome, AuthenticationOutcome::Success);
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 1);
        assert!(!controller.state().has_error);
        assert_eq!(controller.phase(), PromptPhase::Unlocked);
        assert!(controller.offered_actions().is_empty());
        assert_eq!(
            authenticator.last_reason.lock().unwrap().as_deref(),
            Some(MessageKey::BiometricReason.default_text())
        );
    }

    #[tokio::test]
    async fn test_failure_shows_platform_message() {
        let authenticator =
            ScriptedAuthenticator::available(vec![failure(Some("Too many attempts"))]);
        let (mut controller, lock_state) = new_controller(authenticator);

        let outcome = controller.attempt_unlock().await.unwrap();

        assert_eq!(outcome, AuthenticationOutcome::Failure("Too many attempts".to_string()));
        let state = controller.state();
        assert!(state.has_error);
        assert!(state.can_retry);
        assert_eq!(state.error_text, "Too many attempts");
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.offered_actions(),
            vec![PromptAction::Retry, PromptAction::Logout]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_platform_message_verbatim() {
        let authenticator = ScriptedAuthenticator::available(vec![Err(
            PlatformError::with_description(
                PlatformErrorCode::BiometryLockout,
                "Too many attempts.\n",
            ),
        )]);
        let (mut controller, _) = new_controller(authenticator);

        let outcome = controller.attempt_unlock().await.unwrap();

        assert_eq!(outcome.reason(), Some("Too many attempts.\n"));
        assert_eq!(controller.state().error_text, "Too many attempts.\n");
    }

    #[tokio::test]
    async fn test_failure_without_description_uses_fallback() {
        let authenticator =
            ScriptedAuthenticator::available(vec![failure(None), failure(Some(""))]);
        let (mut controller, _) = new_controller(authenticator);

        controller.attempt_unlock().await.unwrap();
        assert_eq!(
            controller.state().error_text,
            MessageKey::FallbackErrorMessage.default_text()
        );

        controller.retry_unlock().await.unwrap();
        assert_eq!(
            controller.state().error_text,
            MessageKey::FallbackErrorMessage.default_text()
        );
    }

    #[tokio::test]
    async fn test_new_attempt_clears_stale_error() {
        let authenticator =
            ScriptedAuthenticator::available(vec![failure(Some("Not recognized")), Ok(())]);
        let (mut controller, lock_state) = new_controller(authenticator);

        controller.attempt_unlock().await.unwrap();
        assert!(controller.state().has_error);

        let start = controller.begin_retry().unwrap();
        assert!(!controller.state().has_error);
        assert_eq!(controller.phase(), PromptPhase::Evaluating);

        let AttemptStart::Evaluate(request) = start else {
            panic!("expected evaluation");
        };
        let outcome = controller.complete_attempt(request.evaluate().await).unwrap();

        assert!(outcome.is_success());
        assert!(!controller.state().has_error);
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 1);
        assert_eq!(controller.attempt_count(), 2);
    }

    #[tokio::test]
    async fn test_retry_requires_retryable_error() {
        let authenticator = ScriptedAuthenticator::unavailable();
        let (mut controller, _) = new_controller(authenticator.clone());

        assert_eq!(controller.begin_retry().unwrap_err(), LockError::RetryUnavailable);

        controller.attempt_unlock().await.unwrap();
        assert_eq!(controller.retry_unlock().await.unwrap_err(), LockError::RetryUnavailable);

        // Appearing again re-probes the platform
        authenticator.set_capability(Ok(()));
        assert!(matches!(
            controller.begin_attempt().unwrap(),
            AttemptStart::Evaluate(_)
        ));
    }

    #[tokio::test]
    async fn test_no_overlapping_attempts() {
        let authenticator = ScriptedAuthenticator::available(vec![Ok(())]);
        let (mut controller, _) = new_controller(authenticator);

        let AttemptStart::Evaluate(request) = controller.begin_attempt().unwrap() else {
            panic!("expected evaluation");
        };
        assert_eq!(
            controller.begin_attempt().unwrap_err(),
            LockError::AttemptInFlight(request.id())
        );

        controller.complete_attempt(request.evaluate().await).unwrap();
        assert_eq!(controller.phase(), PromptPhase::Unlocked);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let authenticator = ScriptedAuthenticator::available(vec![]);
        let (mut controller, lock_state) = new_controller(authenticator);

        let stale = AttemptCompletion {
            id: AttemptId(42),
            result: Ok(()),
        };
        assert_eq!(
            controller.complete_attempt(stale).unwrap_err(),
            LockError::StaleAttempt(AttemptId(42))
        );
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 0);
        assert_eq!(controller.phase(), PromptPhase::Idle);
    }

    #[test]
    fn test_logout_always_reaches_lock_state() {
        let authenticator = ScriptedAuthenticator::available(vec![]);
        let (mut controller, lock_state) = new_controller(authenticator);

        controller.logout();
        futures::executor::block_on(controller.attempt_unlock()).unwrap();
        controller.logout();

        assert_eq!(lock_state.logouts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_logout_discards_pending_attempt() {
        let authenticator = ScriptedAuthenticator::available(vec![Ok(())]);
        let (mut controller, lock_state) = new_controller(authenticator);

        let AttemptStart::Evaluate(request) = controller.begin_attempt().unwrap() else {
            panic!("expected evaluation");
        };
        controller.logout();
        assert_eq!(controller.phase(), PromptPhase::Idle);

        let id = request.id();
        assert_eq!(
            controller.complete_attempt(request.evaluate().await).unwrap_err(),
            LockError::StaleAttempt(id)
        );
        assert_eq!(lock_state.unlocks.load(Ordering::SeqCst), 0);
        assert_eq!(lock_state.logouts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logout_announces_only_with_screen_reader() {
        for running in [true, false] {
            let announcer = Arc::new(RecordingAnnouncer {
                running,
                announced: Mutex::new(Vec::new()),
            });
            let (controller, _) = new_controller(ScriptedAuthenticator::available(vec![]));
            let mut controller = controller.with_announcer(announcer.clone());

            controller.logout();

            let announced = announcer.announced.lock().unwrap();
            if running {
                assert_eq!(
                    *announced,
                    vec![MessageKey::AccessibilityLoggedOutAnnouncement
                        .default_text()
                        .to_string()]
                );
            } else {
                assert!(announced.is_empty());
            }
        }
    }
}
