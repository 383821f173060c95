//! Display text lookup for the lock prompt

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the app display name
const APP_NAME_PLACEHOLDER: &str = "%@";

/// Alternate placeholder accepted in configured overrides
const APP_NAME_PLACEHOLDER_NAMED: &str = "{app}";

/// Text keys used by the lock prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    RetryButtonTitle,
    LogoutButtonTitle,
    BiometricReason,
    FallbackErrorMessage,
    SetUpPasscodeMessage,
    AccessibilityLoggedOutAnnouncement,
}

impl MessageKey {
    /// All keys, in display order
    pub const ALL: [MessageKey; 6] = [
        MessageKey::RetryButtonTitle,
        MessageKey::LogoutButtonTitle,
        MessageKey::BiometricReason,
        MessageKey::FallbackErrorMessage,
        MessageKey::SetUpPasscodeMessage,
        MessageKey::AccessibilityLoggedOutAnnouncement,
    ];

    /// Built-in English text
    pub fn default_text(self) -> &'static str {
        match self {
            MessageKey::RetryButtonTitle => "Retry",
            MessageKey::LogoutButtonTitle => "Log Out",
            MessageKey::BiometricReason => "Unlock the app to continue",
            MessageKey::FallbackErrorMessage => "Authentication failed. Try again.",
            MessageKey::SetUpPasscodeMessage => {
                "%@ requires a device passcode. Set up a passcode, then return to the app."
            }
            MessageKey::AccessibilityLoggedOutAnnouncement => "You have been logged out.",
        }
    }
}

/// Resolves message keys to display text
pub trait Localizer: Send + Sync {
    /// Text for `key`
    fn text(&self, key: MessageKey) -> String;

    /// Name of the app, as shown to the user
    fn app_display_name(&self) -> String;

    /// Passcode setup message with the app name filled in
    fn set_up_passcode_message(&self) -> String {
        substitute_app_name(
            &self.text(MessageKey::SetUpPasscodeMessage),
            &self.app_display_name(),
        )
    }
}

/// Replace the app name placeholders in `template`
pub fn substitute_app_name(template: &str, app_name: &str) -> String {
    let mut out = String::with_capacity(template.len() + app_name.len());
    let mut rest = template;
    loop {
        let next = [APP_NAME_PLACEHOLDER, APP_NAME_PLACEHOLDER_NAMED]
            .into_iter()
            .filter_map(|placeholder| rest.find(placeholder).map(|at| (at, placeholder)))
            .min_by_key(|(at, _)| *at);
        let Some((at, placeholder)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(app_name);
        rest = &rest[at + placeholder.len()..];
    }
}

/// English strings with optional per-key overrides
#[derive(Debug, Clone)]
pub struct BundledStrings {
    app_display_name: String,
    overrides: HashMap<MessageKey, String>,
}

impl BundledStrings {
    /// Built-in strings for the named app
    pub fn new(app_display_name: impl Into<String>) -> Self {
        Self {
            app_display_name: app_display_name.into(),
            overrides: HashMap::new(),
        }
    }

    /// Replace the text for a set of keys
    pub fn with_overrides(mut self, overrides: HashMap<MessageKey, String>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Replace the text for one key
    pub fn set(&mut self, key: MessageKey, text: impl Into<String>) {
        self.overrides.insert(key, text.into());
    }
}

impl Default for BundledStrings {
    fn default() -> Self {
        Self::new("This app")
    }
}

impl Localizer for BundledStrings {
    fn text(&self, key: MessageKey) -> String {
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_text().to_string())
    }

    fn app_display_name(&self) -> String {
        self.app_display_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_passcode_message_names_app() {
        let strings = BundledStrings::new("Field Service");
        let message = strings.set_up_passcode_message();
        assert!(message.starts_with("Field Service requires a device passcode"));
        assert!(!message.contains("%@"));
    }

    #[rstest]
    #[case("%@ needs a passcode", "Notes needs a passcode")]
    #[case("Set a passcode to use {app}.", "Set a passcode to use Notes.")]
    #[case("No placeholder", "No placeholder")]
    fn test_substitute_app_name(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(substitute_app_name(template, "Notes"), expected);
    }

    #[rstest]
    #[case("%@ is locked", "{app}X", "{app}X is locked")]
    #[case("{app} and %@", "%@X", "%@X and %@X")]
    fn test_app_name_is_not_substituted_twice(
        #[case] template: &str,
        #[case] app_name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(substitute_app_name(template, app_name), expected);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut strings = BundledStrings::new("Notes");
        strings.set(MessageKey::RetryButtonTitle, "Try again");

        assert_eq!(strings.text(MessageKey::RetryButtonTitle), "Try again");
        assert_eq!(strings.text(MessageKey::LogoutButtonTitle), "Log Out");
    }

    #[test]
    fn test_keys_use_camel_case_names() {
        let json = serde_json::to_string(&MessageKey::AccessibilityLoggedOutAnnouncement).unwrap();
        assert_eq!(json, "\"accessibilityLoggedOutAnnouncement\"");

        let overrides: HashMap<MessageKey, String> =
            serde_json::from_str(r#"{"retryButtonTitle": "Again"}"#).unwrap();
        assert_eq!(overrides[&MessageKey::RetryButtonTitle], "Again");
    }

    #[test]
    fn test_every_key_has_default_text() {
        for key in MessageKey::ALL {
            assert!(!key.default_text().is_empty(), "{key:?}");
        }
    }
}
