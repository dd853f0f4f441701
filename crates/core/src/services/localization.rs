//! Localized resource strings with `%Token%` substitution.
//!
//! Backs two things: default notification bodies used when no message
//! template row exists for an event, and the human-readable validation
//! hint strings. Locales missing a key fall back to English.

use std::collections::HashMap;

use licreg_db::entities::notification::EventType;

const FALLBACK_LOCALE: &str = "en";

/// Substitute `%Key%` placeholders in a template.
///
/// Unknown placeholders are left as-is so a malformed template stays
/// visible instead of silently losing text.
#[must_use]
pub fn substitute(template: &str, tokens: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in tokens {
        result = result.replace(&format!("%{key}%"), value);
    }
    result
}

/// In-memory resource string store, keyed by locale then resource key.
#[derive(Clone)]
pub struct Localizer {
    bundles: HashMap<String, HashMap<&'static str, &'static str>>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer {
    /// Create a localizer with the built-in English bundle.
    #[must_use]
    pub fn new() -> Self {
        let mut bundles = HashMap::new();
        bundles.insert(FALLBACK_LOCALE.to_string(), english_bundle());
        Self { bundles }
    }

    /// Register or replace a whole locale bundle.
    pub fn insert_bundle(
        &mut self,
        locale: &str,
        strings: HashMap<&'static str, &'static str>,
    ) {
        self.bundles.insert(locale.to_string(), strings);
    }

    /// Look up a raw resource string, falling back to English.
    #[must_use]
    pub fn text(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.bundles
            .get(locale)
            .and_then(|bundle| bundle.get(key).copied())
            .or_else(|| {
                self.bundles
                    .get(FALLBACK_LOCALE)
                    .and_then(|bundle| bundle.get(key).copied())
            })
    }

    /// Resolve a resource string and substitute tokens.
    ///
    /// An unknown key renders as the key itself so the caller always gets
    /// something displayable.
    #[must_use]
    pub fn message(&self, locale: &str, key: &str, tokens: &HashMap<String, String>) -> String {
        let template = self.text(locale, key).unwrap_or(key);
        substitute(template, tokens)
    }

    /// Default notification body for an event.
    #[must_use]
    pub fn default_notification(
        &self,
        locale: &str,
        event: EventType,
        tokens: &HashMap<String, String>,
    ) -> String {
        let key = notification_key(event);
        self.message(locale, key, tokens)
    }
}

/// Resource key of the default body for an event.
#[must_use]
pub const fn notification_key(event: EventType) -> &'static str {
    match event {
        EventType::RegistrationSubmitted => "notification.registrationSubmitted",
        EventType::RegistrationApproved => "notification.registrationApproved",
        EventType::RegistrationRejected => "notification.registrationRejected",
        EventType::RegistrationReturnedForEdit => "notification.registrationReturnedForEdit",
        EventType::RegistrationArchived => "notification.registrationArchived",
        EventType::RegistrationFinalSubmission => "notification.registrationFinalSubmission",
        EventType::UserCreated => "notification.userCreated",
        EventType::RoleAssigned => "notification.roleAssigned",
        EventType::GeneralAnnouncement => "notification.generalAnnouncement",
    }
}

fn english_bundle() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        (
            "notification.registrationSubmitted",
            "Registration %RegistrationId% was submitted by user %ActorId%",
        ),
        (
            "notification.registrationApproved",
            "Registration %RegistrationId% was approved by user %ActorId%",
        ),
        (
            "notification.registrationRejected",
            "Registration %RegistrationId% was rejected by user %ActorId%",
        ),
        (
            "notification.registrationReturnedForEdit",
            "Registration %RegistrationId% was returned for edit by user %ActorId%",
        ),
        (
            "notification.registrationArchived",
            "Registration %RegistrationId% was archived by user %ActorId%",
        ),
        (
            "notification.registrationFinalSubmission",
            "Registration %RegistrationId% reached final submission",
        ),
        (
            "notification.userCreated",
            "A user account was created by user %ActorId%",
        ),
        (
            "notification.roleAssigned",
            "A role was assigned by user %ActorId%",
        ),
        ("notification.generalAnnouncement", "%Message%"),
        (
            "hint.missingContact",
            "At least one contact person must be added before submission",
        ),
        (
            "hint.missingDocument",
            "At least one supporting document must be attached before submission",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn test_substitute_replaces_tokens() {
        let tokens = hashmap! {
            "RegistrationId".to_string() => "reg1".to_string(),
            "ActorId".to_string() => "maker1".to_string(),
        };
        let rendered = substitute("Registration %RegistrationId% by %ActorId%", &tokens);
        assert_eq!(rendered, "Registration reg1 by maker1");
    }

    #[test]
    fn test_substitute_leaves_unknown_tokens() {
        let rendered = substitute("Hello %Nobody%", &HashMap::new());
        assert_eq!(rendered, "Hello %Nobody%");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let localizer = Localizer::new();
        let text = localizer.text("fr", "hint.missingContact");
        assert!(text.is_some());
    }

    #[test]
    fn test_unknown_key_renders_as_key() {
        let localizer = Localizer::new();
        let rendered = localizer.message("en", "no.such.key", &HashMap::new());
        assert_eq!(rendered, "no.such.key");
    }

    #[test]
    fn test_default_notification_body() {
        let localizer = Localizer::new();
        let tokens = hashmap! {
            "RegistrationId".to_string() => "reg1".to_string(),
            "ActorId".to_string() => "u1".to_string(),
        };
        let body =
            localizer.default_notification("en", EventType::RegistrationApproved, &tokens);
        assert_eq!(body, "Registration reg1 was approved by user u1");
    }
}
