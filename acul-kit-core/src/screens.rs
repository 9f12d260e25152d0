//! Screen identifier → Management API `(prompt, screen)` addressing.
//!
//! Sample files are named after the screen they render (`mfa-otp-challenge.tsx`),
//! but the rendering endpoint is addressed as
//! `/api/v2/prompts/{prompt}/screen/{screen}/rendering`, and many screens share a
//! prompt. Unknown identifiers map to themselves for both halves.

use serde::Serialize;

/// Addressing unit of one screen's rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptScreen {
    pub prompt: String,
    pub screen: String,
}

/// `(screen identifier, prompt, screen)`.
const PROMPT_SCREEN_TABLE: &[(&str, &str, &str)] = &[
    ("interstitial-captcha", "captcha", "interstitial-captcha"),
    ("redeem-ticket", "common", "redeem-ticket"),
    ("consent", "consent", "consent"),
    ("customized-consent", "customized-consent", "customized-consent"),
    ("device-code-activation", "device-flow", "device-code-activation"),
    ("device-code-activation-allowed", "device-flow", "device-code-activation-allowed"),
    ("device-code-activation-denied", "device-flow", "device-code-activation-denied"),
    ("device-code-confirmation", "device-flow", "device-code-confirmation"),
    ("email-identifier-challenge", "email-identifier-challenge", "email-identifier-challenge"),
    ("email-otp-challenge", "email-otp-challenge", "email-otp-challenge"),
    ("email-verification-result", "email-verification", "email-verification-result"),
    ("accept-invitation", "invitation", "accept-invitation"),
    ("login", "login", "login"),
    ("login-email-verification", "login-email-verification", "login-email-verification"),
    ("login-id", "login-id", "login-id"),
    ("login-password", "login-password", "login-password"),
    ("login-passwordless-email-code", "login-passwordless", "login-passwordless-email-code"),
    ("login-passwordless-sms-otp", "login-passwordless", "login-passwordless-sms-otp"),
    ("logout", "logout", "logout"),
    ("logout-aborted", "logout", "logout-aborted"),
    ("logout-complete", "logout", "logout-complete"),
    ("mfa-begin-enroll-options", "mfa", "mfa-begin-enroll-options"),
    ("mfa-detect-browser-capabilities", "mfa", "mfa-detect-browser-capabilities"),
    ("mfa-enroll-result", "mfa", "mfa-enroll-result"),
    ("mfa-login-options", "mfa", "mfa-login-options"),
    ("mfa-email-challenge", "mfa-email", "mfa-email-challenge"),
    ("mfa-email-list", "mfa-email", "mfa-email-list"),
    ("mfa-otp-challenge", "mfa-otp", "mfa-otp-challenge"),
    ("mfa-otp-enrollment-code", "mfa-otp", "mfa-otp-enrollment-code"),
    ("mfa-otp-enrollment-qr", "mfa-otp", "mfa-otp-enrollment-qr"),
    ("mfa-phone-challenge", "mfa-phone", "mfa-phone-challenge"),
    ("mfa-phone-enrollment", "mfa-phone", "mfa-phone-enrollment"),
    ("mfa-push-challenge-push", "mfa-push", "mfa-push-challenge-push"),
    ("mfa-push-enrollment-qr", "mfa-push", "mfa-push-enrollment-qr"),
    ("mfa-push-list", "mfa-push", "mfa-push-list"),
    ("mfa-push-welcome", "mfa-push", "mfa-push-welcome"),
    ("mfa-recovery-code-challenge", "mfa-recovery-code", "mfa-recovery-code-challenge"),
    (
        "mfa-recovery-code-challenge-new-code",
        "mfa-recovery-code",
        "mfa-recovery-code-challenge-new-code",
    ),
    ("mfa-recovery-code-enrollment", "mfa-recovery-code", "mfa-recovery-code-enrollment"),
    ("mfa-country-codes", "mfa-sms", "mfa-country-codes"),
    ("mfa-sms-challenge", "mfa-sms", "mfa-sms-challenge"),
    ("mfa-sms-enrollment", "mfa-sms", "mfa-sms-enrollment"),
    ("mfa-sms-list", "mfa-sms", "mfa-sms-list"),
    ("mfa-voice-challenge", "mfa-voice", "mfa-voice-challenge"),
    ("mfa-voice-enrollment", "mfa-voice", "mfa-voice-enrollment"),
    ("mfa-webauthn-change-key-nickname", "mfa-webauthn", "mfa-webauthn-change-key-nickname"),
    ("mfa-webauthn-enrollment-success", "mfa-webauthn", "mfa-webauthn-enrollment-success"),
    ("mfa-webauthn-error", "mfa-webauthn", "mfa-webauthn-error"),
    ("mfa-webauthn-not-available-error", "mfa-webauthn", "mfa-webauthn-not-available-error"),
    ("mfa-webauthn-platform-challenge", "mfa-webauthn", "mfa-webauthn-platform-challenge"),
    ("mfa-webauthn-platform-enrollment", "mfa-webauthn", "mfa-webauthn-platform-enrollment"),
    ("mfa-webauthn-roaming-challenge", "mfa-webauthn", "mfa-webauthn-roaming-challenge"),
    ("mfa-webauthn-roaming-enrollment", "mfa-webauthn", "mfa-webauthn-roaming-enrollment"),
    ("organization-picker", "organizations", "organization-picker"),
    ("organization-selection", "organizations", "organization-selection"),
    ("passkey-enrollment", "passkeys", "passkey-enrollment"),
    ("passkey-enrollment-local", "passkeys", "passkey-enrollment-local"),
    ("phone-identifier-challenge", "phone-identifier-challenge", "phone-identifier-challenge"),
    ("phone-identifier-enrollment", "phone-identifier-enrollment", "phone-identifier-enrollment"),
    ("reset-password", "reset-password", "reset-password"),
    ("reset-password-email", "reset-password", "reset-password-email"),
    ("reset-password-error", "reset-password", "reset-password-error"),
    ("reset-password-mfa-email-challenge", "reset-password", "reset-password-mfa-email-challenge"),
    ("reset-password-mfa-otp-challenge", "reset-password", "reset-password-mfa-otp-challenge"),
    ("reset-password-mfa-phone-challenge", "reset-password", "reset-password-mfa-phone-challenge"),
    (
        "reset-password-mfa-push-challenge-push",
        "reset-password",
        "reset-password-mfa-push-challenge-push",
    ),
    (
        "reset-password-mfa-recovery-code-challenge",
        "reset-password",
        "reset-password-mfa-recovery-code-challenge",
    ),
    ("reset-password-mfa-sms-challenge", "reset-password", "reset-password-mfa-sms-challenge"),
    ("reset-password-mfa-voice-challenge", "reset-password", "reset-password-mfa-voice-challenge"),
    (
        "reset-password-mfa-webauthn-platform-challenge",
        "reset-password",
        "reset-password-mfa-webauthn-platform-challenge",
    ),
    (
        "reset-password-mfa-webauthn-roaming-challenge",
        "reset-password",
        "reset-password-mfa-webauthn-roaming-challenge",
    ),
    ("reset-password-request", "reset-password", "reset-password-request"),
    ("reset-password-success", "reset-password", "reset-password-success"),
    ("signup", "signup", "signup"),
    ("signup-id", "signup-id", "signup-id"),
    ("signup-password", "signup-password", "signup-password"),
    ("brute-force-protection-unblock", "login", "brute-force-protection-unblock"),
    ("brute-force-protection-unblock-success", "login", "brute-force-protection-unblock-success"),
    ("brute-force-protection-unblock-failure", "login", "brute-force-protection-unblock-failure"),
];

/// Map a screen identifier to its prompt/screen pair. Total: unknown
/// identifiers fall back to `{prompt: id, screen: id}`.
pub fn map_screen(screen_id: &str) -> PromptScreen {
    PROMPT_SCREEN_TABLE
        .iter()
        .find(|(id, _, _)| *id == screen_id)
        .map(|(_, prompt, screen)| PromptScreen {
            prompt: (*prompt).to_string(),
            screen: (*screen).to_string(),
        })
        .unwrap_or_else(|| PromptScreen {
            prompt: screen_id.to_string(),
            screen: screen_id.to_string(),
        })
}

/// Every identifier with an explicit table entry, in table order.
pub fn known_screen_ids() -> impl Iterator<Item = &'static str> {
    PROMPT_SCREEN_TABLE.iter().map(|(id, _, _)| *id)
}

/// `mfa-otp-challenge` → `MfaOtpChallenge`.
pub fn pascal_case(screen_id: &str) -> String {
    screen_id
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
