use acul_kit_core::screens::{known_screen_ids, map_screen, pascal_case, PromptScreen};

#[test]
fn test_shared_prompt_screens_map_to_their_prompt() {
    assert_eq!(
        map_screen("mfa-otp-challenge"),
        PromptScreen {
            prompt: "mfa-otp".to_string(),
            screen: "mfa-otp-challenge".to_string(),
        }
    );
    assert_eq!(map_screen("reset-password-request").prompt, "reset-password");
    assert_eq!(map_screen("brute-force-protection-unblock").prompt, "login");
    assert_eq!(map_screen("email-verification-result").prompt, "email-verification");
}

#[test]
fn test_unknown_screen_maps_to_itself() {
    let mapped = map_screen("totally-new-screen");
    assert_eq!(mapped.prompt, "totally-new-screen");
    assert_eq!(mapped.screen, "totally-new-screen");
}

#[test]
fn test_every_table_entry_keeps_its_screen_name() {
    for id in known_screen_ids() {
        assert_eq!(map_screen(id).screen, id, "screen half should equal the id for {id}");
    }
}

#[test]
fn test_pascal_case() {
    assert_eq!(pascal_case("login"), "Login");
    assert_eq!(pascal_case("mfa-otp-challenge"), "MfaOtpChallenge");
    assert_eq!(pascal_case("login-id"), "LoginId");
}
