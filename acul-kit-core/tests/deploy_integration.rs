use std::fs;
use std::path::Path;
use std::time::Duration;

use acul_kit_core::config::{HarnessConfig, PathsConfig};
use acul_kit_core::contract::{ApiError, MockManagementApi, RenderingConfig, RenderingMode};
use acul_kit_core::deploy::{cleanup, deploy, DeployError};
use acul_kit_core::manifest::{Manifest, MANIFEST_FILE};
use acul_kit_core::report::ItemStatus;
use acul_kit_core::screens::PromptScreen;
use acul_kit_core::versions::VersionLedger;
use tempfile::tempdir;

const VERSION: &str = "v-0123456789abcdef";

fn config_in(root: &Path) -> HarnessConfig {
    let mut config = HarnessConfig::local(PathsConfig {
        samples_dir: root.join("samples"),
        dist_dir: root.join("dist"),
        styles_input: root.join("styles.css"),
    });
    config.base_url = "https://cdn.example.test".to_string();
    config.request_delay = Duration::ZERO;
    config
}

/// Manifest lists `screens`; only `built` get a bundle in the current version.
fn seed_build(config: &HarnessConfig, screens: &[&str], built: &[&str]) {
    fs::create_dir_all(&config.paths.samples_dir).unwrap();
    let mut manifest = Manifest::default();
    for screen in screens {
        manifest.insert(screen, 1);
    }
    manifest.save(&config.paths.samples_dir).unwrap();

    let ledger = VersionLedger::new(&config.paths.dist_dir);
    ledger.append(VERSION).unwrap();
    fs::create_dir_all(ledger.version_dir(VERSION)).unwrap();
    for screen in built {
        let dir = ledger.version_dir(VERSION).join(screen);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("component.js"), "export {}").unwrap();
    }
    ledger.promote(VERSION).unwrap();
}

fn authenticated_api() -> MockManagementApi {
    let mut api = MockManagementApi::new();
    api.expect_fetch_token()
        .times(1)
        .returning(|| Ok("token-123".to_string()));
    api
}

#[tokio::test]
async fn test_deploy_counts_a_rejected_screen_and_continues() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    let screens = ["login", "login-id", "mfa-otp-challenge"];
    seed_build(&config, &screens, &screens);

    let mut api = authenticated_api();
    api.expect_update_rendering()
        .times(3)
        .returning(|token: &str, target: &PromptScreen, _config: &RenderingConfig| {
            assert_eq!(token, "token-123");
            if target.screen == "login-id" {
                return Err(ApiError::Status {
                    url: "https://tenant.test/api/v2/prompts/login-id/screen/login-id/rendering"
                        .to_string(),
                    status: 400,
                    body: "bad request".to_string(),
                });
            }
            Ok(())
        });

    let report = deploy(&api, &config, &[]).await.expect("deploy runs");
    let summary = report.summary();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.total, 3);
    assert_eq!(report.version.as_deref(), Some(VERSION));
}

#[tokio::test]
async fn test_deploy_sends_mapped_target_and_versioned_urls() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    seed_build(&config, &["mfa-otp-challenge"], &["mfa-otp-challenge"]);

    let mut api = authenticated_api();
    api.expect_update_rendering()
        .withf(|_token: &str, target: &PromptScreen, rendering: &RenderingConfig| {
            let expected = RenderingConfig::advanced(
                &format!("https://cdn.example.test/{VERSION}/styles.css"),
                &format!("https://cdn.example.test/{VERSION}/mfa-otp-challenge/component.js"),
            );
            target.prompt == "mfa-otp"
                && target.screen == "mfa-otp-challenge"
                && *rendering == expected
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = deploy(&api, &config, &[]).await.unwrap();
    assert!(report.summary().is_success());
}

#[tokio::test]
async fn test_deploy_marks_missing_bundle_without_calling_api() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    seed_build(&config, &["login", "signup"], &["login"]);

    let mut api = authenticated_api();
    api.expect_update_rendering()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = deploy(&api, &config, &[]).await.unwrap();
    let signup = report.outcomes.iter().find(|o| o.screen == "signup").unwrap();
    assert_eq!(
        signup.status,
        ItemStatus::Failed("component file not found".to_string())
    );
    assert_eq!(report.summary().failed, 1);
}

#[tokio::test]
async fn test_deploy_explicit_screens_override_manifest() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    seed_build(&config, &["login", "signup"], &["login", "signup"]);

    let mut api = authenticated_api();
    api.expect_update_rendering()
        .withf(|_, target: &PromptScreen, _| target.screen == "signup")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let report = deploy(&api, &config, &["signup".to_string()]).await.unwrap();
    assert_eq!(report.summary().total, 1);
}

#[tokio::test]
async fn test_deploy_without_build_fails_before_authenticating() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());

    let mut api = MockManagementApi::new();
    api.expect_fetch_token().times(0);

    let err = deploy(&api, &config, &[]).await.unwrap_err();
    assert!(matches!(err, DeployError::MissingBuild { .. }));
}

#[tokio::test]
async fn test_corrupt_manifest_fails_before_authenticating() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    fs::create_dir_all(&config.paths.samples_dir).unwrap();
    fs::write(config.paths.samples_dir.join(MANIFEST_FILE), "not json").unwrap();

    let mut api = MockManagementApi::new();
    api.expect_fetch_token().times(0);
    api.expect_update_rendering().times(0);

    let err = cleanup(&api, &config, &[]).await.unwrap_err();
    assert!(matches!(err, DeployError::Manifest(_)), "got: {err}");
}

#[tokio::test]
async fn test_auth_failure_is_fatal() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    seed_build(&config, &["login"], &["login"]);

    let mut api = MockManagementApi::new();
    api.expect_fetch_token().returning(|| {
        Err(ApiError::Status {
            url: "https://tenant.test/oauth/token".to_string(),
            status: 401,
            body: "access_denied".to_string(),
        })
    });
    api.expect_update_rendering().times(0);

    let err = cleanup(&api, &config, &[]).await.unwrap_err();
    assert!(matches!(err, DeployError::Auth(_)));
    let err = deploy(&api, &config, &[]).await.unwrap_err();
    assert!(matches!(err, DeployError::Auth(_)));
}

#[tokio::test]
async fn test_cleanup_resets_each_screen_to_standard() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    seed_build(&config, &["consent", "login", "signup"], &[]);

    let mut api = authenticated_api();
    api.expect_update_rendering()
        .withf(|_, _, rendering: &RenderingConfig| {
            rendering.rendering_mode == RenderingMode::Standard && rendering.head_tags.is_empty()
        })
        .times(3)
        .returning(|_, _, _| Ok(()));

    let report = cleanup(&api, &config, &[]).await.unwrap();
    assert_eq!(report.version, None);
    let summary = report.summary();
    assert_eq!((summary.succeeded, summary.failed, summary.total), (3, 0, 3));
    assert!(config.paths.dist_dir.join(VERSION).exists(), "cleanup leaves local builds alone");
}

#[test]
fn test_rendering_payload_shape() {
    let body = serde_json::to_value(RenderingConfig::advanced("https://a/s.css", "https://a/c.js"))
        .unwrap();
    assert_eq!(body["rendering_mode"], "advanced");
    assert_eq!(body["head_tags"][0]["tag"], "link");
    assert_eq!(body["head_tags"][0]["attributes"]["rel"], "stylesheet");
    assert_eq!(body["head_tags"][1]["attributes"]["type"], "module");
    assert_eq!(body["head_tags"][1]["attributes"]["src"], "https://a/c.js");

    let body = serde_json::to_value(RenderingConfig::standard()).unwrap();
    assert_eq!(body["rendering_mode"], "standard");
    assert_eq!(body["head_tags"], serde_json::json!([]));
}
