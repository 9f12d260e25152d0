use acul_kit::serve::{screen_urls, serve_until};
use acul_kit_core::config::{HarnessConfig, PathsConfig};
use acul_kit_core::versions::VersionLedger;
use std::fs;
use tempfile::tempdir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn serves_dist_files_with_permissive_cors() {
    let tmp = tempdir().unwrap();
    let dist = tmp.path().join("dist");
    fs::create_dir_all(dist.join("v-1/login")).unwrap();
    fs::write(dist.join("v-1/login/component.js"), "export default 1;").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        serve_until(listener, &dist, async move {
            let _ = rx.await;
        })
        .await
    });

    let client = reqwest::Client::new();
    let url = format!("http://{addr}/v-1/login/component.js");
    let response = client
        .get(&url)
        .header("Origin", "https://tenant.example.test")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert_eq!(response.text().await.unwrap(), "export default 1;");

    let preflight = client
        .request(reqwest::Method::OPTIONS, &url)
        .header("Origin", "https://tenant.example.test")
        .header("Access-Control-Request-Method", "PUT")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    let methods = preflight.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("PUT"), "got: {methods}");

    let missing = client
        .get(format!("http://{addr}/v-1/nope.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[test]
fn screen_urls_list_bundled_screens_of_current_version() {
    let tmp = tempdir().unwrap();
    let mut config = HarnessConfig::local(PathsConfig {
        samples_dir: tmp.path().join("samples"),
        dist_dir: tmp.path().join("dist"),
        styles_input: tmp.path().join("styles.css"),
    });
    assert!(screen_urls(&config).unwrap().is_empty());

    let ledger = VersionLedger::new(&config.paths.dist_dir);
    for screen in ["signup", "login"] {
        let dir = ledger.version_dir("v-abc").join(screen);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("component.js"), "").unwrap();
    }
    ledger.promote("v-abc").unwrap();
    config.base_url = "https://cdn.example.test/".to_string();

    assert_eq!(
        screen_urls(&config).unwrap(),
        vec![
            "https://cdn.example.test/v-abc/login/component.js".to_string(),
            "https://cdn.example.test/v-abc/signup/component.js".to_string(),
        ]
    );
}
