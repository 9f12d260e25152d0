use acul_kit_core::config::RemoteConfig;
use acul_kit_core::contract::{SampleSource, SourceError};
use acul_kit_core::fetch::{GithubSampleSource, STATIC_EXAMPLE_FILES};
use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

const LISTING: &str = r#"[
  {"name": "login.md", "type": "file"},
  {"name": "signup.md", "type": "file"},
  {"name": "assets", "type": "dir"}
]"#;

/// Serves `router` on an ephemeral port and returns its base URL.
async fn spawn_remote(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

fn source(raw_base_url: String, listing_url: Option<String>) -> GithubSampleSource {
    GithubSampleSource::new(RemoteConfig {
        raw_base_url,
        listing_url,
    })
    .unwrap()
}

fn static_list() -> Vec<String> {
    STATIC_EXAMPLE_FILES.iter().map(|f| f.to_string()).collect()
}

#[tokio::test]
async fn test_no_listing_url_uses_builtin_list() {
    let source = source("http://127.0.0.1:1".to_string(), None);
    assert_eq!(source.list_files().await.unwrap(), static_list());
}

#[tokio::test]
async fn test_unreachable_listing_falls_back_to_builtin_list() {
    let source = source(
        "http://127.0.0.1:1".to_string(),
        Some("http://127.0.0.1:1/listing".to_string()),
    );
    assert_eq!(source.list_files().await.unwrap(), static_list());
}

#[tokio::test]
async fn test_unparseable_or_failed_listing_falls_back_to_builtin_list() {
    let base = spawn_remote(
        Router::new()
            .route("/garbled", get(|| async { "<html>rate limited</html>" }))
            .route(
                "/forbidden",
                get(|| async { (StatusCode::FORBIDDEN, "API rate limit exceeded") }),
            ),
    )
    .await;

    for path in ["garbled", "forbidden"] {
        let source = source(base.clone(), Some(format!("{base}/{path}")));
        assert_eq!(source.list_files().await.unwrap(), static_list(), "{path}");
    }
}

#[tokio::test]
async fn test_listing_keeps_only_file_entries() {
    let base = spawn_remote(
        Router::new().route(
            "/contents/examples",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], LISTING) }),
        ),
    )
    .await;
    let source = source(base.clone(), Some(format!("{base}/contents/examples")));

    assert_eq!(
        source.list_files().await.unwrap(),
        vec!["login.md".to_string(), "signup.md".to_string()]
    );
}

#[tokio::test]
async fn test_fetch_file_joins_raw_base_and_filename() {
    let base = spawn_remote(
        Router::new().route("/examples/login.md", get(|| async { "# Login\n" })),
    )
    .await;
    let source = source(format!("{base}/examples/"), None);

    assert_eq!(source.fetch_file("login.md").await.unwrap(), "# Login\n");
    let err = source.fetch_file("missing.md").await.unwrap_err();
    assert!(matches!(err, SourceError::Status { status: 404, .. }), "got: {err}");
}
