use acul_kit::auth0::{Auth0Client, UNREADABLE_BODY};
use acul_kit_core::config::Auth0Config;
use acul_kit_core::contract::{ApiError, ManagementApi, RenderingConfig};
use acul_kit_core::screens::map_screen;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{patch, post};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn credentials() -> Auth0Config {
    Auth0Config {
        domain: "tenant.eu.auth0.com".to_string(),
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
    }
}

async fn spawn_tenant(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

/// Reads one request (headers plus `Content-Length` body) off the socket.
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|value| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

#[test]
fn auth0_client_builds_management_api_urls() {
    let client = Auth0Client::new(credentials());
    assert_eq!(client.token_url(), "https://tenant.eu.auth0.com/oauth/token");
    assert_eq!(client.audience(), "https://tenant.eu.auth0.com/api/v2/");
    assert_eq!(
        client.rendering_url(&map_screen("mfa-otp-challenge")),
        "https://tenant.eu.auth0.com/api/v2/prompts/mfa-otp/screen/mfa-otp-challenge/rendering"
    );

    let local = Auth0Client::with_base_url(credentials(), "http://127.0.0.1:9/");
    assert_eq!(local.token_url(), "http://127.0.0.1:9/oauth/token");
    assert_eq!(local.audience(), "https://tenant.eu.auth0.com/api/v2/");
}

#[tokio::test]
async fn token_is_used_as_bearer_for_rendering_updates() {
    let router = Router::new()
        .route(
            "/oauth/token",
            post(|| async {
                (
                    [(header::CONTENT_TYPE, "application/json")],
                    r#"{"access_token":"tok-1","token_type":"Bearer"}"#,
                )
            }),
        )
        .route(
            "/api/v2/prompts/login/screen/login/rendering",
            patch(|headers: HeaderMap| async move {
                if headers[header::AUTHORIZATION] == "Bearer tok-1" {
                    StatusCode::NO_CONTENT
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
    let client = Auth0Client::with_base_url(credentials(), spawn_tenant(router).await);

    let token = client.fetch_token().await.unwrap();
    assert_eq!(token, "tok-1");
    client
        .update_rendering(&token, &map_screen("login"), &RenderingConfig::standard())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_request_keeps_status_and_body() {
    let router = Router::new().route(
        "/oauth/token",
        post(|| async { (StatusCode::FORBIDDEN, "denied") }),
    );
    let client = Auth0Client::with_base_url(credentials(), spawn_tenant(router).await);

    match client.fetch_token().await.unwrap_err() {
        ApiError::Status { status, body, url } => {
            assert_eq!(status, 403);
            assert_eq!(body, "denied");
            assert!(url.ends_with("/oauth/token"), "got: {url}");
        }
        other => panic!("expected a status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn truncated_error_body_is_reported_as_unreadable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });
    let client = Auth0Client::with_base_url(credentials(), format!("http://{addr}"));

    match client.fetch_token().await.unwrap_err() {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, UNREADABLE_BODY);
        }
        other => panic!("expected a status error, got: {other:?}"),
    }
}
