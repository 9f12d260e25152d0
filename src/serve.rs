//! Local static server for the build output, plus `stop` for a server left running.
//!
//! The tenant's login page loads scripts from `BASE_URL`, so every response
//! carries permissive CORS headers and preflight requests are answered.

use acul_kit_core::config::HarnessConfig;
use acul_kit_core::versions::VersionLedger;
use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::Router;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::process::Command;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Everything under `dist_dir`, readable from any origin.
pub fn router(dist_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .fallback_service(ServeDir::new(dist_dir))
        .layer(cors)
}

/// `{base_url}/{version}/{screen}/component.js` for every bundled screen of the current build.
pub fn screen_urls(config: &HarnessConfig) -> Result<Vec<String>> {
    let ledger = VersionLedger::new(&config.paths.dist_dir);
    let Some(version) = ledger.current()? else {
        return Ok(Vec::new());
    };
    let version_dir = ledger.version_dir(&version);
    let mut screens: Vec<String> = fs::read_dir(&version_dir)
        .with_context(|| format!("reading {}", version_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join("component.js").is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    screens.sort();
    let base = config.base_url.trim_end_matches('/');
    Ok(screens
        .iter()
        .map(|screen| format!("{base}/{version}/{screen}/component.js"))
        .collect())
}

pub async fn serve_until<F>(listener: TcpListener, dist_dir: &Path, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(dist_dir))
        .with_graceful_shutdown(shutdown)
        .await
        .context("static server failed")
}

/// Serve the dist directory on `config.port` until Ctrl+C.
pub async fn serve(config: &HarnessConfig) -> Result<()> {
    let dist_dir = &config.paths.dist_dir;
    if !dist_dir.exists() {
        warn!(path = %dist_dir.display(), "Dist directory does not exist yet; run build first");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, dist = %dist_dir.display(), "Static server listening");

    println!("Serving {} at http://localhost:{}", dist_dir.display(), config.port);
    let urls = screen_urls(config)?;
    if urls.is_empty() {
        println!("No build found. Run `acul-kit build` to create one.");
    } else {
        println!("Available screens:");
        for url in &urls {
            println!("  {url}");
        }
    }
    println!("Press Ctrl+C to stop.");

    serve_until(listener, dist_dir, shutdown_signal()).await?;
    println!("\nServer shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

/// Kill whatever listens on `port`. Returns the number of processes signalled.
pub fn stop(port: u16) -> Result<usize> {
    let output = Command::new("lsof")
        .arg(format!("-ti:{port}"))
        .output()
        .context("failed to run lsof")?;
    let pids: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let mut killed = 0;
    for pid in &pids {
        match Command::new("kill").args(["-9", pid]).status() {
            Ok(status) if status.success() => {
                info!(pid = %pid, port, "Stopped process");
                killed += 1;
            }
            Ok(status) => warn!(pid = %pid, %status, "kill did not succeed"),
            Err(e) => warn!(pid = %pid, error = %e, "Failed to run kill"),
        }
    }
    Ok(killed)
}
