/// `load_config` module: builds the [`HarnessConfig`] every command runs with.
///
/// Sources, later ones winning:
/// - built-in defaults (`src/samples`, `dist`, port 5500, the public examples repository)
/// - an optional YAML file overriding `paths` and `remote`
/// - environment variables (`.env` is loaded by `main` before this runs)
///
/// Auth0 credentials are read here but only checked by [`require_auth0`], so
/// `fetch`, `build` and `serve` work without them.
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use acul_kit_core::config::{
    Auth0Config, HarnessConfig, PathsConfig, RemoteConfig, DEFAULT_PORT, DEFAULT_REQUEST_DELAY_MS,
};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

pub const AUTH0_DOMAIN: &str = "AUTH0_DOMAIN";
pub const AUTH0_CLIENT_ID: &str = "AUTH0_CLIENT_ID";
pub const AUTH0_CLIENT_SECRET: &str = "AUTH0_CLIENT_SECRET";

/// YAML-side shape; every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub paths: PathsConfig,
    pub remote: RemoteConfig,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow!("Failed to read config file {:?}: {}", path, e));
        }
    };
    // An empty file is a valid "use the defaults".
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    match serde_yaml::from_str(&content) {
        Ok(conf) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Defaults, then the YAML file at `path` (if any), then the environment.
pub fn load_config(path: Option<&Path>) -> Result<HarnessConfig> {
    let file = match path {
        Some(path) => read_file_config(path)?,
        None => FileConfig::default(),
    };

    let port = match non_empty_var("PORT") {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
        None => DEFAULT_PORT,
    };
    let base_url = non_empty_var("BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| format!("http://localhost:{port}"));
    let delay_ms = match non_empty_var("ACUL_REQUEST_DELAY_MS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("ACUL_REQUEST_DELAY_MS must be milliseconds, got {raw:?}"))?,
        None => DEFAULT_REQUEST_DELAY_MS,
    };

    let auth0 = match (
        non_empty_var(AUTH0_DOMAIN),
        non_empty_var(AUTH0_CLIENT_ID),
        non_empty_var(AUTH0_CLIENT_SECRET),
    ) {
        (Some(domain), Some(client_id), Some(client_secret)) => Some(Auth0Config {
            domain: domain
                .trim_start_matches("https://")
                .trim_end_matches('/')
                .to_string(),
            client_id,
            client_secret,
        }),
        _ => None,
    };

    let config = HarnessConfig {
        paths: file.paths,
        remote: file.remote,
        auth0,
        port,
        base_url,
        request_delay: Duration::from_millis(delay_ms),
    };
    config.trace_loaded();
    Ok(config)
}

/// Credentials for commands that talk to the Management API.
pub fn require_auth0(config: &HarnessConfig) -> Result<&Auth0Config> {
    config.auth0.as_ref().ok_or_else(|| {
        let missing: Vec<&str> = [AUTH0_DOMAIN, AUTH0_CLIENT_ID, AUTH0_CLIENT_SECRET]
            .into_iter()
            .filter(|name| non_empty_var(name).is_none())
            .collect();
        error!(?missing, "Auth0 credentials are not configured");
        anyhow!(
            "Missing Auth0 credentials: set {} (environment or .env)",
            if missing.is_empty() {
                format!("{AUTH0_DOMAIN}, {AUTH0_CLIENT_ID} and {AUTH0_CLIENT_SECRET}")
            } else {
                missing.join(", ")
            }
        )
    })
}
