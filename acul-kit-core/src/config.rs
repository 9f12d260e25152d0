use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Raw markdown files of the ACUL SDK examples.
pub const DEFAULT_RAW_BASE_URL: &str =
    "https://raw.githubusercontent.com/auth0/universal-login/master/packages/auth0-acul-js/examples";

/// GitHub contents API listing of the same directory.
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/auth0/universal-login/contents/packages/auth0-acul-js/examples?ref=master";

pub const DEFAULT_PORT: u16 = 5500;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Everything the orchestrators need, built once at process entry.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub paths: PathsConfig,
    pub remote: RemoteConfig,
    pub auth0: Option<Auth0Config>,
    pub port: u16,
    /// Public origin the tenant loads assets from, without trailing slash.
    pub base_url: String,
    /// Pause between sequential Management API requests.
    pub request_delay: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Fetched `.tsx` samples, `manifest.json` and `index.ts`.
    pub samples_dir: PathBuf,
    /// Versioned build output plus the ledger and pointer files.
    pub dist_dir: PathBuf,
    /// Tailwind entry stylesheet compiled into every version.
    pub styles_input: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            samples_dir: PathBuf::from("src/samples"),
            dist_dir: PathBuf::from("dist"),
            styles_input: PathBuf::from("src/samples-styles.css"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub raw_base_url: String,
    /// `None` skips the listing call and uses the built-in example list.
    pub listing_url: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            listing_url: Some(DEFAULT_LISTING_URL.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct Auth0Config {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Auth0Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0Config")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl HarnessConfig {
    /// Defaults for a local checkout: `src/samples`, `dist`, port 5500.
    pub fn local(paths: PathsConfig) -> Self {
        Self {
            paths,
            remote: RemoteConfig::default(),
            auth0: None,
            port: DEFAULT_PORT,
            base_url: format!("http://localhost:{DEFAULT_PORT}"),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            samples_dir = %self.paths.samples_dir.display(),
            dist_dir = %self.paths.dist_dir.display(),
            base_url = %self.base_url,
            port = self.port,
            auth0_configured = self.auth0.is_some(),
            "Loaded HarnessConfig"
        );
        debug!(config = ?self, "HarnessConfig loaded (full debug)");
    }
}
