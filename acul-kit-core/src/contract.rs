//! # contract: the seams between the pipelines and the outside world
//!
//! Three external collaborators are reached only through the traits below:
//!
//! - [`SampleSource`]: the remote repository holding example markdown.
//! - [`Bundler`]: the JavaScript bundler and CSS compiler.
//! - [`ManagementApi`]: the Auth0 Management API (token + rendering endpoint).
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`; the generated `Mock*` types are
//!   exported with the `test-export-mocks` feature so both crates' tests can
//!   drive the orchestrators without network or node tooling.
//!
//! ## Errors
//! - Each trait has its own error type. Orchestrators treat these as per-item
//!   failures, except token acquisition which is fatal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::screens::PromptScreen;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected listing payload from {url}: {message}")]
    Listing { url: String, message: String },
}

/// Read-only access to example markdown files.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Candidate file names (e.g. `login-id.md`), in any order.
    async fn list_files(&self) -> Result<Vec<String>, SourceError>;

    /// Raw text of one file.
    async fn fetch_file(&self, filename: &str) -> Result<String, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}")]
    Exit { tool: String, status: String },
}

/// Compiles a wrapper entry point into a browser module and the shared stylesheet.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Bundle `entry` and everything it imports into one ES module at `outfile`.
    async fn bundle(&self, entry: &Path, outfile: &Path) -> Result<(), BundleError>;

    /// Compile the utility-class stylesheet `input` into `output`.
    async fn compile_styles(&self, input: &Path, output: &Path) -> Result<(), BundleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingMode {
    Standard,
    Advanced,
}

/// One `<link>` / `<script>` element injected into the hosted login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadTag {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

impl HeadTag {
    pub fn stylesheet(href: &str) -> Self {
        Self {
            tag: "link".to_string(),
            attributes: BTreeMap::from([
                ("rel".to_string(), "stylesheet".to_string()),
                ("href".to_string(), href.to_string()),
            ]),
        }
    }

    pub fn module_script(src: &str) -> Self {
        Self {
            tag: "script".to_string(),
            attributes: BTreeMap::from([
                ("src".to_string(), src.to_string()),
                ("type".to_string(), "module".to_string()),
            ]),
        }
    }
}

/// Body of `PATCH /api/v2/prompts/{prompt}/screen/{screen}/rendering`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingConfig {
    pub rendering_mode: RenderingMode,
    pub head_tags: Vec<HeadTag>,
}

impl RenderingConfig {
    /// Externally hosted stylesheet + component module.
    pub fn advanced(css_url: &str, js_url: &str) -> Self {
        Self {
            rendering_mode: RenderingMode::Advanced,
            head_tags: vec![HeadTag::stylesheet(css_url), HeadTag::module_script(js_url)],
        }
    }

    /// Provider default templates, no injected tags.
    pub fn standard() -> Self {
        Self {
            rendering_mode: RenderingMode::Standard,
            head_tags: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// The two Management API calls the deploy and cleanup commands make.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Client-credentials exchange; returns a bearer token.
    async fn fetch_token(&self) -> Result<String, ApiError>;

    /// Replace the rendering configuration of one prompt/screen.
    async fn update_rendering(
        &self,
        token: &str,
        target: &PromptScreen,
        config: &RenderingConfig,
    ) -> Result<(), ApiError>;
}
