//! Fetch pipeline: discover example markdown → extract → repair → write samples.
//!
//! # Responsibilities
//! - Discover candidate files through a [`SampleSource`] and narrow them by pattern
//! - Download each file sequentially; one bad download never stops the batch
//! - Keep the best code sample per document, repair it, write `{screen}.tsx`
//! - Write `manifest.json` and `index.ts` for the build step
//!
//! # Error Handling
//! Discovery problems ([`FetchError::NoRemoteFiles`], [`FetchError::NoMatch`]) and
//! manifest I/O are fatal. Everything per file lands in the report instead.

use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::{HarnessConfig, RemoteConfig};
use crate::contract::{SampleSource, SourceError};
use crate::extract::{best_sample, extract_samples};
use crate::manifest::{Manifest, ManifestError};
use crate::repair::repair;
use crate::report::{ItemOutcome, RunSummary};

/// Published examples, used when the directory listing is unavailable.
pub const STATIC_EXAMPLE_FILES: &[&str] = &[
    "login.md",
    "login-id.md",
    "login-password.md",
    "signup.md",
    "signup-id.md",
    "signup-password.md",
    "consent.md",
    "device-code-confirmation.md",
    "email-otp-challenge.md",
    "email-verification-result.md",
    "login-email-verification.md",
    "logout.md",
    "logout-complete.md",
    "mfa-enroll-result.md",
    "mfa-login-options.md",
    "mfa-otp-enrollment-code.md",
    "organization-picker.md",
    "organization-selection.md",
    "redeem-ticket.md",
    "reset-password-request.md",
];

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to discover remote example files: {0}")]
    Discovery(#[source] SourceError),
    #[error("no remote example files found")]
    NoRemoteFiles,
    #[error("no example files match {patterns:?}")]
    NoMatch { patterns: Vec<String> },
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

#[derive(Debug)]
pub struct FetchReport {
    pub manifest: Manifest,
    pub outcomes: Vec<ItemOutcome>,
}

impl FetchReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes)
    }
}

/// Keep names containing any pattern, case-insensitively. No patterns keeps all.
pub fn filter_files(files: &[String], patterns: &[String]) -> Vec<String> {
    if patterns.is_empty() {
        return files.to_vec();
    }
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    files
        .iter()
        .filter(|file| {
            let file = file.to_lowercase();
            patterns.iter().any(|p| file.contains(p.as_str()))
        })
        .cloned()
        .collect()
}

pub async fn fetch_all<S>(
    source: &S,
    config: &HarnessConfig,
    patterns: &[String],
) -> Result<FetchReport, FetchError>
where
    S: SampleSource + ?Sized,
{
    info!("[FETCH] Discovering example files");
    let mut files: Vec<String> = source
        .list_files()
        .await
        .map_err(FetchError::Discovery)?
        .into_iter()
        .filter(|name| name.ends_with(".md"))
        .collect();
    files.sort();
    files.dedup();
    if files.is_empty() {
        error!("[FETCH] Remote listing contained no markdown files");
        return Err(FetchError::NoRemoteFiles);
    }

    let selected = filter_files(&files, patterns);
    if selected.is_empty() {
        error!(?patterns, "[FETCH] No example files match the given patterns");
        return Err(FetchError::NoMatch {
            patterns: patterns.to_vec(),
        });
    }
    info!(
        discovered = files.len(),
        selected = selected.len(),
        "[FETCH] Selected example files"
    );

    let samples_dir = &config.paths.samples_dir;
    fs::create_dir_all(samples_dir).map_err(|source| FetchError::Io {
        path: samples_dir.clone(),
        source,
    })?;

    let mut manifest = Manifest::default();
    let mut outcomes = Vec::with_capacity(selected.len());

    for filename in &selected {
        let screen_id = filename.trim_end_matches(".md");
        info!(file = %filename, "[FETCH] Fetching");

        let markdown = match source.fetch_file(filename).await {
            Ok(text) => text,
            Err(e) => {
                error!(file = %filename, error = %e, "[FETCH][ERROR] Download failed");
                outcomes.push(ItemOutcome::failed(screen_id, e.to_string()));
                continue;
            }
        };

        let samples = extract_samples(&markdown);
        let Some(best) = best_sample(&samples) else {
            warn!(file = %filename, "[FETCH] No code samples found");
            outcomes.push(ItemOutcome::skipped(screen_id, "no code samples found"));
            continue;
        };

        let code = repair(best, screen_id);
        let out_path = samples_dir.join(format!("{screen_id}.tsx"));
        if let Err(e) = fs::write(&out_path, code) {
            error!(path = %out_path.display(), error = ?e, "[FETCH][ERROR] Failed to write sample");
            outcomes.push(ItemOutcome::failed(screen_id, e.to_string()));
            continue;
        }

        info!(
            screen = screen_id,
            samples = samples.len(),
            chosen = best.index,
            "[FETCH] Saved sample"
        );
        manifest.insert(screen_id, samples.len());
        outcomes.push(ItemOutcome::succeeded(screen_id));
    }

    manifest.save(samples_dir)?;
    info!(screens = manifest.len(), "[FETCH] Processed examples");

    Ok(FetchReport { manifest, outcomes })
}

#[derive(serde::Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Example files hosted in the `auth0/universal-login` GitHub repository.
pub struct GithubSampleSource {
    client: reqwest::Client,
    remote: RemoteConfig,
}

impl GithubSampleSource {
    pub fn new(remote: RemoteConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("acul-kit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Transport {
                url: remote.raw_base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, remote })
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|e| SourceError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn list_remote(&self, url: &str) -> Result<Vec<String>, SourceError> {
        let body = self.get_text(url).await?;
        let entries: Vec<ListingEntry> =
            serde_json::from_str(&body).map_err(|e| SourceError::Listing {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .map(|entry| entry.name)
            .collect())
    }
}

#[async_trait::async_trait]
impl SampleSource for GithubSampleSource {
    async fn list_files(&self) -> Result<Vec<String>, SourceError> {
        let static_list =
            || -> Vec<String> { STATIC_EXAMPLE_FILES.iter().map(|f| f.to_string()).collect() };
        let Some(url) = self.remote.listing_url.as_deref() else {
            info!("No listing URL configured, using built-in example list");
            return Ok(static_list());
        };
        match self.list_remote(url).await {
            Ok(files) => {
                info!(url, count = files.len(), "Listed remote example files");
                Ok(files)
            }
            Err(e) => {
                warn!(url, error = %e, "Listing failed, using built-in example list");
                Ok(static_list())
            }
        }
    }

    async fn fetch_file(&self, filename: &str) -> Result<String, SourceError> {
        let base = self.remote.raw_base_url.trim_end_matches('/');
        self.get_text(&format!("{base}/{filename}")).await
    }
}
