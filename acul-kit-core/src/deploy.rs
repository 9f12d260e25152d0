//! Deploy and cleanup: point tenant screens at the current build, or back to defaults.
//!
//! Both commands resolve the work set, acquire one token (fatal on failure),
//! then for each screen map it to its prompt/screen pair and send one rendering
//! update, pausing `request_delay` between requests. A failed screen is logged,
//! counted and left alone; there are no retries.

use std::time::Duration;
use tracing::{error, info};

use crate::config::HarnessConfig;
use crate::contract::{ApiError, ManagementApi, RenderingConfig};
use crate::manifest::{known_screens, ManifestError};
use crate::report::{ItemOutcome, RunSummary};
use crate::screens::map_screen;
use crate::versions::{LedgerError, VersionLedger};

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("no build version found in {dist_dir}; run the build command first")]
    MissingBuild { dist_dir: String },
    #[error("authentication with the Management API failed: {0}")]
    Auth(#[source] ApiError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug)]
pub struct DeployReport {
    /// Version the screens were pointed at; `None` for cleanup.
    pub version: Option<String>,
    pub outcomes: Vec<ItemOutcome>,
}

impl DeployReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes)
    }
}

/// `{base_url}/{version}/styles.css`
pub fn stylesheet_url(base_url: &str, version: &str) -> String {
    format!("{}/{version}/styles.css", base_url.trim_end_matches('/'))
}

/// `{base_url}/{version}/{screen}/component.js`
pub fn component_url(base_url: &str, version: &str, screen_id: &str) -> String {
    format!(
        "{}/{version}/{screen_id}/component.js",
        base_url.trim_end_matches('/')
    )
}

/// Point each screen (all known screens when `screens` is empty) at the current build.
pub async fn deploy<A>(
    api: &A,
    config: &HarnessConfig,
    screens: &[String],
) -> Result<DeployReport, DeployError>
where
    A: ManagementApi + ?Sized,
{
    let ledger = VersionLedger::new(&config.paths.dist_dir);
    let version = ledger.current()?.ok_or_else(|| DeployError::MissingBuild {
        dist_dir: config.paths.dist_dir.display().to_string(),
    })?;
    let version_dir = ledger.version_dir(&version);
    let css_url = stylesheet_url(&config.base_url, &version);
    info!(version = %version, css_url = %css_url, "[DEPLOY] Starting deployment");

    let outcomes = apply_rendering(api, config, screens, "DEPLOY", |screen_id| {
        if !version_dir.join(screen_id).join("component.js").exists() {
            return Err("component file not found".to_string());
        }
        Ok(RenderingConfig::advanced(
            &css_url,
            &component_url(&config.base_url, &version, screen_id),
        ))
    })
    .await?;

    Ok(DeployReport {
        version: Some(version),
        outcomes,
    })
}

/// Reset each screen (all known screens when `screens` is empty) to standard rendering.
/// Local build output is left untouched.
pub async fn cleanup<A>(
    api: &A,
    config: &HarnessConfig,
    screens: &[String],
) -> Result<DeployReport, DeployError>
where
    A: ManagementApi + ?Sized,
{
    info!("[CLEANUP] Starting cleanup");
    let outcomes = apply_rendering(api, config, screens, "CLEANUP", |_| {
        Ok(RenderingConfig::standard())
    })
    .await?;
    Ok(DeployReport {
        version: None,
        outcomes,
    })
}

async fn apply_rendering<A, F>(
    api: &A,
    config: &HarnessConfig,
    screens: &[String],
    stage: &str,
    mut rendering_for: F,
) -> Result<Vec<ItemOutcome>, DeployError>
where
    A: ManagementApi + ?Sized,
    F: FnMut(&str) -> Result<RenderingConfig, String>,
{
    // A broken manifest is a configuration error; resolve it before any request.
    let work_set = if screens.is_empty() {
        known_screens(&config.paths.samples_dir)?
    } else {
        screens.to_vec()
    };
    info!(stage, screens = work_set.len(), "Resolved screens");

    let token = api.fetch_token().await.map_err(|e| {
        error!(stage, error = %e, "Authentication failed");
        DeployError::Auth(e)
    })?;
    info!(stage, "Authenticated with Management API");

    let mut outcomes = Vec::with_capacity(work_set.len());
    let mut requests_sent = 0usize;
    for screen_id in &work_set {
        let rendering = match rendering_for(screen_id) {
            Ok(rendering) => rendering,
            Err(reason) => {
                error!(stage, screen = %screen_id, reason = %reason, "Skipping screen");
                outcomes.push(ItemOutcome::failed(screen_id, reason));
                continue;
            }
        };

        if requests_sent > 0 {
            pause(config.request_delay).await;
        }
        requests_sent += 1;

        let target = map_screen(screen_id);
        info!(stage, prompt = %target.prompt, screen = %target.screen, "Updating rendering");
        match api.update_rendering(&token, &target, &rendering).await {
            Ok(()) => {
                info!(stage, screen = %screen_id, "Updated");
                outcomes.push(ItemOutcome::succeeded(screen_id));
            }
            Err(e) => {
                error!(stage, screen = %screen_id, error = %e, "Update failed");
                outcomes.push(ItemOutcome::failed(screen_id, e.to_string()));
            }
        }
    }
    Ok(outcomes)
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
