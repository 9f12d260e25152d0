//! Build pipeline: samples on disk → one versioned directory of browser bundles.
//!
//! Each run mints a fresh version, removes every earlier version directory,
//! bundles each screen through a mount wrapper, compiles the shared stylesheet,
//! writes an index page and finally promotes the version pointer. A screen that
//! fails to bundle gets an inert placeholder module so deploys always have a
//! script to reference.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::{error, info, warn};

use crate::config::HarnessConfig;
use crate::contract::{BundleError, Bundler};
use crate::manifest::{known_screens, ManifestError};
use crate::report::{ItemOutcome, RunSummary};
use crate::versions::{mint_version, LedgerError, VersionLedger};

pub const MOUNT_ELEMENT_ID: &str = "auth0-acul-root";

static NAMED_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:const|function)\s+([A-Za-z_$][\w$]*)")
        .expect("named export pattern is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stylesheet compilation failed: {0}")]
    Styles(#[source] BundleError),
}

#[derive(Debug)]
pub struct BuildReport {
    pub version: String,
    pub removed_versions: Vec<String>,
    pub outcomes: Vec<ItemOutcome>,
}

impl BuildReport {
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes)
    }
}

/// How the wrapper gets hold of the sample's component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentExport {
    Default,
    Named(String),
}

/// Prefer the default export; otherwise the first exported const or function.
pub fn detect_export(source: &str) -> ComponentExport {
    if source.contains("export default") {
        return ComponentExport::Default;
    }
    NAMED_EXPORT
        .captures(source)
        .map(|caps| ComponentExport::Named(caps[1].to_string()))
        .unwrap_or(ComponentExport::Default)
}

/// Entry module that mounts the sample into `#auth0-acul-root` once the DOM is ready.
pub fn wrapper_module(screen_id: &str, export: &ComponentExport) -> String {
    let import = match export {
        ComponentExport::Default => format!("import Component from './{screen_id}';"),
        ComponentExport::Named(name) => {
            format!("import {{ {name} as Component }} from './{screen_id}';")
        }
    };
    format!(
        r#"import React from 'react';
import {{ createRoot }} from 'react-dom/client';
{import}

if (document.readyState === 'loading') {{
  document.addEventListener('DOMContentLoaded', initComponent);
}} else {{
  initComponent();
}}

function initComponent() {{
  let container = document.getElementById('{MOUNT_ELEMENT_ID}');
  if (!container) {{
    container = document.createElement('div');
    container.id = '{MOUNT_ELEMENT_ID}';
    document.body.appendChild(container);
  }}
  createRoot(container).render(<Component />);
}}
"#
    )
}

/// Stand-in `component.js` for a screen whose bundle failed.
pub fn placeholder_module(screen_id: &str) -> String {
    format!(
        r#"// Build failed for {screen_id}; original source: {screen_id}.tsx
console.warn('Component {screen_id} has build errors and may not function correctly');
export default function Placeholder() {{
  return null;
}}
"#
    )
}

const LINK_CLASS: &str = "p-4 bg-white rounded shadow";

fn index_page(version: &str, base_url: &str, css_bytes: u64, screens: &[String]) -> String {
    let links: String = screens
        .iter()
        .map(|s| format!(r#"<a href="/{version}/{s}/component.tsx" class="{LINK_CLASS}">{s}</a>"#))
        .collect();
    let css_kb = (css_bytes as f64 / 1024.0).round() as u64;
    format!(
        r#"<!DOCTYPE html>
<html><head><meta charset="UTF-8"><title>Auth0 ACUL {version}</title><link rel="stylesheet" href="/{version}/styles.css"></head>
<body class="bg-gray-50 p-8"><div class="max-w-4xl mx-auto">
<h1 class="text-3xl font-bold mb-6">Auth0 ACUL Samples</h1>
<div class="bg-blue-50 p-4 rounded mb-6">
<p class="font-semibold">Version: <code>{version}</code></p>
<p class="font-semibold">CSS: <code>{base_url}/{version}/styles.css</code> ({css_kb} KB)</p>
</div>
<div class="grid grid-cols-3 gap-4">
{links}
</div></div></body></html>
"#
    )
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn build_all<B>(bundler: &B, config: &HarnessConfig) -> Result<BuildReport, BuildError>
where
    B: Bundler + ?Sized,
{
    let samples_dir = &config.paths.samples_dir;
    let screens = known_screens(samples_dir)?;
    info!(screens = screens.len(), "[BUILD] Starting build");

    let ledger = VersionLedger::new(&config.paths.dist_dir);
    let removed_versions = ledger.prune()?;

    let version = mint_version();
    ledger.append(&version)?;
    let version_dir = ledger.version_dir(&version);
    fs::create_dir_all(&version_dir).map_err(|source| BuildError::Io {
        path: version_dir.clone(),
        source,
    })?;
    info!(version = %version, "[BUILD] Minted version");

    let mut outcomes = Vec::with_capacity(screens.len());
    for screen_id in &screens {
        let outcome = build_screen(bundler, samples_dir, &version_dir, screen_id).await?;
        outcomes.push(outcome);
    }

    let css_path = version_dir.join("styles.css");
    info!("[BUILD] Compiling stylesheet");
    bundler
        .compile_styles(&config.paths.styles_input, &css_path)
        .await
        .map_err(|e| {
            error!(error = %e, "[BUILD][ERROR] Stylesheet compilation failed");
            BuildError::Styles(e)
        })?;
    let css_bytes = fs::metadata(&css_path).map(|m| m.len()).unwrap_or(0);

    let index_path = version_dir.join("index.html");
    write_file(
        &index_path,
        &index_page(&version, &config.base_url, css_bytes, &screens),
    )?;

    ledger.promote(&version)?;
    info!(version = %version, "[BUILD] Build complete");

    Ok(BuildReport {
        version,
        removed_versions,
        outcomes,
    })
}

/// Per-screen failures become outcomes; only I/O on the version directory is an error.
async fn build_screen<B>(
    bundler: &B,
    samples_dir: &Path,
    version_dir: &Path,
    screen_id: &str,
) -> Result<ItemOutcome, BuildError>
where
    B: Bundler + ?Sized,
{
    let source_path = samples_dir.join(format!("{screen_id}.tsx"));
    let source = match fs::read_to_string(&source_path) {
        Ok(source) => source,
        Err(e) => {
            warn!(screen = screen_id, error = ?e, "[BUILD] Source file missing, skipping");
            return Ok(ItemOutcome::skipped(screen_id, "source file not found"));
        }
    };

    let screen_dir = version_dir.join(screen_id);
    fs::create_dir_all(&screen_dir).map_err(|source| BuildError::Io {
        path: screen_dir.clone(),
        source,
    })?;
    write_file(&screen_dir.join("component.tsx"), &source)?;

    let wrapper_path = samples_dir.join(format!("{screen_id}.wrapper.tsx"));
    write_file(
        &wrapper_path,
        &wrapper_module(screen_id, &detect_export(&source)),
    )?;

    let bundle_path = screen_dir.join("component.js");
    match bundler.bundle(&wrapper_path, &bundle_path).await {
        Ok(()) => {
            info!(screen = screen_id, "[BUILD] Bundled");
            Ok(ItemOutcome::succeeded(screen_id))
        }
        Err(e) => {
            warn!(screen = screen_id, error = %e, "[BUILD] Bundle failed, writing placeholder");
            write_file(&bundle_path, &placeholder_module(screen_id))?;
            Ok(ItemOutcome::recovered(
                screen_id,
                format!("placeholder module: {e}"),
            ))
        }
    }
}

/// Runs esbuild and tailwindcss through `npx` from the current directory.
pub struct EsbuildBundler {
    npx: String,
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self {
            npx: "npx".to_string(),
        }
    }
}

impl EsbuildBundler {
    fn run(&self, tool: &str, args: &[String]) -> Result<(), BundleError> {
        match Command::new(&self.npx).arg(tool).args(args).status() {
            Ok(s) if s.success() => {
                tracing::debug!(tool, status = ?s, "Tool finished");
                Ok(())
            }
            Ok(s) => Err(BundleError::Exit {
                tool: tool.to_string(),
                status: s.to_string(),
            }),
            Err(source) => Err(BundleError::Launch {
                tool: tool.to_string(),
                source,
            }),
        }
    }
}

#[async_trait::async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, entry: &Path, outfile: &Path) -> Result<(), BundleError> {
        self.run(
            "esbuild",
            &[
                entry.display().to_string(),
                "--bundle".to_string(),
                "--format=esm".to_string(),
                "--platform=browser".to_string(),
                "--target=es2022".to_string(),
                "--jsx=automatic".to_string(),
                "--sourcemap".to_string(),
                "--log-level=silent".to_string(),
                format!("--outfile={}", outfile.display()),
            ],
        )
    }

    async fn compile_styles(&self, input: &Path, output: &Path) -> Result<(), BundleError> {
        self.run(
            "tailwindcss",
            &[
                "-i".to_string(),
                input.display().to_string(),
                "-o".to_string(),
                output.display().to_string(),
                "--minify".to_string(),
            ],
        )
    }
}
