/// # acul-kit CLI Interface (Module)
///
/// Command parsing and orchestration for the `acul-kit` binary. All pipeline
/// logic lives in `acul-kit-core`; this module builds the configuration,
/// picks the real implementations of the core traits, prints the per-command
/// summary and turns failed items into a non-zero exit.
///
/// ## How To Use
/// - Command line: `acul-kit --help`.
/// - Tests and embedding: construct a [`Cli`] and call [`run`].
use crate::auth0::Auth0Client;
use crate::load_config::{load_config, require_auth0};
use crate::serve;
use acul_kit_core::build::{build_all, EsbuildBundler};
use acul_kit_core::deploy::{cleanup, deploy};
use acul_kit_core::fetch::{fetch_all, GithubSampleSource};
use acul_kit_core::report::{ItemOutcome, ItemStatus, RunSummary};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Develop Auth0 ACUL screens from the published SDK examples.
#[derive(Parser)]
#[clap(
    name = "acul-kit",
    version,
    about = "Fetch, build, serve and deploy Auth0 ACUL sample screens"
)]
pub struct Cli {
    /// Optional YAML file overriding paths and remote URLs
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download example markdown and write repaired `.tsx` samples
    Fetch {
        /// Only fetch files whose name contains one of these (case-insensitive)
        patterns: Vec<String>,
    },
    /// Bundle every sample into a new versioned build directory
    Build,
    /// Point tenant screens at the current build (all known screens by default)
    Deploy { screens: Vec<String> },
    /// Reset tenant screens to standard rendering (all known screens by default)
    Cleanup { screens: Vec<String> },
    /// Serve the build output locally with permissive CORS
    Serve,
    /// Stop whatever is listening on the configured port
    Stop,
}

fn print_failures(outcomes: &[ItemOutcome]) {
    for outcome in outcomes {
        match &outcome.status {
            ItemStatus::Failed(reason) => println!("  ✗ {}: {reason}", outcome.screen),
            ItemStatus::Recovered(reason) => println!("  ! {}: {reason}", outcome.screen),
            ItemStatus::Skipped(reason) => println!("  - {}: {reason}", outcome.screen),
            ItemStatus::Succeeded => {}
        }
    }
}

/// Print the outcome table; `Err` (non-zero exit) when any item failed.
/// Recovered and skipped items do not fail the command.
pub fn finish(command: &str, outcomes: &[ItemOutcome]) -> Result<()> {
    let summary = RunSummary::from_outcomes(outcomes);
    print_failures(outcomes);
    println!("{command} summary:\n{summary}");
    tracing::info!(command, ?summary, "Command finished");
    if !summary.is_success() {
        bail!("{command}: {} of {} items failed", summary.failed, summary.total);
    }
    Ok(())
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { patterns } => {
            tracing::info!(command = "fetch", ?patterns, "Starting fetch");
            let source = GithubSampleSource::new(config.remote.clone())?;
            let report = fetch_all(&source, &config, &patterns).await?;
            println!(
                "Wrote {} samples to {}",
                report.manifest.len(),
                config.paths.samples_dir.display()
            );
            finish("fetch", &report.outcomes)
        }
        Commands::Build => {
            tracing::info!(command = "build", "Starting build");
            let bundler = EsbuildBundler::default();
            let report = build_all(&bundler, &config).await?;
            if !report.removed_versions.is_empty() {
                println!("Removed old versions: {}", report.removed_versions.join(", "));
            }
            println!("Built version {}", report.version);
            println!(
                "CSS: {}/{}/styles.css",
                config.base_url.trim_end_matches('/'),
                report.version
            );
            finish("build", &report.outcomes)
        }
        Commands::Deploy { screens } => {
            let api = Auth0Client::new(require_auth0(&config)?.clone());
            tracing::info!(command = "deploy", ?screens, "Starting deploy");
            let report = deploy(&api, &config, &screens).await?;
            if let Some(version) = &report.version {
                println!("Deployed version {version} from {}", config.base_url);
            }
            finish("deploy", &report.outcomes)
        }
        Commands::Cleanup { screens } => {
            let api = Auth0Client::new(require_auth0(&config)?.clone());
            tracing::info!(command = "cleanup", ?screens, "Starting cleanup");
            let report = cleanup(&api, &config, &screens).await?;
            finish("cleanup", &report.outcomes)
        }
        Commands::Serve => serve::serve(&config).await,
        Commands::Stop => {
            let killed = serve::stop(config.port)?;
            if killed == 0 {
                println!("No server running on port {}", config.port);
            } else {
                println!("Stopped {killed} process(es) on port {}", config.port);
            }
            Ok(())
        }
    }
}
