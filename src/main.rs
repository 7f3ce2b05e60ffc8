//! webflow-mirror main entry point
//!
//! Command-line interface for mirroring a published Webflow site into a
//! self-contained zip archive.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use webflow_mirror::config::{load_config_with_hash, Config};
use webflow_mirror::{janitor, run_job};

/// webflow-mirror: export a published Webflow site
///
/// Crawls the target site, downloads every referenced asset, rewrites
/// in-document references to the mirrored layout, and writes the result
/// as a zip archive.
#[derive(Parser, Debug)]
#[command(name = "webflow-mirror")]
#[command(version)]
#[command(about = "Export a published Webflow site as a zip archive", long_about = None)]
struct Cli {
    /// URL of the published site to mirror
    #[arg(value_name = "URL")]
    url: String,

    /// Where to write the zip archive
    #[arg(short, long, default_value = "webflow-site.zip")]
    output: PathBuf,

    /// Path to a TOML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!(
                "Configuration loaded from {} (hash: {})",
                path.display(),
                hash
            );
            config
        }
        None => {
            tracing::debug!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    // Independent maintenance: clears working areas leaked by earlier
    // crashes, then keeps sweeping while the job runs
    tokio::spawn(janitor::run_periodic(
        config.workspace.root.clone(),
        Duration::from_secs(config.workspace.stale_age_secs),
        Duration::from_secs(600),
    ));

    match run_job(&config, &cli.url).await {
        Ok(archive) => {
            std::fs::write(&cli.output, &archive)
                .with_context(|| format!("failed to write {}", cli.output.display()))?;
            tracing::info!(
                "Wrote {} ({} bytes)",
                cli.output.display(),
                archive.len()
            );
            println!("{}", cli.output.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webflow_mirror=info,warn"),
            1 => EnvFilter::new("webflow_mirror=debug,info"),
            2 => EnvFilter::new("webflow_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
