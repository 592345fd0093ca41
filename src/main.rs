//! libcheck - Library version checker CLI
//!
//! Scans a build descriptor for library declarations and compares each
//! pinned version with the latest release on the primary registry, falling
//! back to the secondary registry for libraries the primary doesn't know.

use anyhow::Context;
use clap::Parser;
use libcheck::classify::Classifier;
use libcheck::cli::CliArgs;
use libcheck::config::Config;
use libcheck::extract::{read_descriptor, DeclarationScanner};
use libcheck::orchestrator::Orchestrator;
use libcheck::output::{create_formatter, OutputConfig};
use libcheck::registry::HttpClient;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var("LIBCHECK_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let start = Instant::now();

    // The removal list is only mandatory when flagging removals
    let loaded = Config::load(&args.config, args.migration).with_context(|| {
        format!(
            "the location of the config file can be specified via --config (looked in {})",
            args.config.display()
        )
    })?;
    let config = loaded.config;

    let client = HttpClient::with_timeout(config.registries.timeout())?;
    let orchestrator = Orchestrator::new(
        client,
        &config.registries.primary,
        &config.registries.secondary,
    );
    let classifier = Classifier::new(config.removal_set(), args.migration);

    let content = read_descriptor(&args.file).await?;
    let scanner = DeclarationScanner::new(&config.extract.organization)?;
    let specs = scanner.stream(content);

    let output_config = OutputConfig::from_cli(args.json, args.no_color, loaded.path);
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.begin(&mut stdout)?;

    let mut write_error = None;
    let report = orchestrator
        .run_with(specs, |outcome| {
            if let Err(e) = formatter.outcome(outcome, &classifier, &mut stdout) {
                write_error.get_or_insert(e);
            }
        })
        .await;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    formatter.finish(&report, &classifier, start.elapsed(), &mut stdout)?;
    stdout.flush()?;

    if report.has_errors() {
        // Partial success - some libraries couldn't be resolved
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
