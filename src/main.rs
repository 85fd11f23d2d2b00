//! storagetester CLI entry point

use anyhow::{Context, Result};
use storagetester::config::cli::Cli;
use storagetester::{output, run_benchmark};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let config = cli.to_config().context("Invalid command line arguments")?;

    eprintln!("storagetester v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("{}", config);
    eprintln!();

    let snapshot = run_benchmark(&config)
        .with_context(|| format!("Benchmark against {} failed", config.file_path.display()))?;

    let report = output::render(&snapshot, config.output_format).context("Failed to render report")?;
    println!("{}", report.trim_end());

    Ok(())
}

/// Log to stderr so stdout carries only the report
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::new(format!("storagetester={}", level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
