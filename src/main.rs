//! tidl compiler CLI entry point

use clap::Parser;
use tidl::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Structured logging with env-based filter, defaulting to warn (debug with --verbose)
    let default = if cli.verbose() { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .try_init();

    tidl::cli::run(cli);
}
