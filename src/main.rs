use clap::Parser;
use datesort::cli::{Args, run_cli};
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args);

    match run_cli(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so they never interleave with the per-entry report on stdout.
fn setup_logging(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if args.json_log {
        builder.json().init();
    } else {
        builder.init();
    }
}
