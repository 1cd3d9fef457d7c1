//! nanoscope-release binary

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use miette::Report;
use nanoscope_release_cli::cli::{self, EXIT_ERROR, EXIT_OK, render_error};
use nanoscope_release_cli::commands;
use nanoscope_release_cli::tracing::{TracingConfig, init_tracing};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.log_level.into(),
    };
    if let Err(report) = init_tracing(&tracing_config) {
        render_error(&report);
        std::process::exit(EXIT_ERROR);
    }

    match commands::execute(&cli) {
        Ok(output) => {
            println!("{output}");
            std::process::exit(EXIT_OK);
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            render_error(&Report::new(err));
            std::process::exit(EXIT_ERROR);
        }
    }
}
