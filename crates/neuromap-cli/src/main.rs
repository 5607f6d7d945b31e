//! Neuromap CLI - edit and render a force-directed knowledge map

mod cli;
mod colorizer;

use clap::Parser;
use neuromap::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Initialize logging early; run() re-applies the CLI flags on top of
    // the environment defaults.
    if let Err(e) = init_logging(None, None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let mut app = cli::NeuromapApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
