//! eza-history - local history of EZA content analyses
//!
//! This is the main entry point for the eza-history command-line application.
//! Logging is set up by the CLI once the configuration is loaded.

use eza_history::cli;
use std::process;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
