// src/bin/cdash.rs

use clap::Parser;
use colored::*;
use commander_dash::cli::{Cli, dispatcher};

/// Entry point: sets up logging, parses arguments, dispatches to the action
/// handler and reports any error in one place.
fn main() {
    env_logger::init();

    if let Err(e) = dispatcher::dispatch(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
