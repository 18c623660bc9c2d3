mod cli;
mod commands;
mod concept;
mod config;
mod error;
mod import;
mod logging;
mod output;
mod progress;
mod store;

use clap::Parser;
use error::ErrorFormatter;

fn main() {
    logging::init();
    let cli = cli::Cli::parse();
    let verbose = cli.verbose;

    if let Err(err) = commands::dispatch(cli) {
        eprintln!("{}", ErrorFormatter::new(verbose).format(&err));
        std::process::exit(1);
    }
}
