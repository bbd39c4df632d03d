mod app;
mod cli;
mod commands;
mod config;
mod countdown;
mod dashboard;
mod data_url;
mod display;
mod error;
mod logging;
mod slideshow;
mod store;
mod theme;
mod timer;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
