mod cli;
mod commands;
mod logging;
mod models;
mod services;

use crate::cli::parser::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init_console(cli.verbose);

    commands::clean::run(&cli)
}
