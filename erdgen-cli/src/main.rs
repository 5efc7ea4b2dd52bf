//! erdgen CLI - Command-line interface for the erdgen schema compiler.

use clap::Parser;

use erdgen_cli::cli::{Cli, Command};
use erdgen_cli::commands;
use erdgen_cli::error::CliResult;
use erdgen_cli::{logging, output};

fn main() {
    if let Err(e) = run() {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    match cli.command {
        Command::Compile(args) => commands::compile::run(args),
        Command::Validate(args) => commands::validate::run(args),
        Command::Inspect(args) => commands::inspect::run(args),
        Command::Version => commands::version::run(),
    }
}
