pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront operator CLI",
    long_about = "Prepare the storefront catalog database and inspect effective configuration.",
    after_help = "Examples:\n  storefront migrate\n  storefront seed\n  storefront config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the demo catalog (4 categories, 10 products) and verify every row")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
