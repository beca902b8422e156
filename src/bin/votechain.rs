#![forbid(unsafe_code)]
//! votechain - record votes on a hash-linked ledger and audit exported chains

use clap::{Parser, Subcommand};
use colored::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use votechain::cli::{audit_file, MenuSession};
use votechain::config::{load_config, load_config_from};
use votechain::election::Election;
use votechain::error::VoteError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults to ./votechain.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the interactive voting menu
    Run,
    /// Validates a chain exported as JSON
    Audit {
        /// The exported chain file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, VoteError> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let election = Election::new(config.election.name.clone());
            let stdin = io::stdin();
            let mut session =
                MenuSession::new(election, config.display.clone(), stdin.lock(), io::stdout());
            session.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Audit { file } => match audit_file(&file)?.ensure_valid() {
            Ok(()) => {
                println!("{} {}", "✅".green(), "Chain is valid".green().bold());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("{} {}", "❌".red(), e.to_string().red().bold());
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
