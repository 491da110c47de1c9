use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use roster_lib::{
    FormController, Outcome, StoreConfig,
    store::{MemoryStore, RecordStore, RestStore},
};
use sysexits::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::terminal::{TerminalNotifier, TerminalPrompt};

mod shell;
mod student;
mod terminal;

pub type Controller = FormController<Box<dyn RecordStore>, TerminalNotifier, TerminalPrompt>;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Keep records in memory instead of the hosted table
    #[arg(long, global = true)]
    offline: bool,

    /// Delete without asking for confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Read settings from this file instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    #[command(flatten)]
    Student(student::Command),
    /// Start an interactive session
    Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    let store = match open_store(&cli) {
        Ok(store) => store,
        Err(err) => {
            error!("Unable to open the record store: {err}");
            eprintln!("{}", err.to_string().red());
            return ExitCode::Config;
        }
    };

    let mut controller = FormController::new(store, TerminalNotifier, TerminalPrompt::new(cli.yes));

    match &cli.command {
        Command::Student(cmd) => student::handle(&mut controller, cmd).await,
        Command::Shell => shell::run(&mut controller).await,
    }
}

fn open_store(cli: &Cli) -> roster_lib::Result<Box<dyn RecordStore>> {
    if cli.offline {
        return Ok(Box::new(MemoryStore::new()));
    }

    let cfg = match &cli.config {
        Some(path) => StoreConfig::load_from(path)?,
        None => StoreConfig::load()?,
    };

    Ok(Box::new(RestStore::new(&cfg)?))
}

/// Map a controller outcome onto the process exit status. Failures were already reported.
pub fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed | Outcome::Declined | Outcome::Skipped => ExitCode::Ok,
        Outcome::Failed => ExitCode::Unavailable,
    }
}
