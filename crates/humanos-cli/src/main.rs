mod clock;
mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    cache::CacheSubcommand, catalog::CatalogSubcommand, settings::SettingsSubcommand,
    status::StatusSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "humanos",
    about = "Daily routine tracker with a weekly schedule and a step-by-step runner",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root holding .humanos/ (default: nearest .humanos/ upward, else $HOME)
    #[arg(long, global = true, env = "HUMANOS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Pretend the local time is this (YYYY-MM-DDTHH:MM[:SS])
    #[arg(long, global = true, env = "HUMANOS_NOW", hide = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's routines with their status
    Today,

    /// Show which routines run on each weekday
    Week,

    /// Fetch the routine catalog again, ignoring today's cache
    Refresh,

    /// Step through a routine interactively
    Run {
        /// Routine id
        id: String,
    },

    /// Read and change routine statuses
    Status {
        #[command(subcommand)]
        subcommand: StatusSubcommand,
    },

    /// Source URL and developer mode
    Settings {
        #[command(subcommand)]
        subcommand: SettingsSubcommand,
    },

    /// Manage the cached routine catalog
    Cache {
        #[command(subcommand)]
        subcommand: CacheSubcommand,
    },

    /// Inspect or replace the raw routine catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let now = match clock::resolve_now(cli.now.as_deref()) {
        Ok(now) => now,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };

    let result = match cli.command {
        Commands::Today => cmd::today::run(&root, now, cli.json),
        Commands::Week => cmd::week::run(&root, now, cli.json),
        Commands::Refresh => cmd::refresh::run(&root, now, cli.json),
        Commands::Run { id } => cmd::run::run(&root, now, &id, cli.json),
        Commands::Status { subcommand } => cmd::status::run(&root, now, subcommand, cli.json),
        Commands::Settings { subcommand } => cmd::settings::run(&root, subcommand, cli.json),
        Commands::Cache { subcommand } => cmd::cache::run(&root, subcommand, cli.json),
        Commands::Catalog { subcommand } => cmd::catalog::run(&root, now, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
