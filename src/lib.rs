pub mod analysis;
pub mod cache;
pub mod commands;
pub mod config;
pub mod display;
pub mod fetcher;
pub mod intervals;
pub mod models;
pub mod planner;
pub mod pusher;

#[cfg(test)]
mod test_utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use commands::{CommandError, Context};
use fetcher::DEFAULT_FETCH_DAYS;

#[derive(Parser, Debug)]
#[command(
  name = "training-sync",
  version,
  about = "Parse weekly block plans and sync them with the Intervals.icu calendar",
  after_help = "Workflow: fetch → analyze → plan-week --dry-run → push | clean"
)]
pub struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Path to config.toml (default: $TRAINING_SYNC_CONFIG, then ./config.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
  /// Pull data from Intervals.icu
  Fetch {
    /// Days of history
    #[arg(long, default_value_t = DEFAULT_FETCH_DAYS)]
    days: u32,
  },

  /// Show weekly training summary
  Analyze {
    /// Week number (default: current)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    week: Option<u32>,
  },

  /// Parse block markdown into workouts
  PlanWeek {
    /// Week number (default: next week)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    week: Option<u32>,

    /// Preview only
    #[arg(long)]
    dry_run: bool,
  },

  /// Push workouts to Intervals.icu calendar
  Push {
    /// Week number (default: next week)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    week: Option<u32>,

    /// Preview API payloads without sending
    #[arg(long)]
    dry_run: bool,
  },

  /// Remove stale events from Intervals.icu calendar
  Clean {
    /// Week number (default: next week)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    week: Option<u32>,

    /// Preview stale events without deleting
    #[arg(long)]
    dry_run: bool,
  },

  /// Quick fitness dashboard
  Status,

  /// Compare configured FTP vs detected eFTP
  Zones {
    /// Update the config without asking
    #[arg(long, short = 'y')]
    yes: bool,
  },
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

async fn dispatch(cli: Cli) -> Result<(), CommandError> {
  let ctx = Context::load(cli.config.as_deref())?;

  match cli.command {
    Command::Fetch { days } => commands::fetch::run(&ctx, days).await,
    Command::Analyze { week } => commands::analyze::run(&ctx, week),
    Command::PlanWeek { week, dry_run } => commands::plan::plan_week(&ctx, week, dry_run),
    Command::Push { week, dry_run } => commands::plan::push(&ctx, week, dry_run).await,
    Command::Clean { week, dry_run } => commands::plan::clean(&ctx, week, dry_run).await,
    Command::Status => commands::status::status(&ctx),
    Command::Zones { yes } => commands::status::zones(&ctx, yes),
  }
}

pub async fn run() -> ExitCode {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = Cli::parse();
  init_logging(cli.verbose);

  match dispatch(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::debug!(error = ?e, "command failed");
      eprintln!("{}", display::bad(&format!("Error: {}", e)));
      ExitCode::FAILURE
    }
  }
}
