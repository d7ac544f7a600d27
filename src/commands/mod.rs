//! CLI command handlers
//!
//! Each handler loads what it needs through [`Context`], does its work and
//! prints through `display`. Failures bubble up as [`CommandError`].

pub mod analyze;
pub mod fetch;
pub mod plan;
pub mod status;

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

use crate::analysis::current_week_number;
use crate::cache::{CacheError, DataCache};
use crate::config::{resolve_config_path, AppConfig, ConfigError};
use crate::fetcher::FetchError;
use crate::intervals::{IntervalsClient, IntervalsError};
use crate::planner::{self, load_plan_documents, PlanError, PlannedWorkout};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Plan(#[from] PlanError),

  #[error(transparent)]
  Intervals(#[from] IntervalsError),

  #[error(transparent)]
  Cache(#[from] CacheError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error("No workouts found for week {week}. Check that a plan/block_*.md file covers this week.")]
  NoWorkouts { week: u32 },

  #[error("Failed to read answer: {0}")]
  Prompt(#[source] std::io::Error),
}

/// ---------------------------------------------------------------------------
/// Shared Context
/// ---------------------------------------------------------------------------

/// Config and cache every command runs against
#[derive(Debug)]
pub struct Context {
  pub config_path: PathBuf,
  pub config: AppConfig,
  pub cache: DataCache,
}

impl Context {
  pub fn load(cli_config: Option<&Path>) -> Result<Self, CommandError> {
    let config_path = resolve_config_path(cli_config);
    let config = AppConfig::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    Ok(Self {
      config_path,
      config,
      cache: DataCache::from_env(),
    })
  }

  pub fn today(&self) -> NaiveDate {
    Local::now().date_naive()
  }

  pub fn current_week(&self) -> u32 {
    current_week_number(&self.config, self.today())
  }

  /// Explicit week, or the one after the current week
  pub fn week_or_next(&self, week: Option<u32>) -> u32 {
    week.unwrap_or_else(|| self.current_week() + 1)
  }

  /// Workouts planned for `week`, failing when the plan has none
  pub fn planned_workouts(&self, week: u32) -> Result<Vec<PlannedWorkout>, CommandError> {
    let workouts = self.planned_workouts_or_empty(week)?;
    if workouts.is_empty() {
      return Err(CommandError::NoWorkouts { week });
    }
    Ok(workouts)
  }

  /// Workouts planned for `week`; a week the plan no longer mentions is empty
  pub fn planned_workouts_or_empty(&self, week: u32) -> Result<Vec<PlannedWorkout>, CommandError> {
    let documents = load_plan_documents(&self.config.plan_dir())?;
    match planner::parse_week(week, &documents, self.config.plan_year()) {
      Ok(workouts) => Ok(workouts),
      Err(PlanError::DocumentNotFound { .. }) => Ok(Vec::new()),
      Err(e) => Err(e.into()),
    }
  }

  pub fn client(&self) -> Result<IntervalsClient, CommandError> {
    Ok(IntervalsClient::from_env()?)
  }
}
