//! Plan and athlete configuration
//!
//! Settings live in `config.toml`; credentials come from the environment
//! (see `intervals::IntervalsConfig`).

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const CONFIG_PATH_ENV: &str = "TRAINING_SYNC_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_PLAN_DIR: &str = "plan";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("Failed to write config {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Config {0} has no `ftp = <watts>` line to update")]
  MissingFtp(PathBuf),
}

/// ---------------------------------------------------------------------------
/// Config Structures
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
  pub athlete: AthleteConfig,
  pub plan: PlanConfig,
  #[serde(default)]
  pub phases: BTreeMap<String, PhaseBounds>,
  #[serde(default)]
  pub fatigue: FatigueConfig,
  #[serde(default)]
  pub zones: BTreeMap<String, u32>,
  /// Directory of the config file; relative paths resolve against it
  #[serde(skip)]
  pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteConfig {
  pub ftp: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
  /// First day of plan week 1
  pub start_date: NaiveDate,
  /// Year for week headers that don't name one; defaults to the start year
  #[serde(default)]
  pub year: Option<i32>,
  #[serde(default = "default_plan_dir")]
  pub dir: PathBuf,
}

fn default_plan_dir() -> PathBuf {
  PathBuf::from(DEFAULT_PLAN_DIR)
}

/// `[start_week, end_week, min_hours, max_hours]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBounds(pub u32, pub u32, pub f64, pub f64);

impl PhaseBounds {
  pub fn contains(&self, week: u32) -> bool {
    self.0 <= week && week <= self.1
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueConfig {
  #[serde(default = "default_tsb_warning")]
  pub tsb_warning: f64,
  /// Fraction to take off power targets, e.g. 0.05
  #[serde(default = "default_power_reduction")]
  pub power_reduction: f64,
  /// Watts of eFTP drift before suggesting new zones
  #[serde(default = "default_eftp_drift_threshold")]
  pub eftp_drift_threshold: f64,
}

fn default_tsb_warning() -> f64 {
  -20.0
}

fn default_power_reduction() -> f64 {
  0.05
}

fn default_eftp_drift_threshold() -> f64 {
  10.0
}

impl Default for FatigueConfig {
  fn default() -> Self {
    Self {
      tsb_warning: default_tsb_warning(),
      power_reduction: default_power_reduction(),
      eftp_drift_threshold: default_eftp_drift_threshold(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Loading
/// ---------------------------------------------------------------------------

/// `--config` if given, else `$TRAINING_SYNC_CONFIG`, else `./config.toml`
pub fn resolve_config_path(cli_path: Option<&Path>) -> PathBuf {
  cli_path
    .map(Path::to_path_buf)
    .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl AppConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let mut config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_default();
    Ok(config)
  }

  pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(text)
  }

  pub fn plan_year(&self) -> i32 {
    self.plan.year.unwrap_or_else(|| self.plan.start_date.year())
  }

  pub fn plan_dir(&self) -> PathBuf {
    self.base_dir.join(&self.plan.dir)
  }
}

fn ftp_line() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(?m)^(ftp\s*=\s*)\d+").expect("valid ftp regex"))
}

/// Rewrite the first `ftp = N` line in place, leaving the rest of the file untouched.
pub fn update_config_ftp(path: &Path, new_ftp: u32) -> Result<(), ConfigError> {
  let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let re = ftp_line();
  if !re.is_match(&text) {
    return Err(ConfigError::MissingFtp(path.to_path_buf()));
  }
  let updated = re.replacen(&text, 1, format!("${{1}}{}", new_ftp));

  fs::write(path, updated.as_bytes()).map_err(|source| ConfigError::Write {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::SAMPLE_CONFIG;
  use serial_test::serial;

  #[test]
  fn test_parse_sample_config() {
    let config = AppConfig::from_toml(SAMPLE_CONFIG).unwrap();
    assert_eq!(config.athlete.ftp, 250);
    assert_eq!(config.plan.start_date, NaiveDate::from_ymd_opt(2030, 2, 11).unwrap());
    assert_eq!(config.plan_year(), 2030);
    assert_eq!(config.plan.dir, PathBuf::from("plan"));
    assert_eq!(config.phases["base"], PhaseBounds(1, 4, 6.0, 8.0));
    assert_eq!(config.fatigue.tsb_warning, -20.0);
    assert_eq!(config.zones["z2"], 65);
  }

  #[test]
  fn test_defaults_for_optional_sections() {
    let config = AppConfig::from_toml(
      "[athlete]\nftp = 200\n[plan]\nstart_date = \"2026-02-09\"\nyear = 2027\n",
    )
    .unwrap();
    assert_eq!(config.plan_year(), 2027);
    assert!(config.phases.is_empty());
    assert_eq!(config.fatigue.power_reduction, 0.05);
    assert_eq!(config.fatigue.eftp_drift_threshold, 10.0);
  }

  #[test]
  fn test_load_resolves_plan_dir_against_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.plan_dir(), dir.path().join("plan"));
  }

  #[test]
  fn test_load_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[athlete]\nftp = \"lots\"\n").unwrap();
    assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    assert!(matches!(
      AppConfig::load(&dir.path().join("missing.toml")),
      Err(ConfigError::Read { .. })
    ));
  }

  #[test]
  fn test_update_config_ftp_preserves_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE_CONFIG).unwrap();

    update_config_ftp(&path, 262).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("ftp = 262"));
    assert_eq!(text.replace("ftp = 262", "ftp = 250"), SAMPLE_CONFIG);
  }

  #[test]
  fn test_update_config_ftp_requires_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[athlete]\n").unwrap();
    assert!(matches!(update_config_ftp(&path, 200), Err(ConfigError::MissingFtp(_))));
  }

  #[test]
  #[serial]
  fn test_resolve_config_path_precedence() {
    temp_env::with_var(CONFIG_PATH_ENV, Some("/etc/plan.toml"), || {
      assert_eq!(resolve_config_path(None), PathBuf::from("/etc/plan.toml"));
      assert_eq!(
        resolve_config_path(Some(Path::new("cli.toml"))),
        PathBuf::from("cli.toml")
      );
    });
    temp_env::with_var_unset(CONFIG_PATH_ENV, || {
      assert_eq!(resolve_config_path(None), PathBuf::from("config.toml"));
    });
  }
}
