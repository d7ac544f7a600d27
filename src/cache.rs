//! JSON cache of fetched Intervals.icu data
//!
//! `fetch` writes each data source to `<data_dir>/<name>.json`; every other
//! command reads from here instead of calling the API.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "TRAINING_SYNC_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "data";

pub const ACTIVITIES_FILE: &str = "activities.json";
pub const WELLNESS_FILE: &str = "wellness.json";
pub const POWER_CURVES_FILE: &str = "power_curves.json";
pub const SPORT_SETTINGS_FILE: &str = "sport_settings.json";
pub const PROFILE_FILE: &str = "profile.json";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
  #[error("Cache I/O failed for {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Corrupt cache file {path}: {source}")]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Directory holding cached JSON files
#[derive(Debug, Clone)]
pub struct DataCache {
  dir: PathBuf,
}

impl DataCache {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// `$TRAINING_SYNC_DATA_DIR`, else `./data`
  pub fn from_env() -> Self {
    Self::new(env::var_os(DATA_DIR_ENV).map(PathBuf::from).unwrap_or_else(|| DEFAULT_DATA_DIR.into()))
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path(&self, filename: &str) -> PathBuf {
    self.dir.join(filename)
  }

  /// Write pretty-printed JSON, creating the directory if needed
  pub fn save_json<T: Serialize + ?Sized>(&self, filename: &str, data: &T) -> Result<PathBuf, CacheError> {
    fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
      path: self.dir.clone(),
      source,
    })?;

    let path = self.path(filename);
    let json = serde_json::to_string_pretty(data).map_err(|source| CacheError::Json {
      path: path.clone(),
      source,
    })?;
    fs::write(&path, json).map_err(|source| CacheError::Io {
      path: path.clone(),
      source,
    })?;

    debug!(path = %path.display(), "cached");
    Ok(path)
  }

  /// Read a cached file; `None` when it has never been fetched
  pub fn load_json<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>, CacheError> {
    let path = self.path(filename);
    if !path.exists() {
      return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|source| CacheError::Io {
      path: path.clone(),
      source,
    })?;
    serde_json::from_str(&text)
      .map(Some)
      .map_err(|source| CacheError::Json { path, source })
  }
}
