//! Pull every data source from Intervals.icu into the local cache.

use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tracing::info;

use crate::cache::{
  CacheError, DataCache, ACTIVITIES_FILE, POWER_CURVES_FILE, PROFILE_FILE, SPORT_SETTINGS_FILE,
  WELLNESS_FILE,
};
use crate::intervals::{IntervalsClient, IntervalsError};

/// Six four-week blocks of history
pub const DEFAULT_FETCH_DAYS: u32 = 7 * 4 * 6;
const POWER_CURVE_WINDOW: &str = "42d";
const SPORT: &str = "Ride";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error(transparent)]
  Api(#[from] IntervalsError),

  #[error(transparent)]
  Cache(#[from] CacheError),
}

/// What a fetch pulled down, for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSummary {
  pub athlete_id: Option<String>,
  pub oldest: NaiveDate,
  pub newest: NaiveDate,
  pub activity_count: usize,
  pub wellness_days: usize,
}

/// Fetch profile, activities, wellness, power curves and sport settings for
/// the `days` up to and including `today`, caching each as JSON.
pub async fn fetch_all(
  client: &IntervalsClient,
  cache: &DataCache,
  days: u32,
  today: NaiveDate,
) -> Result<FetchSummary, FetchError> {
  let oldest = today - Duration::days(i64::from(days));
  let (oldest_str, newest_str) = (oldest.to_string(), today.to_string());

  let profile = client.get_profile().await?;
  cache.save_json(PROFILE_FILE, &profile)?;
  let athlete_id = profile.get("id").map(|id| match id {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  });
  info!(athlete = ?athlete_id, "profile fetched");

  let activities = client.get_activities(&oldest_str, &newest_str).await?;
  cache.save_json(ACTIVITIES_FILE, &activities)?;
  info!(count = activities.len(), %oldest, newest = %today, "activities fetched");

  let wellness = client.get_wellness(&oldest_str, &newest_str).await?;
  cache.save_json(WELLNESS_FILE, &wellness)?;
  info!(count = wellness.len(), "wellness fetched");

  let curves = client.get_power_curves(SPORT, POWER_CURVE_WINDOW).await?;
  cache.save_json(POWER_CURVES_FILE, &curves)?;

  let settings = client.get_sport_settings(SPORT).await?;
  cache.save_json(SPORT_SETTINGS_FILE, &settings)?;

  Ok(FetchSummary {
    athlete_id,
    oldest,
    newest: today,
    activity_count: activities.len(),
    wellness_days: wellness.len(),
  })
}
