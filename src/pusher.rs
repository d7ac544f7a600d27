//! Push planned workouts to the Intervals.icu calendar and clean up stale ones.
//!
//! Events are keyed by the planner's external id, so pushing the same week
//! twice updates in place. Remote events carrying this week's id prefix but
//! missing from the current plan are stale and get deleted.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::intervals::{IntervalsClient, IntervalsError};
use crate::models::{EventPayload, RemoteEvent};
use crate::planner::{PlannedWorkout, EXTERNAL_ID_PREFIX};

/// ---------------------------------------------------------------------------
/// Event Preparation
/// ---------------------------------------------------------------------------

fn minutes_token() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(\d+)min\b").expect("valid minutes regex"))
}

fn percent_token() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(\d+)%").expect("valid percent regex"))
}

/// `10min 55%` -> `10m 55%`; the calendar only builds steps from `m`
pub fn normalize_durations(text: &str) -> String {
  minutes_token().replace_all(text, "${1}m").into_owned()
}

/// Scale every percentage target down by `reduction` (0.05 turns 88% into 83%)
pub fn reduce_power(workout_text: &str, reduction: f64) -> String {
  percent_token()
    .replace_all(workout_text, |caps: &regex::Captures| {
      let pct: f64 = caps[1].parse().unwrap_or(0.0);
      format!("{}%", (pct * (1.0 - reduction)).floor() as u64)
    })
    .into_owned()
}

/// Convert workouts to event payloads, reducing structured targets when fatigued
pub fn prepare_events(workouts: &[PlannedWorkout], power_reduction: f64) -> Vec<EventPayload> {
  workouts
    .iter()
    .map(|w| {
      let mut event = EventPayload::from(w);
      if !event.description.is_empty() {
        event.description = normalize_durations(&event.description);
      }
      if power_reduction > 0.0 && w.workout_text.is_some() {
        event.description = reduce_power(&event.description, power_reduction);
        event.name = format!("{} (adjusted -{:.0}%)", w.name, power_reduction * 100.0);
      }
      event
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Stale Events
/// ---------------------------------------------------------------------------

/// `block-w3-`; the trailing dash keeps week 3 from matching week 30
pub fn week_id_prefix(week: u32) -> String {
  format!("{}{}-", EXTERNAL_ID_PREFIX, week)
}

pub fn current_ids(workouts: &[PlannedWorkout]) -> HashSet<String> {
  workouts
    .iter()
    .map(|w| w.external_id.clone())
    .filter(|id| !id.is_empty())
    .collect()
}

/// Remote events this tool created for `week` that the plan no longer has
pub fn find_stale(remote: Vec<RemoteEvent>, week: u32, current: &HashSet<String>) -> Vec<RemoteEvent> {
  let prefix = week_id_prefix(week);
  remote
    .into_iter()
    .filter(|e| {
      e.external_id
        .as_deref()
        .is_some_and(|id| id.starts_with(&prefix) && !current.contains(id))
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Remote Operations
/// ---------------------------------------------------------------------------

/// Find stale events between `oldest` and `newest`, deleting them unless `dry_run`.
pub async fn clean_week(
  client: &IntervalsClient,
  week: u32,
  oldest: &str,
  newest: &str,
  current: &HashSet<String>,
  dry_run: bool,
) -> Result<Vec<RemoteEvent>, IntervalsError> {
  let remote = client.get_events(oldest, newest).await?;
  let stale = find_stale(remote, week, current);
  debug!(week, stale = stale.len(), "stale events found");

  if dry_run {
    return Ok(stale);
  }

  for event in &stale {
    client.delete_event(event.id).await?;
    info!(id = event.id, external_id = ?event.external_id, "deleted stale event");
  }
  Ok(stale)
}

/// Bulk-upsert prepared events; returns the events as the calendar stored them
pub async fn push_events(
  client: &IntervalsClient,
  events: &[EventPayload],
) -> Result<Vec<RemoteEvent>, IntervalsError> {
  if events.is_empty() {
    return Ok(vec![]);
  }
  let stored = client.bulk_upsert_events(events).await?;
  info!(sent = events.len(), stored = stored.len(), "events upserted");
  Ok(stored)
}
