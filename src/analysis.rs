//! Deterministic analysis of cached training data
//!
//! Plan-week arithmetic, weekly summaries, fatigue and zone checks. Everything
//! here is a pure function of the config and cached records.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::cache::{CacheError, DataCache, ACTIVITIES_FILE, WELLNESS_FILE};
use crate::config::{AppConfig, FatigueConfig};
use crate::models::{Activity, FitnessSnapshot, WeekSummary, WellnessDay};

/// ---------------------------------------------------------------------------
/// Plan Weeks
/// ---------------------------------------------------------------------------

/// Monday and Sunday of a plan week
pub fn week_dates(config: &AppConfig, week: u32) -> (NaiveDate, NaiveDate) {
  let offset = Duration::weeks(i64::from(week) - 1);
  let start = config.plan.start_date + offset;
  let monday = start - Duration::days(i64::from(start.weekday().num_days_from_monday()));
  (monday, monday + Duration::days(6))
}

/// Plan week containing `today`; never less than 1
pub fn current_week_number(config: &AppConfig, today: NaiveDate) -> u32 {
  let delta = (today - config.plan.start_date).num_days();
  let week = delta.div_euclid(7) + 1;
  u32::try_from(week.max(1)).unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
  pub name: String,
  pub min_hours: f64,
  pub max_hours: f64,
}

/// Training phase containing a week, with its planned hours range
pub fn phase_for(config: &AppConfig, week: u32) -> Phase {
  config
    .phases
    .iter()
    .find(|(_, bounds)| bounds.contains(week))
    .map(|(name, bounds)| Phase {
      name: phase_label(name),
      min_hours: bounds.2,
      max_hours: bounds.3,
    })
    .unwrap_or_else(|| Phase {
      name: "Unknown".into(),
      min_hours: 0.0,
      max_hours: 0.0,
    })
}

/// `build_2` -> `Build 2`
fn phase_label(key: &str) -> String {
  key
    .split('_')
    .filter(|w| !w.is_empty())
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<String>>()
    .join(" ")
}

/// ---------------------------------------------------------------------------
/// Cached Records
/// ---------------------------------------------------------------------------

pub fn load_activities(cache: &DataCache) -> Result<Vec<Activity>, CacheError> {
  Ok(cache.load_json(ACTIVITIES_FILE)?.unwrap_or_default())
}

/// Wellness records sorted by date
pub fn load_wellness(cache: &DataCache) -> Result<Vec<WellnessDay>, CacheError> {
  let mut days: Vec<WellnessDay> = cache.load_json(WELLNESS_FILE)?.unwrap_or_default();
  days.sort_by_key(|d| d.date);
  Ok(days)
}

/// Most recent wellness record carrying CTL
pub fn latest_fitness(wellness: &[WellnessDay]) -> Option<FitnessSnapshot> {
  wellness
    .iter()
    .rev()
    .find_map(|w| {
      w.ctl.map(|ctl| FitnessSnapshot {
        date: w.date,
        ctl,
        atl: w.atl.unwrap_or(0.0),
        eftp: w.eftp(),
        ramp_rate: w.ramp_rate,
      })
    })
}

/// ---------------------------------------------------------------------------
/// Weekly Summary
/// ---------------------------------------------------------------------------

pub fn analyze_week(
  config: &AppConfig,
  week: u32,
  activities: &[Activity],
  wellness: &[WellnessDay],
) -> WeekSummary {
  let (start, end) = week_dates(config, week);
  let phase = phase_for(config, week);
  let in_week = |d: NaiveDate| start <= d && d <= end;

  let week_activities: Vec<Activity> = activities
    .iter()
    .filter(|a| in_week(a.date()))
    .cloned()
    .collect();

  let week_wellness: Vec<&WellnessDay> = wellness.iter().filter(|w| in_week(w.date)).collect();
  let first = week_wellness.first();
  let last = week_wellness.last();

  WeekSummary {
    week_number: week,
    start_date: start,
    end_date: end,
    phase: phase.name,
    total_hours: week_activities.iter().map(Activity::hours).sum(),
    total_load: week_activities.iter().map(Activity::training_load).sum(),
    ride_count: week_activities.iter().filter(|a| a.is_ride()).count(),
    strength_count: week_activities.iter().filter(|a| a.is_strength()).count(),
    planned_hours_min: phase.min_hours,
    planned_hours_max: phase.max_hours,
    ctl_start: first.and_then(|w| w.ctl),
    ctl_end: last.and_then(|w| w.ctl),
    atl_end: last.and_then(|w| w.atl),
    tsb_end: last.and_then(|w| w.tsb()),
    eftp: week_wellness.iter().rev().find_map(|w| w.eftp().filter(|e| *e > 0.0)),
    avg_soreness: average(week_wellness.iter().filter_map(|w| w.soreness)),
    avg_fatigue: average(week_wellness.iter().filter_map(|w| w.fatigue)),
    activities: week_activities,
  }
}

/// Mean of the non-zero scores (0 means "not entered")
fn average(values: impl Iterator<Item = i64>) -> Option<f64> {
  let scores: Vec<i64> = values.filter(|v| *v != 0).collect();
  if scores.is_empty() {
    return None;
  }
  Some(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
}

/// ---------------------------------------------------------------------------
/// Fatigue and Zone Checks
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FatigueCheck {
  pub fatigued: bool,
  pub tsb: Option<f64>,
  /// Fraction to take off power targets; 0 when not fatigued
  pub power_reduction: f64,
  pub message: String,
}

/// Flag fatigue when a week ended with TSB below the warning threshold
pub fn check_fatigue(summary: &WeekSummary, fatigue: &FatigueConfig) -> FatigueCheck {
  match summary.tsb_end {
    Some(tsb) if tsb < fatigue.tsb_warning => FatigueCheck {
      fatigued: true,
      tsb: Some(tsb),
      power_reduction: fatigue.power_reduction,
      message: format!(
        "TSB is {:+.0} (below {}). Reducing power targets by {:.0}%.",
        tsb,
        fatigue.tsb_warning,
        fatigue.power_reduction * 100.0
      ),
    },
    tsb => FatigueCheck {
      fatigued: false,
      tsb,
      power_reduction: 0.0,
      message: String::new(),
    },
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneCheck {
  /// eFTP minus configured FTP, in watts
  pub drift: f64,
  pub eftp: Option<f64>,
  pub needs_update: bool,
  pub message: String,
}

/// Compare configured FTP against the latest detected eFTP
pub fn check_zones(config_ftp: u32, fitness: Option<&FitnessSnapshot>, drift_threshold: f64) -> ZoneCheck {
  let Some(eftp) = fitness.and_then(|f| f.eftp).filter(|e| *e > 0.0) else {
    return ZoneCheck {
      drift: 0.0,
      eftp: None,
      needs_update: false,
      message: "No eFTP data available.".into(),
    };
  };

  let drift = eftp - f64::from(config_ftp);
  let needs_update = drift.abs() > drift_threshold;
  let mut message = format!(
    "Config FTP: {}W | eFTP: {:.0}W | Drift: {:+.0}W",
    config_ftp, eftp, drift
  );
  if needs_update {
    message.push_str(&format!(
      "\n  → Consider updating FTP to {:.0}W and recalculating zones.",
      eftp
    ));
  }

  ZoneCheck {
    drift,
    eftp: Some(eftp),
    needs_update,
    message,
  }
}

/// Watts for each configured zone (percent of FTP) at a given FTP
pub fn zone_watts(config: &AppConfig, ftp: u32) -> Vec<(String, u32, u32)> {
  config
    .zones
    .iter()
    .map(|(zone, pct)| (zone.clone(), *pct, ftp * pct / 100))
    .collect()
}
