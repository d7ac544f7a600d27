use chrono::NaiveDate;
use serde::Serialize;

use super::Activity;

/// Completed training for one plan week, compared against its phase targets
#[derive(Debug, Clone, Serialize)]
pub struct WeekSummary {
  pub week_number: u32,
  pub start_date: NaiveDate,
  pub end_date: NaiveDate,
  pub phase: String,
  pub total_hours: f64,
  pub total_load: f64,
  pub ride_count: usize,
  pub strength_count: usize,
  pub planned_hours_min: f64,
  pub planned_hours_max: f64,
  pub ctl_start: Option<f64>,
  pub ctl_end: Option<f64>,
  pub atl_end: Option<f64>,
  pub tsb_end: Option<f64>,
  pub eftp: Option<f64>,
  pub avg_soreness: Option<f64>,
  pub avg_fatigue: Option<f64>,
  pub activities: Vec<Activity>,
}

/// Volume against the phase's planned range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compliance {
  Under,
  Ok,
  Over,
  /// The phase has no planned range
  Unplanned,
}

impl Compliance {
  pub fn as_str(&self) -> &'static str {
    match self {
      Compliance::Under => "LOW",
      Compliance::Ok => "OK",
      Compliance::Over => "HIGH",
      Compliance::Unplanned => "—",
    }
  }
}

impl WeekSummary {
  pub fn compliance(&self) -> Compliance {
    if self.planned_hours_max <= 0.0 {
      Compliance::Unplanned
    } else if self.total_hours < self.planned_hours_min {
      Compliance::Under
    } else if self.total_hours > self.planned_hours_max {
      Compliance::Over
    } else {
      Compliance::Ok
    }
  }

  pub fn ctl_change(&self) -> Option<f64> {
    match (self.ctl_start, self.ctl_end) {
      (Some(start), Some(end)) => Some(end - start),
      _ => None,
    }
  }
}
