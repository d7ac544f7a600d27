use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Activity types counted as rides in weekly summaries
pub const RIDE_TYPES: &[&str] = &["Ride", "VirtualRide", "MountainBikeRide"];

/// Completed activity as returned by the Intervals.icu activities endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
  #[serde(default)]
  pub id: serde_json::Value,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(rename = "type", default)]
  pub activity_type: String,
  pub start_date_local: NaiveDateTime,
  /// Seconds
  #[serde(default)]
  pub moving_time: i64,
  #[serde(default)]
  pub icu_training_load: Option<f64>,
  #[serde(default)]
  pub icu_average_watts: Option<f64>,
  #[serde(default)]
  pub average_heartrate: Option<f64>,
}

impl Activity {
  pub fn date(&self) -> NaiveDate {
    self.start_date_local.date()
  }

  pub fn hours(&self) -> f64 {
    self.moving_time as f64 / 3600.0
  }

  pub fn training_load(&self) -> f64 {
    self.icu_training_load.unwrap_or(0.0)
  }

  pub fn is_ride(&self) -> bool {
    RIDE_TYPES.contains(&self.activity_type.as_str())
  }

  pub fn is_strength(&self) -> bool {
    self.activity_type == "WeightTraining"
  }
}

/// Per-sport block inside a wellness record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportInfo {
  #[serde(rename = "type", default)]
  pub sport: String,
  #[serde(default)]
  pub eftp: Option<f64>,
}

/// Daily wellness record. Intervals.icu keys these by ISO date in `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessDay {
  #[serde(rename = "id")]
  pub date: NaiveDate,
  #[serde(default)]
  pub ctl: Option<f64>,
  #[serde(default)]
  pub atl: Option<f64>,
  #[serde(rename = "rampRate", default)]
  pub ramp_rate: Option<f64>,
  #[serde(rename = "sportInfo", default)]
  pub sport_info: Vec<SportInfo>,
  #[serde(default)]
  pub soreness: Option<i64>,
  #[serde(default)]
  pub fatigue: Option<i64>,
}

impl WellnessDay {
  /// Training stress balance (form): CTL - ATL
  pub fn tsb(&self) -> Option<f64> {
    match (self.ctl, self.atl) {
      (Some(ctl), Some(atl)) => Some(ctl - atl),
      _ => None,
    }
  }

  /// Estimated FTP from the ride sport block
  pub fn eftp(&self) -> Option<f64> {
    self
      .sport_info
      .iter()
      .find(|s| s.sport == "Ride")
      .and_then(|s| s.eftp)
  }
}

/// Latest fitness numbers for the status dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessSnapshot {
  pub date: NaiveDate,
  pub ctl: f64,
  pub atl: f64,
  pub eftp: Option<f64>,
  pub ramp_rate: Option<f64>,
}

impl FitnessSnapshot {
  pub fn tsb(&self) -> f64 {
    self.ctl - self.atl
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_activity_from_api_json() {
    let activity: Activity = serde_json::from_value(json!({
      "id": "i1001",
      "name": "Sweet spot",
      "type": "VirtualRide",
      "start_date_local": "2026-02-10T06:30:00",
      "moving_time": 5400,
      "icu_training_load": 78.0,
      "some_new_field": true
    }))
    .unwrap();

    assert_eq!(activity.date(), NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
    assert!((activity.hours() - 1.5).abs() < f64::EPSILON);
    assert_eq!(activity.training_load(), 78.0);
    assert!(activity.is_ride());
    assert!(!activity.is_strength());
  }

  #[test]
  fn test_wellness_from_api_json() {
    let day: WellnessDay = serde_json::from_value(json!({
      "id": "2026-02-12",
      "ctl": 52.5,
      "atl": 70.0,
      "rampRate": 4.2,
      "sportInfo": [
        {"type": "Run", "eftp": 4.1},
        {"type": "Ride", "eftp": 241.0}
      ],
      "soreness": 2
    }))
    .unwrap();

    assert_eq!(day.tsb(), Some(-17.5));
    assert_eq!(day.eftp(), Some(241.0));
    assert_eq!(day.soreness, Some(2));
    assert_eq!(day.fatigue, None);
  }

  #[test]
  fn test_wellness_without_load() {
    let day: WellnessDay = serde_json::from_value(json!({"id": "2026-02-12"})).unwrap();
    assert_eq!(day.tsb(), None);
    assert_eq!(day.eftp(), None);
  }
}
