//! Test fixtures shared by the unit test modules
//!
//! - A two-week plan document and the year to parse it with
//! - A sample `config.toml` whose plan starts on that document's first Monday
//! - Factories for planned workouts, activities and wellness days

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::config::AppConfig;
use crate::models::activity::SportInfo;
use crate::models::{Activity, WellnessDay};
use crate::planner::table::external_id;
use crate::planner::{PlannedWorkout, WorkoutType};

/// ---------------------------------------------------------------------------
/// Plan Fixtures
/// ---------------------------------------------------------------------------

/// February 11 is a Monday in this year
pub const SAMPLE_PLAN_YEAR: i32 = 2030;

/// Two week sections; only week 1 carries a structured block
pub fn sample_plan() -> String {
  r#"# Block 1: Base

Notes about the block go here.

## Week 1 (Feb 11–17)

| Day | Session | Duration | Notes | Zones |
|-----|---------|----------|-------|-------|
| Mon | **REST** | — | Full rest | |
| Tue | Strength A | 45min | Gym | |
| Tue | Indoor Sweet Spot | 60min | Trainer session | Z3 |
| Thu | Easy spin | 45-60min | After strength | Z1-Z2 |
| Sat | Long outdoor ride | 2h30 | Fuel every 30min | Z2 |

### Tuesday — Sweet Spot Intro

```
- 10min 55%
- 3x10min 88%
- 10min 50%
```

## Week 2 (Feb 18 – 24)

| Day | Session | Duration | Notes | Zones |
|-----|---------|----------|-------|-------|
| Mon | Rest | | | |
| Tue | Tempo | 1h15 + 35min | Split session | Z3 |
| Wed | Strength B | 45min | Gym | |
| Sun | Long ride | 3h | Steady | Z2 |
"#
  .to_string()
}

/// ---------------------------------------------------------------------------
/// Config Fixtures
/// ---------------------------------------------------------------------------

pub const SAMPLE_CONFIG: &str = r#"[athlete]
ftp = 250

[plan]
start_date = "2030-02-11"
dir = "plan"

[phases]
base = [1, 4, 6.0, 8.0]
build_1 = [5, 8, 7.0, 9.0]

[fatigue]
tsb_warning = -20
power_reduction = 0.05
eftp_drift_threshold = 10

[zones]
z1 = 55
z2 = 65
z3 = 85
z4 = 100
z5 = 115
"#;

pub fn sample_config() -> AppConfig {
  AppConfig::from_toml(SAMPLE_CONFIG).expect("sample config parses")
}

/// ---------------------------------------------------------------------------
/// Record Factories
/// ---------------------------------------------------------------------------

/// A one-hour workout dated from the sample plan's first Monday
pub fn planned_workout(week: u32, day_of_week: u32, name: &str, workout_type: WorkoutType) -> PlannedWorkout {
  let plan_start = NaiveDate::from_ymd_opt(SAMPLE_PLAN_YEAR, 2, 11).expect("valid date");
  let offset = i64::from(week.saturating_sub(1)) * 7 + i64::from(day_of_week);

  PlannedWorkout {
    week,
    day_of_week,
    date: plan_start + Duration::days(offset),
    name: name.to_string(),
    description: String::new(),
    duration_minutes: 60,
    workout_type,
    zones: String::new(),
    workout_text: None,
    external_id: external_id(week, day_of_week, name),
  }
}

/// Completed activity starting at `start_local` (`%Y-%m-%dT%H:%M:%S`)
pub fn activity(start_local: &str, activity_type: &str, moving_secs: i64, load: f64) -> Activity {
  Activity {
    id: serde_json::Value::String(format!("a-{}", start_local)),
    name: Some(format!("{} session", activity_type)),
    activity_type: activity_type.to_string(),
    start_date_local: NaiveDateTime::parse_from_str(start_local, "%Y-%m-%dT%H:%M:%S")
      .expect("valid activity timestamp"),
    moving_time: moving_secs,
    icu_training_load: Some(load),
    icu_average_watts: None,
    average_heartrate: None,
  }
}

/// Wellness record; `eftp` lands in a Ride sport block
pub fn wellness_day(date: &str, ctl: Option<f64>, atl: Option<f64>, eftp: Option<f64>) -> WellnessDay {
  WellnessDay {
    date: date.parse().expect("valid wellness date"),
    ctl,
    atl,
    ramp_rate: None,
    sport_info: eftp
      .map(|eftp| {
        vec![SportInfo {
          sport: "Ride".into(),
          eftp: Some(eftp),
        }]
      })
      .unwrap_or_default(),
    soreness: None,
    fatigue: None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Datelike;

  #[test]
  fn test_planned_workout_dates_match_weekday() {
    let w = planned_workout(2, 1, "Tempo", WorkoutType::Ride);
    assert_eq!(w.date, NaiveDate::from_ymd_opt(2030, 2, 19).unwrap());
    assert_eq!(w.date.weekday().num_days_from_monday(), 1);
    assert_eq!(w.external_id, "block-w2-tue-tempo");
  }

  #[test]
  fn test_fixture_factories() {
    let a = activity("2030-02-12T07:00:00", "Ride", 5400, 80.0);
    assert_eq!(a.hours(), 1.5);

    let w = wellness_day("2030-02-12", Some(40.0), Some(50.0), Some(250.0));
    assert_eq!(w.tsb(), Some(-10.0));
    assert_eq!(w.eftp(), Some(250.0));
  }
}
