use serde::{Deserialize, Serialize};

use crate::planner::{PlannedWorkout, WorkoutType};

const EVENT_CATEGORY: &str = "WORKOUT";

/// Calendar event sent to the Intervals.icu bulk upsert endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
  pub category: String,
  /// Local midnight of the planned day, `YYYY-MM-DDT00:00:00`
  pub start_date_local: String,
  #[serde(rename = "type")]
  pub event_type: WorkoutType,
  pub name: String,
  /// Seconds; omitted when the plan gives no duration
  #[serde(skip_serializing_if = "Option::is_none")]
  pub moving_time: Option<u32>,
  pub description: String,
  pub external_id: String,
}

impl From<&PlannedWorkout> for EventPayload {
  fn from(w: &PlannedWorkout) -> Self {
    // Structured text is what the calendar turns into workout steps
    let description = match &w.workout_text {
      Some(text) => text.clone(),
      None if w.zones.is_empty() => w.description.clone(),
      None if w.description.is_empty() => format!("Zones: {}", w.zones),
      None => format!("{}\n\nZones: {}", w.description, w.zones),
    };

    Self {
      category: EVENT_CATEGORY.to_string(),
      start_date_local: w.date.format("%Y-%m-%dT00:00:00").to_string(),
      event_type: w.workout_type,
      name: w.name.clone(),
      moving_time: (w.duration_minutes > 0).then(|| w.duration_minutes.saturating_mul(60)),
      description,
      external_id: w.external_id.clone(),
    }
  }
}

/// Calendar event as returned by the events endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEvent {
  pub id: i64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub start_date_local: String,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub external_id: Option<String>,
  /// Set by bulk upsert when the event already existed
  #[serde(default)]
  pub updated: bool,
}

impl RemoteEvent {
  pub fn upsert_status(&self) -> &'static str {
    if self.updated {
      "updated"
    } else {
      "created"
    }
  }

  /// `YYYY-MM-DD` part of the start timestamp
  pub fn day(&self) -> &str {
    self.start_date_local.get(..10).unwrap_or(&self.start_date_local)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::planned_workout;
  use serde_json::json;

  #[test]
  fn test_payload_from_structured_workout() {
    let mut w = planned_workout(3, 1, "Indoor Sweet Spot", WorkoutType::VirtualRide);
    w.workout_text = Some("- 10m 55%\n- 3x10m 88%".into());
    w.zones = "Z3".into();

    let event = EventPayload::from(&w);
    assert_eq!(event.description, "- 10m 55%\n- 3x10m 88%");
    assert_eq!(event.moving_time, Some(3600));
    assert_eq!(event.external_id, w.external_id);

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "VirtualRide");
    assert_eq!(value["category"], "WORKOUT");
    assert_eq!(value["start_date_local"], json!(format!("{}T00:00:00", w.date)));
  }

  #[test]
  fn test_payload_folds_zones_into_description() {
    let mut w = planned_workout(3, 5, "Long ride", WorkoutType::Ride);
    w.description = "Steady, fuel well".into();
    w.zones = "Z2".into();
    assert_eq!(EventPayload::from(&w).description, "Steady, fuel well\n\nZones: Z2");

    w.description.clear();
    assert_eq!(EventPayload::from(&w).description, "Zones: Z2");
  }

  #[test]
  fn test_payload_omits_unknown_duration() {
    let mut w = planned_workout(3, 2, "Strength A", WorkoutType::WeightTraining);
    w.duration_minutes = 0;
    let value = serde_json::to_value(EventPayload::from(&w)).unwrap();
    assert!(value.get("moving_time").is_none());
  }

  #[test]
  fn test_remote_event_day() {
    let event: RemoteEvent = serde_json::from_value(json!({
      "id": 42,
      "name": "Tempo",
      "start_date_local": "2026-02-17T00:00:00",
      "external_id": "block-w2-tue-tempo"
    }))
    .unwrap();
    assert_eq!(event.day(), "2026-02-17");
    assert_eq!(event.category, None);
    assert_eq!(event.upsert_status(), "created");
  }

  #[test]
  fn test_remote_event_upsert_status() {
    let event: RemoteEvent = serde_json::from_value(json!({
      "id": 43,
      "name": "Long ride",
      "start_date_local": "2026-02-21T00:00:00",
      "updated": true
    }))
    .unwrap();
    assert!(event.updated);
    assert_eq!(event.upsert_status(), "updated");
  }
}
