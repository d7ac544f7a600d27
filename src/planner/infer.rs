use serde::{Deserialize, Serialize};

/// Activity types the calendar understands for planned sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutType {
  Ride,
  VirtualRide,
  WeightTraining,
}

impl WorkoutType {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutType::Ride => "Ride",
      WorkoutType::VirtualRide => "VirtualRide",
      WorkoutType::WeightTraining => "WeightTraining",
    }
  }
}

impl std::fmt::Display for WorkoutType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

const INDOOR_KEYWORDS: &[&str] = &["indoor", "rouvy", "zwift"];

/// Ordered keyword rules, first match wins
const RULES: &[(&[&str], WorkoutType)] = &[
  (&["strength", "weight"], WorkoutType::WeightTraining),
  (INDOOR_KEYWORDS, WorkoutType::VirtualRide),
  (&["outdoor", "long"], WorkoutType::Ride),
  (&["spin"], WorkoutType::VirtualRide),
];

/// Infer the activity type of a session from its name.
///
/// The description is accepted but never consulted: descriptions routinely
/// mention other sessions ("easy spin after strength") and would misclassify.
pub fn infer_type(name: &str, _description: &str) -> WorkoutType {
  let name = name.to_lowercase();

  RULES
    .iter()
    .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
    .map(|(_, workout_type)| *workout_type)
    .unwrap_or(WorkoutType::Ride)
}
