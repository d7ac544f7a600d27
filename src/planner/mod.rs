//! Plan document parser
//!
//! Turns the hand-written `block_*.md` training plans into typed workouts.
//! Plans are prose/markdown hybrids, so the parser is permissive: a malformed
//! section or row is dropped and the rest of the document still parses. The
//! only condition surfaced to callers is a week no document covers.

pub mod blocks;
pub mod duration;
pub mod infer;
pub mod locator;
pub mod sections;
pub mod table;

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

pub use duration::parse_duration;
pub use infer::{infer_type, WorkoutType};
pub use locator::{find_document, load_plan_documents, PlanDocument};

/// Prefix shared by every external id this tool generates
pub const EXTERNAL_ID_PREFIX: &str = "block-w";

/// ---------------------------------------------------------------------------
/// Planned Workout
/// ---------------------------------------------------------------------------

/// One planned session from a plan table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedWorkout {
  pub week: u32,
  /// 0 = Monday .. 6 = Sunday
  pub day_of_week: u32,
  pub date: NaiveDate,
  pub name: String,
  pub description: String,
  /// 0 when the plan leaves it unspecified
  pub duration_minutes: u32,
  pub workout_type: WorkoutType,
  pub zones: String,
  /// Structured interval prescription, when the week has one for this day
  pub workout_text: Option<String>,
  pub external_id: String,
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
  #[error("No plan document covers week {week}")]
  DocumentNotFound { week: u32 },

  #[error("Failed to read plan documents at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// ---------------------------------------------------------------------------
/// Block Assembly
/// ---------------------------------------------------------------------------

/// Parse every week section of a document into workouts.
///
/// Workouts come out in table order within a section and sections in
/// document order. Each row picks up its weekday's structured block unless it
/// already has text or is a strength session: blocks are always cycling.
pub fn parse_document(text: &str, default_year: i32) -> Vec<PlannedWorkout> {
  let mut workouts = Vec::new();

  for section in sections::split_sections(text, default_year) {
    let rows = table::parse_week_table(section.text, section.week, section.week_start);
    let structured = blocks::parse_workout_blocks(section.text);

    for mut workout in rows {
      let attach = workout.workout_text.is_none()
        && workout.workout_type != WorkoutType::WeightTraining;
      if attach {
        workout.workout_text = structured.get(&workout.day_of_week).cloned();
      }
      workouts.push(workout);
    }
  }

  workouts
}

/// Workouts of a single week, filtered from an already parsed list
pub fn filter_week(workouts: Vec<PlannedWorkout>, week: u32) -> Vec<PlannedWorkout> {
  workouts.into_iter().filter(|w| w.week == week).collect()
}

/// Locate the document covering `week` and return that week's workouts.
pub fn parse_week(
  week: u32,
  documents: &[PlanDocument],
  default_year: i32,
) -> Result<Vec<PlannedWorkout>, PlanError> {
  let document = find_document(week, documents)?;
  tracing::debug!(week, document = %document.name, "parsing plan document");
  Ok(filter_week(parse_document(&document.text, default_year), week))
}
