//! Table row extraction for a single week section.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::duration::parse_duration;
use super::infer::infer_type;
use super::sections::{day_abbr, day_index_contains};
use super::PlannedWorkout;

const DELIMITER: char = '|';
const EXTERNAL_ID_SLUG_LEN: usize = 30;

/// Extract one workout per qualifying table row, in table order.
///
/// Rows with fewer than four cells, an unknown day label or a `REST`
/// session name are skipped.
pub fn parse_week_table(section: &str, week: u32, week_start: NaiveDate) -> Vec<PlannedWorkout> {
  let mut rows: Vec<&str> = section
    .lines()
    .map(str::trim)
    .filter(|line| line.starts_with(DELIMITER) && !is_separator(line))
    .collect();

  if rows.first().is_some_and(|line| line.contains("Day")) {
    rows.remove(0);
  }

  rows
    .into_iter()
    .filter_map(|line| parse_row(line, week, week_start))
    .collect()
}

fn parse_row(line: &str, week: u32, week_start: NaiveDate) -> Option<PlannedWorkout> {
  let cells = split_cells(line);
  if cells.len() < 4 {
    debug!(line, "skipping table row with fewer than 4 cells");
    return None;
  }

  let Some(day_of_week) = day_index_contains(cells[0]) else {
    debug!(line, "skipping table row with unknown day");
    return None;
  };

  let name = cells[1];
  if name.eq_ignore_ascii_case("rest") {
    return None;
  }

  let description = cells[3];
  let zones = cells.get(4).copied().unwrap_or_default();

  Some(PlannedWorkout {
    week,
    day_of_week,
    date: week_start + Duration::days(i64::from(day_of_week)),
    name: name.to_string(),
    description: description.to_string(),
    duration_minutes: parse_duration(cells[2]),
    workout_type: infer_type(name, description),
    zones: zones.to_string(),
    workout_text: None,
    external_id: external_id(week, day_of_week, name),
  })
}

/// `|---|:---:|` style lines under the header
fn is_separator(line: &str) -> bool {
  line
    .chars()
    .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Split a row into trimmed cells, dropping the empty edge cells produced by
/// leading and trailing delimiters. Empty interior cells are kept.
fn split_cells(line: &str) -> Vec<&str> {
  let mut pieces: Vec<&str> = line.split(DELIMITER).collect();
  if line.starts_with(DELIMITER) && !pieces.is_empty() {
    pieces.remove(0);
  }
  if line.len() > 1 && line.ends_with(DELIMITER) {
    pieces.pop();
  }
  pieces.into_iter().map(clean_cell).collect()
}

/// Trim whitespace and `**bold**` / `_italic_` wrapping from a cell
fn clean_cell(cell: &str) -> &str {
  cell.trim().trim_matches(|c| c == '*' || c == '_').trim()
}

/// Deterministic id shared by every parse of the same (week, day, name)
pub fn external_id(week: u32, day_of_week: u32, name: &str) -> String {
  format!("block-w{}-{}-{}", week, day_abbr(day_of_week), slugify(name))
}

fn slugify(s: &str) -> String {
  let mut slug = String::with_capacity(s.len());
  let mut pending_dash = false;

  for c in s.chars().flat_map(char::to_lowercase) {
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  slug.chars().take(EXTERNAL_ID_SLUG_LEN).collect()
}
