//! Structured workout blocks keyed by weekday.
//!
//! A block is a `### <Day> — <title>` heading followed, possibly after some
//! prose, by a fenced code block holding the interval prescription:
//!
//! ~~~text
//! ### Tuesday — Sweet Spot Intro
//! Keep cadence high.
//! ```
//! - 10m 55%
//! - 3x10m 88-92%
//! ```
//! ~~~

use std::collections::HashMap;
use tracing::debug;

use super::sections::day_index_exact;

const FENCE: &str = "```";

/// Map weekday index to the trimmed contents of that day's fenced block.
///
/// A day heading owns the first fence that follows it, even across headings
/// that name no weekday. A later day heading takes over a pending one, and a
/// later block for the same day replaces an earlier one.
pub fn parse_workout_blocks(section: &str) -> HashMap<u32, String> {
  let mut blocks = HashMap::new();
  let mut pending_day: Option<u32> = None;
  let mut lines = section.lines();

  while let Some(line) = lines.next() {
    let trimmed = line.trim_start();

    if let Some(heading) = trimmed.strip_prefix("###") {
      if heading.starts_with('#') {
        continue;
      }
      match heading_day(heading) {
        Some(day) => pending_day = Some(day),
        None => debug!(line, "heading does not name a weekday"),
      }
      continue;
    }

    if trimmed.starts_with(FENCE) {
      let body: Vec<&str> = lines
        .by_ref()
        .take_while(|l| !l.trim_start().starts_with(FENCE))
        .collect();

      if let Some(day) = pending_day.take() {
        blocks.insert(day, body.join("\n").trim().to_string());
      }
    }
  }

  blocks
}

/// First word of a heading, if it is a weekday name or abbreviation
fn heading_day(heading: &str) -> Option<u32> {
  let word: String = heading
    .trim_start()
    .chars()
    .take_while(|c| c.is_alphanumeric() || *c == '_')
    .collect();

  if word.is_empty() {
    return None;
  }
  day_index_exact(&word)
}
