//! Week section splitting and header date resolution.
//!
//! A plan document is a run of `## Week N (<start> – <end>)` sections. Each
//! section runs until the next week heading or the end of the document.
//! Headings that do not follow the grammar are skipped, not reported.

use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// ---------------------------------------------------------------------------
/// Lookup Tables
/// ---------------------------------------------------------------------------

/// Day labels as written in plan tables and headings, in match order
pub const DAY_NAMES: &[(&str, u32)] = &[
  ("mon", 0),
  ("monday", 0),
  ("tue", 1),
  ("tuesday", 1),
  ("wed", 2),
  ("wednesday", 2),
  ("thu", 3),
  ("thursday", 3),
  ("fri", 4),
  ("friday", 4),
  ("sat", 5),
  ("saturday", 5),
  ("sun", 6),
  ("sunday", 6),
];

const MONTHS: &[(&str, u32)] = &[
  ("jan", 1),
  ("feb", 2),
  ("mar", 3),
  ("apr", 4),
  ("may", 5),
  ("jun", 6),
  ("jul", 7),
  ("aug", 8),
  ("sep", 9),
  ("oct", 10),
  ("nov", 11),
  ("dec", 12),
];

/// Three-letter lowercase abbreviation for a weekday index
pub fn day_abbr(day_of_week: u32) -> &'static str {
  match day_of_week {
    0 => "mon",
    1 => "tue",
    2 => "wed",
    3 => "thu",
    4 => "fri",
    5 => "sat",
    _ => "sun",
  }
}

/// Exact (case-insensitive) weekday name or abbreviation
pub fn day_index_exact(token: &str) -> Option<u32> {
  let token = token.to_lowercase();
  DAY_NAMES
    .iter()
    .find(|(name, _)| *name == token)
    .map(|(_, idx)| *idx)
}

/// First table entry contained anywhere in the label (case-insensitive)
pub fn day_index_contains(label: &str) -> Option<u32> {
  let label = label.to_lowercase();
  DAY_NAMES
    .iter()
    .find(|(name, _)| label.contains(name))
    .map(|(_, idx)| *idx)
}

fn month_index(token: &str) -> Option<u32> {
  let prefix: String = token.to_lowercase().chars().take(3).collect();
  MONTHS
    .iter()
    .find(|(name, _)| *name == prefix)
    .map(|(_, idx)| *idx)
}

/// ---------------------------------------------------------------------------
/// Week Sections
/// ---------------------------------------------------------------------------

/// One `## Week N` section of a plan document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSection<'a> {
  pub week: u32,
  /// Start date as written in the header
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  pub text: &'a str,
}

fn week_heading_start() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(?m)^## Week \d+").expect("valid week heading regex"))
}

fn week_header() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(
      r"^## Week (\d+)\s+\(([A-Za-z]+\.? \d+)\s*[–-]\s*([A-Za-z ]*\d+(?:,?\s*\d{4})?)\)",
    )
    .expect("valid week header regex")
  })
}

fn four_digit_year() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("valid year regex"))
}

/// Split a document into its week sections, in document order.
pub fn split_sections(text: &str, default_year: i32) -> Vec<WeekSection<'_>> {
  let starts: Vec<usize> = week_heading_start().find_iter(text).map(|m| m.start()).collect();

  starts
    .iter()
    .enumerate()
    .filter_map(|(i, &start)| {
      let end = starts.get(i + 1).copied().unwrap_or(text.len());
      parse_section(&text[start..end], default_year)
    })
    .collect()
}

fn parse_section(section: &str, default_year: i32) -> Option<WeekSection<'_>> {
  let heading = section.lines().next().unwrap_or_default();

  let Some(caps) = week_header().captures(section) else {
    debug!(heading, "skipping week section with unrecognized header");
    return None;
  };

  let week = caps[1].parse::<u32>().ok()?;
  let Some(week_start) = resolve_week_start(&caps[2], &caps[3], default_year) else {
    debug!(heading, "skipping week section with unresolvable dates");
    return None;
  };

  Some(WeekSection {
    week,
    week_start,
    week_end: week_start + Duration::days(6),
    text: section,
  })
}

/// Resolve a header's start label (`Feb 11`) to a date. The date is taken
/// as written; plan-week boundaries are aligned separately in `analysis`.
///
/// The year comes from the end label when it carries one (`Jan 4, 2027`),
/// otherwise from the configured plan year. A start month later than the end
/// month means the week crosses New Year, so the start sits in the prior year.
pub fn resolve_week_start(start_label: &str, end_label: &str, default_year: i32) -> Option<NaiveDate> {
  let mut parts = start_label.split_whitespace();
  let month = month_index(parts.next()?)?;
  let day = parts.next()?.trim_end_matches(',').parse::<u32>().ok()?;

  let year = match four_digit_year().captures(end_label) {
    Some(caps) => {
      let end_year = caps[1].parse::<i32>().ok()?;
      let end_month = end_label.split_whitespace().next().and_then(month_index);
      match end_month {
        Some(end_month) if end_month < month => end_year - 1,
        _ => end_year,
      }
    }
    None => default_year,
  };

  NaiveDate::from_ymd_opt(year, month, day)
}
