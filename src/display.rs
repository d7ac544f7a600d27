//! Terminal rendering: plain aligned tables with ANSI colour accents.

use crossterm::style::Stylize;

use crate::analysis::ZoneCheck;
use crate::models::{Compliance, EventPayload, FitnessSnapshot, RemoteEvent, WeekSummary};
use crate::planner::PlannedWorkout;

const RULE_WIDTH: usize = 50;
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const PLACEHOLDER: &str = "—";

/// ---------------------------------------------------------------------------
/// Styling
/// ---------------------------------------------------------------------------

pub fn header(text: &str) -> String {
  let rule = "─".repeat(RULE_WIDTH);
  format!(
    "\n{}\n{}\n{}",
    rule.as_str().bold().cyan(),
    text.bold(),
    rule.as_str().bold().cyan()
  )
}

pub fn section(text: &str) -> String {
  format!("\n{}", text.bold())
}

pub fn bold(text: &str) -> String {
  text.bold().to_string()
}

pub fn ok(text: &str) -> String {
  text.green().to_string()
}

pub fn warn(text: &str) -> String {
  text.yellow().to_string()
}

pub fn bad(text: &str) -> String {
  text.red().to_string()
}

pub fn info(text: &str) -> String {
  text.blue().to_string()
}

/// ---------------------------------------------------------------------------
/// Tables
/// ---------------------------------------------------------------------------

/// Left-aligned columns under a dashed header rule
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
  let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
  for row in rows {
    for (i, cell) in row.iter().enumerate() {
      let len = cell.chars().count();
      match widths.get_mut(i) {
        Some(w) => *w = (*w).max(len),
        None => widths.push(len),
      }
    }
  }

  let render = |cells: Vec<&str>| -> String {
    cells
      .iter()
      .zip(&widths)
      .map(|(cell, width)| pad(cell, *width))
      .collect::<Vec<_>>()
      .join("  ")
      .trim_end()
      .to_string()
  };

  let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  let mut lines = vec![
    render(headers.to_vec()),
    render(rules.iter().map(String::as_str).collect()),
  ];
  for row in rows {
    lines.push(render(row.iter().map(String::as_str).collect()));
  }
  lines.join("\n")
}

/// Two columns, no header
pub fn kv_table(pairs: &[(&str, String)]) -> String {
  let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
  pairs
    .iter()
    .map(|(k, v)| format!("{}  {}", pad(k, width), v))
    .collect::<Vec<_>>()
    .join("\n")
}

fn pad(cell: &str, width: usize) -> String {
  let len = cell.chars().count();
  format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn truncate(text: &str, max: usize) -> String {
  text.chars().take(max).collect()
}

/// ---------------------------------------------------------------------------
/// Formatters
/// ---------------------------------------------------------------------------

pub fn format_hours(hours: f64) -> String {
  let h = hours.trunc() as i64;
  let m = ((hours - h as f64) * 60.0) as i64;
  format!("{}h{:02}m", h, m)
}

pub fn format_tsb(tsb: Option<f64>) -> String {
  let Some(tsb) = tsb else {
    return PLACEHOLDER.to_string();
  };
  let text = format!("{:+.0}", tsb);
  if tsb < -20.0 {
    bad(&text)
  } else if tsb < -10.0 {
    warn(&text)
  } else if tsb > 10.0 {
    info(&text)
  } else {
    ok(&text)
  }
}

pub fn format_compliance(compliance: Compliance) -> String {
  match compliance {
    Compliance::Ok => ok(compliance.as_str()),
    Compliance::Under => warn(compliance.as_str()),
    Compliance::Over => bad(compliance.as_str()),
    Compliance::Unplanned => compliance.as_str().to_string(),
  }
}

fn or_placeholder(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
  value.map(fmt).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// ---------------------------------------------------------------------------
/// Views
/// ---------------------------------------------------------------------------

pub fn render_status_dashboard(fitness: &FitnessSnapshot, config_ftp: u32) -> String {
  let mut rows = vec![
    ("CTL (Fitness)", format!("{:.1}", fitness.ctl)),
    ("ATL (Fatigue)", format!("{:.1}", fitness.atl)),
    ("TSB (Form)", format_tsb(Some(fitness.tsb()))),
    ("eFTP (detected)", or_placeholder(fitness.eftp, |e| format!("{:.0}W", e))),
    ("Config FTP", format!("{}W", config_ftp)),
  ];

  if let Some(eftp) = fitness.eftp.filter(|e| *e > 0.0) {
    let drift = eftp - f64::from(config_ftp);
    let mut drift_text = format!("{:+.0}W", drift);
    if drift.abs() > 5.0 {
      drift_text = warn(&format!("{} (consider updating zones)", drift_text));
    }
    rows.push(("FTP Drift", drift_text));
  }
  if let Some(ramp) = fitness.ramp_rate {
    rows.push(("Ramp Rate", format!("{:.1} TSS/wk", ramp)));
  }

  format!("{}\n{}", header("Fitness Dashboard"), kv_table(&rows))
}

pub fn render_week_summary(s: &WeekSummary) -> String {
  let mut out = vec![
    header(&format!("Week {} Summary — {}", s.week_number, s.phase)),
    format!("  {} → {}\n", s.start_date, s.end_date),
  ];

  let mut rows = vec![
    ("Total Hours", format_hours(s.total_hours)),
    (
      "Planned Range",
      format!("{:.0}–{:.0}h", s.planned_hours_min, s.planned_hours_max),
    ),
    ("Compliance", format_compliance(s.compliance())),
    ("Total Load", format!("{:.0}", s.total_load)),
    ("Rides", s.ride_count.to_string()),
    ("Strength", s.strength_count.to_string()),
  ];
  if let Some(ctl) = s.ctl_end {
    rows.push(("CTL (end)", format!("{:.1}", ctl)));
  }
  if let Some(change) = s.ctl_change() {
    rows.push(("CTL Change", format!("{:+.1}", change)));
  }
  if s.tsb_end.is_some() {
    rows.push(("TSB (end)", format_tsb(s.tsb_end)));
  }
  if let Some(eftp) = s.eftp {
    rows.push(("eFTP", format!("{:.0}W", eftp)));
  }
  if let Some(soreness) = s.avg_soreness {
    rows.push(("Avg Soreness", format!("{:.1}", soreness)));
  }
  if let Some(fatigue) = s.avg_fatigue {
    rows.push(("Avg Fatigue", format!("{:.1}", fatigue)));
  }
  out.push(kv_table(&rows));

  if !s.activities.is_empty() {
    out.push(section("Activities:"));
    let activity_rows: Vec<Vec<String>> = s
      .activities
      .iter()
      .map(|a| {
        vec![
          a.date().to_string(),
          truncate(a.name.as_deref().unwrap_or_default(), 30),
          a.activity_type.clone(),
          format_hours(a.hours()),
          format!("{:.0}", a.training_load()),
          or_placeholder(a.icu_average_watts, |w| format!("{:.0}W", w)),
          or_placeholder(a.average_heartrate, |hr| format!("{:.0}", hr)),
        ]
      })
      .collect();
    out.push(table(
      &["Date", "Name", "Type", "Time", "Load", "Avg W", "Avg HR"],
      &activity_rows,
    ));
  }

  out.join("\n")
}

pub fn render_planned_workouts(workouts: &[PlannedWorkout], week: u32) -> String {
  let rows: Vec<Vec<String>> = workouts
    .iter()
    .map(|w| {
      vec![
        w.date.to_string(),
        DAY_NAMES.get(w.day_of_week as usize).copied().unwrap_or("?").to_string(),
        truncate(&w.name, 35),
        w.workout_type.to_string(),
        if w.duration_minutes > 0 {
          format!("{}min", w.duration_minutes)
        } else {
          PLACEHOLDER.to_string()
        },
        w.zones.clone(),
        if w.workout_text.is_some() { "Yes" } else { "No" }.to_string(),
      ]
    })
    .collect();

  format!(
    "{}\n{}",
    header(&format!("Week {} — Planned Workouts", week)),
    table(
      &["Date", "Day", "Name", "Type", "Duration", "Zones", "Structured"],
      &rows
    )
  )
}

/// Each structured workout under a `date — name` heading
pub fn render_structured_workouts(workouts: &[PlannedWorkout]) -> String {
  workouts
    .iter()
    .filter_map(|w| {
      w.workout_text
        .as_ref()
        .map(|text| format!("{}\n{}", section(&format!("{} — {}", w.date, w.name)), text))
    })
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_push_preview(events: &[EventPayload]) -> String {
  let rows: Vec<Vec<String>> = events
    .iter()
    .map(|e| {
      vec![
        e.start_date_local.chars().take(10).collect(),
        e.name.clone(),
        e.event_type.to_string(),
        e.external_id.clone(),
      ]
    })
    .collect();

  format!(
    "{}\n{}",
    header("Push Preview — Events to Send"),
    table(&["Date", "Name", "Type", "External ID"], &rows)
  )
}

/// One line per event the calendar stored, tagged created or updated
pub fn render_push_result(stored: &[RemoteEvent]) -> String {
  stored
    .iter()
    .map(|e| format!("    {} — {} [{}]", e.day(), e.name, e.upsert_status()))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn render_clean_preview(stale: &[RemoteEvent]) -> String {
  let rows: Vec<Vec<String>> = stale
    .iter()
    .map(|e| {
      vec![
        e.day().to_string(),
        e.name.clone(),
        e.external_id.clone().unwrap_or_default(),
        e.id.to_string(),
      ]
    })
    .collect();

  format!(
    "{}\n{}",
    header("Stale Events — To Delete"),
    table(&["Date", "Name", "External ID", "Event ID"], &rows)
  )
}

pub fn render_zone_check(check: &ZoneCheck) -> String {
  format!("{}\n\n  {}", header("Zone Check"), check.message)
}

/// Zone watts at a proposed FTP
pub fn render_zone_suggestions(ftp: u32, zones: &[(String, u32, u32)]) -> String {
  let mut out = vec![section(&format!("Suggested zones at FTP {}W:", ftp))];
  for (zone, pct, watts) in zones {
    out.push(format!("  {}: {}% → {}W", zone.to_uppercase(), pct, watts));
  }
  out.join("\n")
}
