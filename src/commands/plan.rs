//! `plan-week`, `push` and `clean`

use tracing::info;

use super::{CommandError, Context};
use crate::analysis::{analyze_week, check_fatigue, load_activities, load_wellness, week_dates, FatigueCheck};
use crate::display::{
  bold, ok, render_clean_preview, render_planned_workouts, render_push_preview, render_push_result,
  render_structured_workouts, warn,
};
use crate::pusher::{clean_week, current_ids, prepare_events, push_events};

/// ---------------------------------------------------------------------------
/// Plan Week
/// ---------------------------------------------------------------------------

pub fn plan_week(ctx: &Context, week: Option<u32>, dry_run: bool) -> Result<(), CommandError> {
  let week = ctx.week_or_next(week);
  let workouts = ctx.planned_workouts(week)?;

  println!("{}", render_planned_workouts(&workouts, week));
  let structured = render_structured_workouts(&workouts);
  if !structured.is_empty() {
    println!("{}", structured);
  }

  if dry_run {
    println!("\n  {} — workouts parsed but not pushed.", bold("Dry run"));
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Push
/// ---------------------------------------------------------------------------

/// Fatigue going into `week`, judged on the week before it
pub fn fatigue_before(ctx: &Context, week: u32) -> Result<FatigueCheck, CommandError> {
  let activities = load_activities(&ctx.cache)?;
  let wellness = load_wellness(&ctx.cache)?;
  let previous = analyze_week(&ctx.config, week.saturating_sub(1), &activities, &wellness);
  Ok(check_fatigue(&previous, &ctx.config.fatigue))
}

pub async fn push(ctx: &Context, week: Option<u32>, dry_run: bool) -> Result<(), CommandError> {
  let week = ctx.week_or_next(week);
  let workouts = ctx.planned_workouts(week)?;

  let fatigue = fatigue_before(ctx, week)?;
  if fatigue.fatigued {
    println!("{}", warn(&format!("  ⚠ {}", fatigue.message)));
  }

  let events = prepare_events(&workouts, fatigue.power_reduction);
  let ids = current_ids(&workouts);
  let (monday, sunday) = week_dates(&ctx.config, week);
  let (oldest, newest) = (monday.to_string(), sunday.to_string());
  let client = ctx.client()?;

  if dry_run {
    println!("{}", render_push_preview(&events));
    println!("\n  {} — {} events would be sent.", bold("Dry run"), events.len());

    let stale = clean_week(&client, week, &oldest, &newest, &ids, true).await?;
    if stale.is_empty() {
      println!("  No stale events to clean.");
    } else {
      println!("{}", render_clean_preview(&stale));
    }
    println!("  Run without --dry-run to push to Intervals.icu.");
    return Ok(());
  }

  println!("Pushing {} events to Intervals.icu...", events.len());
  let stored = push_events(&client, &events).await?;
  println!("{}", ok(&format!("  Done. {} events created/updated.", stored.len())));
  if !stored.is_empty() {
    println!("{}", render_push_result(&stored));
  }

  let stale = clean_week(&client, week, &oldest, &newest, &ids, false).await?;
  if !stale.is_empty() {
    println!("{}", ok(&format!("  Cleaned {} stale event(s).", stale.len())));
  }
  info!(week, pushed = stored.len(), cleaned = stale.len(), "push complete");
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Clean
/// ---------------------------------------------------------------------------

/// Delete this tool's events for `week` that the plan no longer lists. A week
/// missing from the plan entirely has every one of them stale.
pub async fn clean(ctx: &Context, week: Option<u32>, dry_run: bool) -> Result<(), CommandError> {
  let week = ctx.week_or_next(week);
  let workouts = ctx.planned_workouts_or_empty(week)?;
  let ids = current_ids(&workouts);
  let (monday, sunday) = week_dates(&ctx.config, week);

  let client = ctx.client()?;
  let stale = clean_week(
    &client,
    week,
    &monday.to_string(),
    &sunday.to_string(),
    &ids,
    dry_run,
  )
  .await?;

  if stale.is_empty() {
    println!("{}", ok(&format!("No stale events for week {}.", week)));
  } else if dry_run {
    println!("{}", render_clean_preview(&stale));
    println!("\n  {} — {} event(s) would be deleted.", bold("Dry run"), stale.len());
    println!("  Run without --dry-run to delete.");
  } else {
    for event in &stale {
      println!(
        "    Deleted: {} — {} [{}]",
        event.day(),
        event.name,
        event.external_id.as_deref().unwrap_or_default()
      );
    }
    println!("{}", ok(&format!("  Deleted {} stale event(s) for week {}.", stale.len(), week)));
  }
  Ok(())
}
