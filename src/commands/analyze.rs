use super::{CommandError, Context};
use crate::analysis::{analyze_week, load_activities, load_wellness};
use crate::display::{render_week_summary, warn};

/// Weekly summary from cached data; defaults to the current plan week
pub fn run(ctx: &Context, week: Option<u32>) -> Result<(), CommandError> {
  let week = week.unwrap_or_else(|| ctx.current_week());
  let activities = load_activities(&ctx.cache)?;
  let wellness = load_wellness(&ctx.cache)?;

  if activities.is_empty() && wellness.is_empty() {
    println!("{}", warn("No data cached. Run 'training-sync fetch' first."));
  }

  let summary = analyze_week(&ctx.config, week, &activities, &wellness);
  println!("{}", render_week_summary(&summary));
  Ok(())
}
