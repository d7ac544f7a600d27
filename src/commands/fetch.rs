use super::{CommandError, Context};
use crate::display::{header, kv_table, ok};
use crate::fetcher::fetch_all;

/// Pull `days` of history from Intervals.icu into the local cache
pub async fn run(ctx: &Context, days: u32) -> Result<(), CommandError> {
  let client = ctx.client()?;

  println!("{}", header("Fetching Intervals.icu data"));
  let summary = fetch_all(&client, &ctx.cache, days, ctx.today()).await?;

  println!(
    "{}",
    kv_table(&[
      ("Athlete", summary.athlete_id.unwrap_or_else(|| "—".into())),
      ("Range", format!("{} → {}", summary.oldest, summary.newest)),
      ("Activities", summary.activity_count.to_string()),
      ("Wellness days", summary.wellness_days.to_string()),
      ("Cache", ctx.cache.dir().display().to_string()),
    ])
  );
  println!("\n{}", ok("  Fetch complete."));
  Ok(())
}
