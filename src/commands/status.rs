//! `status` and `zones`

use std::io::{self, BufRead, Write};

use super::{CommandError, Context};
use crate::analysis::{check_zones, latest_fitness, load_wellness, zone_watts};
use crate::config::update_config_ftp;
use crate::display::{ok, render_status_dashboard, render_zone_check, render_zone_suggestions, warn};

pub fn status(ctx: &Context) -> Result<(), CommandError> {
  let wellness = load_wellness(&ctx.cache)?;
  let Some(fitness) = latest_fitness(&wellness) else {
    println!("{}", warn("No fitness data cached. Run 'training-sync fetch' first."));
    return Ok(());
  };

  println!("{}", render_status_dashboard(&fitness, ctx.config.athlete.ftp));
  println!("\n  Data from: {}", fitness.date);
  println!("  Current training week: {}", ctx.current_week());
  Ok(())
}

/// Compare configured FTP with detected eFTP and offer to update the config
pub fn zones(ctx: &Context, assume_yes: bool) -> Result<(), CommandError> {
  let wellness = load_wellness(&ctx.cache)?;
  let fitness = latest_fitness(&wellness);
  let check = check_zones(
    ctx.config.athlete.ftp,
    fitness.as_ref(),
    ctx.config.fatigue.eftp_drift_threshold,
  );
  println!("{}", render_zone_check(&check));

  let Some(eftp) = check.eftp.filter(|_| check.needs_update) else {
    return Ok(());
  };
  let new_ftp = eftp as u32;
  println!("{}", render_zone_suggestions(new_ftp, &zone_watts(&ctx.config, new_ftp)));

  let question = format!(
    "\n  Update FTP to {}W in {}? [y/N] ",
    new_ftp,
    ctx.config_path.display()
  );
  let confirmed = assume_yes || confirm(&question, &mut io::stdin().lock()).map_err(CommandError::Prompt)?;
  if !confirmed {
    println!("  No changes made.");
    return Ok(());
  }

  update_config_ftp(&ctx.config_path, new_ftp)?;
  println!(
    "{}",
    ok(&format!("  Updated {}: ftp = {}", ctx.config_path.display(), new_ftp))
  );
  Ok(())
}

fn confirm(question: &str, input: &mut impl BufRead) -> io::Result<bool> {
  print!("{}", question);
  io::stdout().flush()?;

  let mut answer = String::new();
  input.read_line(&mut answer)?;
  Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
