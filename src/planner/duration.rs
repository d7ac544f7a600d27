//! Duration grammar for the plan tables.
//!
//! Durations are written by hand, so this accepts a small token grammar:
//! `60min`, `45m`, `90`, `1h45`, `1h`, ranges like `45-60min` and sums like
//! `1h15 + 35min`. Anything else reads as 0 (unspecified).

/// Parse a duration cell into whole minutes.
///
/// Precedence is compound (`+`) first, then range (`-` or `–`), then a single
/// value. Ranges resolve to their upper bound.
pub fn parse_duration(s: &str) -> u32 {
  let s = s.trim();
  if s.is_empty() {
    return 0;
  }

  if s.contains('+') {
    return s
      .split('+')
      .map(parse_duration)
      .fold(0u32, |acc, m| acc.saturating_add(m));
  }

  if s.contains(['-', '–']) {
    return s
      .split(['-', '–'])
      .map(str::trim)
      .filter(|p| !p.is_empty())
      .map(parse_duration)
      .max()
      .unwrap_or(0);
  }

  parse_single(s)
}

/// A single value: `<h>h<m>`, `<n>min`, `<n>m` or a bare integer (minutes).
fn parse_single(s: &str) -> u32 {
  let s = s.trim().to_lowercase();
  if s.is_empty() || s == "—" {
    return 0;
  }

  let (value, rest) = match leading_number(&s) {
    Some(parsed) => parsed,
    None => return 0,
  };

  match rest.strip_prefix('h') {
    Some(after_h) => {
      let minutes = leading_number(after_h).map(|(m, _)| m).unwrap_or(0);
      value.saturating_mul(60).saturating_add(minutes)
    }
    // `min`, `m` and bare numbers all mean minutes
    None => value,
  }
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
  let end = s
    .char_indices()
    .find(|(_, c)| !c.is_ascii_digit())
    .map(|(i, _)| i)
    .unwrap_or(s.len());

  if end == 0 {
    return None;
  }

  // Absurdly long digit runs are noise, not durations
  let value = s[..end].parse::<u32>().ok()?;
  Some((value, &s[end..]))
}
