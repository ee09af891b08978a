//! Small utility helpers used across modules.

use chrono::{NaiveDate, Utc};

pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// Parse an optional `YYYY-MM-DD` query value; blank or missing means today (UTC).
pub fn date_or_today(raw: Option<&str>) -> Result<NaiveDate, String> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(today()),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map_err(|_| format!("Invalid date '{s}', expected YYYY-MM-DD")),
  }
}

/// Log-safe truncation for user supplied strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{head}… ({} bytes total)", s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_explicit_dates() {
    assert_eq!(date_or_today(Some("2024-02-15")).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    assert!(date_or_today(Some("15/02/2024")).is_err());
    assert!(date_or_today(Some("2024-02-30")).is_err());
  }

  #[test]
  fn blank_means_today() {
    assert_eq!(date_or_today(None).unwrap(), today());
    assert_eq!(date_or_today(Some("  ")).unwrap(), today());
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("abc", 5), "abc");
    assert!(trunc_for_log("éééééé", 2).starts_with("éé…"));
  }
}
