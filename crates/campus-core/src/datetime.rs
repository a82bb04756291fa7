use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;

pub const DEFAULT_DATE_PATTERN: &str =
  "YYYY-MM-DD";

/// Fills the first `YYYY`, `MM` and `DD`
/// tokens of `pattern` with the date as
/// seen in `tz`.
#[must_use]
pub fn format_date(
  dt: DateTime<Utc>,
  pattern: &str,
  tz: &Tz
) -> String {
  let local = dt.with_timezone(tz);
  pattern
    .replacen(
      "YYYY",
      &local.year().to_string(),
      1
    )
    .replacen(
      "MM",
      &format!("{:02}", local.month()),
      1
    )
    .replacen(
      "DD",
      &format!("{:02}", local.day()),
      1
    )
}

/// Coarse relative wording, largest unit
/// first. Timestamps in the future read as
/// "Just now".
#[must_use]
pub fn time_ago(
  then: DateTime<Utc>,
  now: DateTime<Utc>
) -> String {
  let elapsed = now - then;
  let days = elapsed.num_days();
  let hours = elapsed.num_hours();
  let minutes = elapsed.num_minutes();

  if days > 0 {
    return plural_ago(days, "day");
  }
  if hours > 0 {
    return plural_ago(hours, "hour");
  }
  if minutes > 0 {
    return plural_ago(
      minutes, "minute"
    );
  }
  "Just now".to_string()
}

fn plural_ago(
  count: i64,
  unit: &str
) -> String {
  let suffix =
    if count > 1 { "s" } else { "" };
  format!("{count} {unit}{suffix} ago")
}

/// Accepts RFC 3339 timestamps, naive
/// `YYYY-MM-DDTHH:MM:SS` values (read as
/// UTC) and bare dates.
pub fn parse_timestamp(
  raw: &str
) -> Option<DateTime<Utc>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(parsed) =
    DateTime::parse_from_rfc3339(
      trimmed
    )
  {
    return Some(
      parsed.with_timezone(&Utc)
    );
  }

  for format in [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f"
  ] {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return Some(
        Utc.from_utc_datetime(&naive)
      );
    }
  }

  match NaiveDate::parse_from_str(
    trimmed, "%Y-%m-%d"
  ) {
    | Ok(date) => date
      .and_hms_opt(0, 0, 0)
      .map(|naive| {
        Utc.from_utc_datetime(&naive)
      }),
    | Err(err) => {
      tracing::debug!(
        raw = %trimmed,
        error = %err,
        "unrecognized timestamp"
      );
      None
    }
  }
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "configured display timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn at(
    y: i32,
    m: u32,
    d: u32,
    h: u32
  ) -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(y, m, d, h, 0, 0)
      .single()
      .expect("valid timestamp")
  }

  #[test]
  fn formats_default_pattern_with_padding()
   {
    let dt = at(2026, 2, 7, 12);
    assert_eq!(
      format_date(
        dt,
        DEFAULT_DATE_PATTERN,
        &chrono_tz::UTC
      ),
      "2026-02-07"
    );
    assert_eq!(
      format_date(
        dt,
        "DD/MM/YYYY",
        &chrono_tz::UTC
      ),
      "07/02/2026"
    );
  }

  #[test]
  fn formats_in_display_timezone() {
    let dt = at(2026, 2, 7, 3);
    assert_eq!(
      format_date(
        dt,
        DEFAULT_DATE_PATTERN,
        &chrono_tz::America::Mexico_City
      ),
      "2026-02-06"
    );
  }

  #[test]
  fn only_first_token_is_replaced() {
    let dt = at(2026, 11, 30, 12);
    assert_eq!(
      format_date(
        dt,
        "MM-MM",
        &chrono_tz::UTC
      ),
      "11-MM"
    );
  }

  #[test]
  fn time_ago_picks_largest_unit() {
    let now = at(2026, 2, 17, 12);
    assert_eq!(
      time_ago(
        now - Duration::days(3),
        now
      ),
      "3 days ago"
    );
    assert_eq!(
      time_ago(
        now - Duration::hours(25),
        now
      ),
      "1 day ago"
    );
    assert_eq!(
      time_ago(
        now - Duration::minutes(90),
        now
      ),
      "1 hour ago"
    );
    assert_eq!(
      time_ago(
        now - Duration::minutes(2),
        now
      ),
      "2 minutes ago"
    );
    assert_eq!(
      time_ago(
        now - Duration::seconds(59),
        now
      ),
      "Just now"
    );
    assert_eq!(
      time_ago(
        now + Duration::hours(1),
        now
      ),
      "Just now"
    );
  }

  #[test]
  fn parses_server_timestamp_shapes() {
    let expected = at(2026, 2, 17, 12);
    assert_eq!(
      parse_timestamp(
        "2026-02-17T12:00:00Z"
      ),
      Some(expected)
    );
    assert_eq!(
      parse_timestamp(
        "2026-02-17T13:00:00+01:00"
      ),
      Some(expected)
    );
    assert_eq!(
      parse_timestamp(
        "2026-02-17T12:00:00.250"
      )
      .map(|dt| dt.timestamp()),
      Some(expected.timestamp())
    );
    assert_eq!(
      parse_timestamp("2026-02-17"),
      Some(at(2026, 2, 17, 0))
    );
    assert_eq!(
      parse_timestamp("yesterday"),
      None
    );
  }
}
