use std::{collections::BTreeSet, fmt, sync::LazyLock};

use anyhow::Result;
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use regex::Regex;

use crate::errors::BackfillError;

pub const DEFAULT_WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]{4})$").expect("year regex must compile"));
static MONTH_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([0-9]{4})[-/.]([0-9]{1,2})$").expect("month regex must compile"));
static DAY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([0-9]{4})[-/.]([0-9]{1,2})[-/.]([0-9]{1,2})$").expect("day regex must compile"));
static WEEKDAY_ALLOWED_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[\s,1-7]+$").expect("weekday regex must compile"));

/// Inclusive span of instants, from midnight of the first day to the last
/// millisecond of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

impl DateRange {
  pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
    let start = first.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    let end = last.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default().and_utc();

    Self { start, end }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
  pub range: DateRange,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySelection(BTreeSet<u8>);

impl WeekdaySelection {
  pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self> {
    let days = days.into_iter().collect::<BTreeSet<_>>();

    if days.is_empty() {
      return Err(BackfillError::ArgumentFormat("Weekday selection cannot be empty.".into()).into());
    }

    if let Some(invalid) = days.iter().find(|day| !(1..=7).contains(*day)) {
      return Err(BackfillError::Range(format!("Weekday {invalid} is not between 1 and 7.")).into());
    }

    Ok(Self(days))
  }

  pub fn contains(&self, weekday: u8) -> bool {
    self.0.contains(&weekday)
  }

  pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
    self.0.iter().copied()
  }
}

impl Default for WeekdaySelection {
  fn default() -> Self {
    Self(DEFAULT_WEEKDAYS.into_iter().collect())
  }
}

impl fmt::Display for WeekdaySelection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let list = self.iter().map(|day| day.to_string()).collect::<Vec<_>>().join(",");
    f.write_str(&list)
  }
}

fn capture_number(captures: &regex::Captures<'_>, index: usize) -> Result<u32> {
  let raw = captures.get(index).map(|m| m.as_str()).unwrap_or_default();

  raw
    .parse::<u32>()
    .map_err(|_| BackfillError::ArgumentFormat(format!("'{raw}' is not a decimal number.")).into())
}

fn checked_month(month: u32) -> Result<u32> {
  if !(1..=12).contains(&month) {
    return Err(BackfillError::Range("Month value must be between 1 and 12.".into()).into());
  }

  Ok(month)
}

pub fn parse_target(raw: &str) -> Result<Target> {
  let raw = raw.trim();

  if let Some(captures) = DAY_PATTERN.captures(raw) {
    let year = capture_number(&captures, 1)? as i32;
    let month = checked_month(capture_number(&captures, 2)?)?;
    let day = capture_number(&captures, 3)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)
      .ok_or_else(|| BackfillError::Range(format!("Day {day} does not exist in {year}-{month:02}.")))?;

    return Ok(Target {
      range: DateRange::from_days(date, date),
      label: date.format("%Y-%m-%d").to_string(),
    });
  }

  if let Some(captures) = MONTH_PATTERN.captures(raw) {
    let year = capture_number(&captures, 1)? as i32;
    let month = checked_month(capture_number(&captures, 2)?)?;

    let first = NaiveDate::from_ymd_opt(year, month, 1)
      .ok_or_else(|| BackfillError::Range(format!("Month {year}-{month:02} is out of range.")))?;
    // Day zero of the following month.
    let last = first
      .checked_add_months(Months::new(1))
      .and_then(|next| next.pred_opt())
      .ok_or_else(|| BackfillError::Range(format!("Month {year}-{month:02} is out of range.")))?;

    return Ok(Target {
      range: DateRange::from_days(first, last),
      label: format!("{}-{:02}", first.year(), first.month()),
    });
  }

  if let Some(captures) = YEAR_PATTERN.captures(raw) {
    let year = capture_number(&captures, 1)? as i32;

    let first = NaiveDate::from_ymd_opt(year, 1, 1)
      .ok_or_else(|| BackfillError::Range(format!("Year {year} is out of range.")))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31)
      .ok_or_else(|| BackfillError::Range(format!("Year {year} is out of range.")))?;

    return Ok(Target {
      range: DateRange::from_days(first, last),
      label: year.to_string(),
    });
  }

  Err(BackfillError::ArgumentFormat(format!("Target argument '{raw}' must follow YYYY / YYYY-MM / YYYY-MM-DD format.")).into())
}

pub fn parse_weekdays(raw: Option<&str>) -> Result<WeekdaySelection> {
  let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
    return Ok(WeekdaySelection::default());
  };

  if !WEEKDAY_ALLOWED_PATTERN.is_match(raw) {
    return Err(
      BackfillError::ArgumentFormat("Weekday argument only accepts digits 1-7 separated by commas or spaces.".into())
        .into(),
    );
  }

  let digits = raw
    .chars()
    .filter_map(|c| c.to_digit(10))
    .map(|digit| digit as u8)
    .collect::<Vec<_>>();

  if digits.is_empty() {
    return Err(
      BackfillError::ArgumentFormat("Weekday argument must include at least one digit between 1 and 7.".into()).into(),
    );
  }

  WeekdaySelection::new(digits)
}

pub fn validate_probability(value: f64) -> Result<f64> {
  if !value.is_finite() || !(0.0..=1.0).contains(&value) {
    return Err(BackfillError::Range(format!("Skip probability {value} must be between 0 and 1.")).into());
  }

  Ok(value)
}

pub fn parse_skip_probability(raw: Option<&str>, default: f64) -> Result<f64> {
  let Some(raw) = raw else {
    return Ok(default);
  };

  let value = raw.trim().parse::<f64>().map_err(|_| {
    BackfillError::ArgumentFormat(format!(
      "Skip probability '{raw}' must be a decimal between 0 and 1, e.g. 0.3 skips a day 30% of the time."
    ))
  })?;

  validate_probability(value)
}
