use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::target::{DateRange, WeekdaySelection};

pub const DAY_MS: i64 = 86_400_000;

/// Weekday identifier with Monday as 1 and Sunday as 7.
pub fn weekday_id(date: NaiveDate) -> u8 {
  match date.weekday().num_days_from_sunday() {
    0 => 7,
    day => day as u8,
  }
}

/// Days in `range` whose weekday is part of `selection`, in calendar order.
pub fn target_days(range: &DateRange, selection: &WeekdaySelection) -> Vec<NaiveDate> {
  let step = TimeDelta::milliseconds(DAY_MS);
  let mut days = Vec::new();
  let mut current = range.start;

  while current <= range.end {
    let day = current.date_naive();

    if selection.contains(weekday_id(day)) {
      days.push(day);
    }

    current += step;
  }

  days
}
