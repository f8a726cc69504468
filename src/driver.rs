use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::Rng;

use crate::{
  errors::BackfillError,
  git::VersionControl,
  journal::{LogEntry, append_entry},
  target::{Target, WeekdaySelection, validate_probability},
};

pub const DEFAULT_SKIP_PROBABILITY: f64 = 0.4;
const LAST_MINUTE_OF_DAY: u32 = 24 * 60 - 1;

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
  pub min_commits: u32,
  pub max_commits: u32,
  pub work_start_minute: u32,
  pub work_end_minute: u32,
  pub skip_probability: f64,
  pub tag_min: u32,
  pub tag_max: u32,
}

impl Default for DriverConfig {
  fn default() -> Self {
    Self {
      min_commits: 1,
      max_commits: 6,
      work_start_minute: 9 * 60,
      work_end_minute: 18 * 60,
      skip_probability: DEFAULT_SKIP_PROBABILITY,
      tag_min: 10_000,
      tag_max: 99_999,
    }
  }
}

impl DriverConfig {
  pub fn validate(&self) -> Result<()> {
    if self.min_commits == 0 || self.min_commits > self.max_commits {
      return Err(
        BackfillError::Range(format!(
          "Commit bounds {}..={} are invalid: the minimum must be at least 1 and not above the maximum.",
          self.min_commits, self.max_commits
        ))
        .into(),
      );
    }

    if self.work_start_minute > self.work_end_minute || self.work_end_minute > LAST_MINUTE_OF_DAY {
      return Err(
        BackfillError::Range(format!(
          "Work window {}..={} must be ordered minutes within a day.",
          self.work_start_minute, self.work_end_minute
        ))
        .into(),
      );
    }

    if self.tag_min > self.tag_max {
      return Err(BackfillError::Range(format!("Tag bounds {}..={} are inverted.", self.tag_min, self.tag_max)).into());
    }

    validate_probability(self.skip_probability)?;
    Ok(())
  }
}

pub fn nothing_to_do_message(label: &str) -> String {
  format!("No matching weekday found in {label}. Nothing to do.")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
  pub days: usize,
  pub skipped: usize,
  pub commits: usize,
}

pub struct Driver<'a, V: VersionControl, R: Rng> {
  config: &'a DriverConfig,
  vcs: &'a mut V,
  rng: &'a mut R,
  workdir: PathBuf,
  log_file: PathBuf,
  dry_run: bool,
  verbose: bool,
}

impl<'a, V: VersionControl, R: Rng> Driver<'a, V, R> {
  /// `log_file` is relative to `workdir`, which is where it gets written and
  /// how it gets staged.
  pub fn new(config: &'a DriverConfig, vcs: &'a mut V, rng: &'a mut R, workdir: &Path, log_file: &Path) -> Result<Self> {
    config.validate()?;

    Ok(Self {
      config,
      vcs,
      rng,
      workdir: workdir.to_path_buf(),
      log_file: log_file.to_path_buf(),
      dry_run: false,
      verbose: false,
    })
  }

  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub fn verbose(mut self, verbose: bool) -> Self {
    self.verbose = verbose;
    self
  }

  pub fn pick_timestamp(&mut self, day: NaiveDate) -> DateTime<Utc> {
    let minutes = self
      .rng
      .random_range(self.config.work_start_minute..=self.config.work_end_minute);
    let seconds = self.rng.random_range(0..=59u32);

    day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
      + TimeDelta::minutes(i64::from(minutes))
      + TimeDelta::seconds(i64::from(seconds))
  }

  fn should_skip(&mut self) -> bool {
    self.config.skip_probability > 0.0 && self.rng.random::<f64>() < self.config.skip_probability
  }

  fn commit_once(&mut self, day_label: &str, index: u32, timestamp: DateTime<Utc>) -> Result<()> {
    let entry = LogEntry {
      timestamp,
      tag: self.rng.random_range(self.config.tag_min..=self.config.tag_max),
      label: format!("{day_label}#{index}"),
    };
    let message = format!("auto commit {day_label} #{index}");

    if self.dry_run {
      println!("dry-run: would commit {} {message}", entry.iso_timestamp());
      return Ok(());
    }

    append_entry(&self.workdir.join(&self.log_file), &entry)?;
    self.vcs.stage(&self.log_file)?;
    let oid = self.vcs.commit(&message, timestamp, timestamp)?;
    println!("[{}] {message}", oid.get(..7).unwrap_or(&oid));

    if self.verbose {
      eprintln!("Created commit {oid} at {timestamp}.");
    }

    Ok(())
  }

  pub fn run(&mut self, target: &Target, weekdays: &WeekdaySelection, days: &[NaiveDate]) -> Result<Summary> {
    if days.is_empty() {
      println!("{}", nothing_to_do_message(&target.label));
      return Ok(Summary::default());
    }

    if !self.dry_run && !self.vcs.is_clean()? {
      return Err(
        BackfillError::Precondition("Git working tree must be clean before running backfill.".into()).into(),
      );
    }

    println!(
      "Generating commits for {}: {} days (weekdays {weekdays})...",
      target.label,
      days.len()
    );

    let mut summary = Summary {
      days: days.len(),
      ..Summary::default()
    };

    for day in days {
      let day_label = day.format("%Y-%m-%d").to_string();

      if self.should_skip() {
        println!("\n{day_label}: skipped");
        summary.skipped += 1;
        continue;
      }

      let total = self
        .rng
        .random_range(self.config.min_commits..=self.config.max_commits);
      println!("\n{day_label}: {total} commits");

      for index in 1..=total {
        let timestamp = self.pick_timestamp(*day);
        self.commit_once(&day_label, index, timestamp)?;
        summary.commits += 1;
      }
    }

    println!(
      "\nDone. {} commits over {} days ({} skipped).",
      summary.commits, summary.days, summary.skipped
    );

    Ok(summary)
  }
}
