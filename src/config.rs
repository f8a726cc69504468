use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
  str::FromStr,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{driver::DriverConfig, errors::BackfillError, journal::DEFAULT_LOG_FILE};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
  pub log_file: Option<PathBuf>,
  pub skip_probability: Option<f64>,
  pub min_commits: Option<u32>,
  pub max_commits: Option<u32>,
  pub work_start_minute: Option<u32>,
  pub work_end_minute: Option<u32>,
  pub weekdays: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub log_file: Option<PathBuf>,
  pub seed: Option<u64>,
  pub verbose: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
  pub log_file: PathBuf,
  pub skip_probability: f64,
  pub min_commits: u32,
  pub max_commits: u32,
  pub work_start_minute: u32,
  pub work_end_minute: u32,
  pub weekdays: Option<String>,
  pub seed: Option<u64>,
  pub verbose: bool,
}

impl EffectiveConfig {
  pub fn from_sources(config: Option<FileConfig>, env: &HashMap<String, String>, flags: ConfigOverrides) -> Result<Self> {
    let config = config.unwrap_or_default();
    let defaults = DriverConfig::default();

    let env_var = |key: &str| env.get(key).cloned();

    let log_file = flags
      .log_file
      .or_else(|| env_var("BACKFILL_LOG_FILE").map(PathBuf::from))
      .or(config.log_file)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let skip_probability = env_var("BACKFILL_SKIP_PROBABILITY")
      .map(|raw| parse_env_number::<f64>("BACKFILL_SKIP_PROBABILITY", &raw))
      .transpose()?
      .or(config.skip_probability)
      .unwrap_or(defaults.skip_probability);

    let seed = match flags.seed {
      Some(seed) => Some(seed),
      None => {
        env_var("BACKFILL_SEED")
          .map(|raw| parse_env_number::<u64>("BACKFILL_SEED", &raw))
          .transpose()?
      }
    };

    let verbose = flags
      .verbose
      .or_else(|| env_var("BACKFILL_VERBOSE").map(|v| matches!(v.as_str(), "1" | "true" | "yes")))
      .unwrap_or(false);

    Ok(Self {
      log_file,
      skip_probability,
      min_commits: config.min_commits.unwrap_or(defaults.min_commits),
      max_commits: config.max_commits.unwrap_or(defaults.max_commits),
      work_start_minute: config.work_start_minute.unwrap_or(defaults.work_start_minute),
      work_end_minute: config.work_end_minute.unwrap_or(defaults.work_end_minute),
      weekdays: config.weekdays,
      seed,
      verbose,
    })
  }

  /// Builds the validated driver settings, with `skip_probability` coming from
  /// the command line once it has been resolved against this configuration.
  pub fn driver_config(&self, skip_probability: f64) -> Result<DriverConfig> {
    let driver = DriverConfig {
      min_commits: self.min_commits,
      max_commits: self.max_commits,
      work_start_minute: self.work_start_minute,
      work_end_minute: self.work_end_minute,
      skip_probability,
      ..DriverConfig::default()
    };

    driver.validate()?;
    Ok(driver)
  }
}

fn parse_env_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
  raw
    .trim()
    .parse::<T>()
    .map_err(|_| BackfillError::ArgumentFormat(format!("Environment variable {key} has an invalid value '{raw}'.")).into())
}

fn read_config(path: &Path) -> Result<FileConfig> {
  let content = fs::read_to_string(path).with_context(|| format!("Cannot read config file: {}", path.display()))?;
  serde_yaml::from_str::<FileConfig>(&content)
    .with_context(|| format!("Invalid YAML in config file: {}", path.display()))
}

pub fn load_file(config_path_override: Option<&Path>) -> Result<Option<FileConfig>> {
  if let Some(path) = config_path_override {
    return read_config(path).map(Some);
  }

  let global = if let Some(home) = std::env::var_os("HOME") {
    PathBuf::from(home).join(".config/backfill.yml")
  } else {
    PathBuf::from(".config/backfill.yml")
  };

  let local = PathBuf::from("backfill.yml");

  let mut result = if global.exists() {
    Some(read_config(&global)?)
  } else {
    None
  };

  if local.exists() {
    let overlay = read_config(&local)?;
    let mut merged = result.unwrap_or_default();

    merged.log_file = overlay.log_file.or(merged.log_file);
    merged.skip_probability = overlay.skip_probability.or(merged.skip_probability);
    merged.min_commits = overlay.min_commits.or(merged.min_commits);
    merged.max_commits = overlay.max_commits.or(merged.max_commits);
    merged.work_start_minute = overlay.work_start_minute.or(merged.work_start_minute);
    merged.work_end_minute = overlay.work_end_minute.or(merged.work_end_minute);
    merged.weekdays = overlay.weekdays.or(merged.weekdays);

    result = Some(merged);
  }

  Ok(result)
}
