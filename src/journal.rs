use std::{
  fs::OpenOptions,
  io::Write,
  path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};

pub const DEFAULT_LOG_FILE: &str = "commit.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
  pub timestamp: DateTime<Utc>,
  pub tag: u32,
  pub label: String,
}

impl LogEntry {
  pub fn iso_timestamp(&self) -> String {
    self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
  }

  pub fn render(&self) -> String {
    [
      self.iso_timestamp(),
      format!("random-tag:{}", self.tag),
      format!("commit-count-label:{}", self.label),
      String::new(),
    ]
    .join("\n")
      + "\n"
  }
}

pub fn append_entry(path: &Path, entry: &LogEntry) -> Result<()> {
  let mut file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("Cannot open log file: {}", path.display()))?;

  file
    .write_all(entry.render().as_bytes())
    .with_context(|| format!("Cannot append to log file: {}", path.display()))
}

/// Resolves `log_file` to a path relative to `workdir`, refusing anything that
/// would land outside of it.
pub fn resolve_log_path(workdir: &Path, log_file: &Path) -> Result<PathBuf> {
  let relative = if log_file.is_absolute() {
    log_file.strip_prefix(workdir).unwrap_or(log_file)
  } else {
    log_file
  };

  let mut resolved = PathBuf::new();
  for component in relative.components() {
    match component {
      Component::Normal(part) => resolved.push(part),
      Component::CurDir => {}
      Component::ParentDir if resolved.pop() => {}
      _ => return Err(anyhow!("Log file {} is outside the repository", log_file.display())),
    }
  }

  if resolved.as_os_str().is_empty() {
    return Err(anyhow!("Log file {} does not name a file", log_file.display()));
  }

  Ok(resolved)
}
