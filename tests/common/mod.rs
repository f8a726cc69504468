#![allow(dead_code)]

use std::{
  cell::Cell,
  fs,
  path::{Path, PathBuf},
  process::Command,
};

use anyhow::Result;
use backfill::{errors::BackfillError, git::VersionControl};
use chrono::{DateTime, Utc};
use tempfile::TempDir;

pub fn git(dir: &Path, args: &[&str]) -> String {
  let output = Command::new("git")
    .current_dir(dir)
    .args(args)
    .output()
    .expect("failed to run git");

  assert!(
    output.status.success(),
    "git {:?} failed: {}",
    args,
    String::from_utf8_lossy(&output.stderr)
  );

  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn init_repo() -> TempDir {
  let temp = TempDir::new().expect("temp dir");
  git(temp.path(), &["init", "-q"]);
  git(temp.path(), &["config", "user.email", "tests@example.com"]);
  git(temp.path(), &["config", "user.name", "Tests"]);
  temp
}

pub fn create_repo() -> TempDir {
  let temp = init_repo();
  fs::write(temp.path().join("README.md"), "# fixture\n").expect("write README.md");
  commit_with_date(temp.path(), "chore: init", "2024-01-01T00:00:00Z");
  temp
}

pub fn commit_with_date(dir: &Path, message: &str, date: &str) {
  git(dir, &["add", "."]);

  let output = Command::new("git")
    .current_dir(dir)
    .env("GIT_AUTHOR_DATE", date)
    .env("GIT_COMMITTER_DATE", date)
    .args(["commit", "-m", message])
    .output()
    .expect("failed to run git commit");

  assert!(
    output.status.success(),
    "git commit failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
}

pub fn commit_count(dir: &Path) -> usize {
  git(dir, &["rev-list", "--count", "HEAD"])
    .trim()
    .parse()
    .expect("numeric commit count")
}

pub struct RecordedCommit {
  pub message: String,
  pub author_date: DateTime<Utc>,
  pub committer_date: DateTime<Utc>,
}

/// In-memory stand-in for a repository that records every call.
#[derive(Default)]
pub struct RecordingVcs {
  pub dirty: bool,
  pub fail_on_commit: Option<usize>,
  pub clean_checks: Cell<usize>,
  pub staged: Vec<PathBuf>,
  pub commits: Vec<RecordedCommit>,
}

impl RecordingVcs {
  pub fn dirty() -> Self {
    Self {
      dirty: true,
      ..Self::default()
    }
  }
}

impl VersionControl for RecordingVcs {
  fn is_clean(&self) -> Result<bool> {
    self.clean_checks.set(self.clean_checks.get() + 1);
    Ok(!self.dirty)
  }

  fn stage(&mut self, path: &Path) -> Result<()> {
    self.staged.push(path.to_path_buf());
    Ok(())
  }

  fn commit(&mut self, message: &str, author_date: DateTime<Utc>, committer_date: DateTime<Utc>) -> Result<String> {
    if self.fail_on_commit == Some(self.commits.len()) {
      return Err(BackfillError::ExternalTool("Cannot create git commit: locked".into()).into());
    }

    self.commits.push(RecordedCommit {
      message: message.to_string(),
      author_date,
      committer_date,
    });

    Ok(format!("{:040x}", self.commits.len()))
  }
}
