use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use git2::{Repository, Signature, StatusOptions, Time};

use crate::errors::BackfillError;

const FALLBACK_NAME: &str = "backfill";
const FALLBACK_EMAIL: &str = "backfill@localhost";

/// The operations the commit driver needs from version control.
pub trait VersionControl {
  /// Whether the working tree has no pending changes, untracked files included.
  fn is_clean(&self) -> Result<bool>;

  /// Stages `path`, relative to the working directory.
  fn stage(&mut self, path: &Path) -> Result<()>;

  /// Commits the index on HEAD with forced author and committer dates and
  /// returns the new commit id.
  fn commit(&mut self, message: &str, author_date: DateTime<Utc>, committer_date: DateTime<Utc>) -> Result<String>;
}

fn external(action: &str, error: git2::Error) -> anyhow::Error {
  BackfillError::ExternalTool(format!("{action}: {}", error.message())).into()
}

pub struct GitRepository {
  repo: Repository,
}

impl GitRepository {
  pub fn discover(path: &Path) -> Result<Self> {
    let repo = Repository::discover(path).map_err(|e| external("Failed to discover git repository", e))?;
    Ok(Self { repo })
  }

  pub fn workdir(&self) -> Result<PathBuf> {
    self
      .repo
      .workdir()
      .map(Path::to_path_buf)
      .context("Git repository has no working directory")
  }

  fn signature_at(&self, date: DateTime<Utc>) -> Result<Signature<'static>> {
    let (name, email) = match self.repo.signature() {
      Ok(signature) => {
        (
          signature.name().unwrap_or(FALLBACK_NAME).to_string(),
          signature.email().unwrap_or(FALLBACK_EMAIL).to_string(),
        )
      }
      Err(_) => (FALLBACK_NAME.to_string(), FALLBACK_EMAIL.to_string()),
    };

    Signature::new(&name, &email, &Time::new(date.timestamp(), 0)).map_err(|e| external("Cannot build git signature", e))
  }
}

impl VersionControl for GitRepository {
  fn is_clean(&self) -> Result<bool> {
    let mut options = StatusOptions::new();
    options
      .include_untracked(true)
      .recurse_untracked_dirs(true)
      .include_ignored(false);

    let statuses = self
      .repo
      .statuses(Some(&mut options))
      .map_err(|e| external("Failed to read git status", e))?;

    Ok(statuses.is_empty())
  }

  fn stage(&mut self, path: &Path) -> Result<()> {
    let mut index = self.repo.index().map_err(|e| external("Cannot open git index", e))?;
    index
      .add_path(path)
      .map_err(|e| external(&format!("Cannot stage {}", path.display()), e))?;
    index.write().map_err(|e| external("Cannot write git index", e))
  }

  fn commit(&mut self, message: &str, author_date: DateTime<Utc>, committer_date: DateTime<Utc>) -> Result<String> {
    let mut index = self.repo.index().map_err(|e| external("Cannot open git index", e))?;
    let tree_id = index.write_tree().map_err(|e| external("Cannot write git tree", e))?;
    let tree = self.repo.find_tree(tree_id).map_err(|e| external("Cannot find git tree", e))?;

    let author = self.signature_at(author_date)?;
    let committer = self.signature_at(committer_date)?;

    let mut parents = Vec::new();
    if let Some(oid) = self.repo.head().ok().and_then(|head| head.target()) {
      parents.push(
        self
          .repo
          .find_commit(oid)
          .map_err(|e| external("Cannot find HEAD commit", e))?,
      );
    }

    let parent_refs = parents.iter().collect::<Vec<_>>();
    let oid = self
      .repo
      .commit(Some("HEAD"), &author, &committer, message, &tree, &parent_refs)
      .map_err(|e| external("Cannot create git commit", e))?;

    Ok(oid.to_string())
  }
}
